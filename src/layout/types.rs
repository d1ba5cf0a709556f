//! Core types for the layout engine

use serde::{Deserialize, Serialize};

use crate::node::HostKind;
use crate::props::Props;

/// A 2D point in the coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height of a node
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Extent along the main axis of `direction`
    pub fn main(&self, direction: FlexDirection) -> f64 {
        match direction {
            FlexDirection::Row => self.width,
            FlexDirection::Column => self.height,
        }
    }

    /// Extent across the main axis of `direction`
    pub fn cross(&self, direction: FlexDirection) -> f64 {
        match direction {
            FlexDirection::Row => self.height,
            FlexDirection::Column => self.width,
        }
    }

    /// Build a size from main/cross extents
    pub fn from_axes(direction: FlexDirection, main: f64, cross: f64) -> Self {
        match direction {
            FlexDirection::Row => Self::new(main, cross),
            FlexDirection::Column => Self::new(cross, main),
        }
    }
}

/// Resolved absolute rectangle of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-sized bounding box at the origin
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Center point of the bounding box
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds::new(x, y, right - x, bottom - y)
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::zero()
    }
}

/// Main axis of a flex container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// Cross-axis placement of flex children
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    #[default]
    #[serde(alias = "start")]
    FlexStart,
    Center,
    #[serde(alias = "end")]
    FlexEnd,
    Stretch,
}

/// Main-axis distribution of free space in a flex container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    #[serde(alias = "start")]
    FlexStart,
    Center,
    #[serde(alias = "end")]
    FlexEnd,
    SpaceBetween,
}

/// Placement along one axis of an overlay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

impl Alignment {
    /// Offset of a child of extent `child` inside a container of extent `container`
    pub fn offset(&self, container: f64, child: f64) -> f64 {
        match self {
            Alignment::Start => 0.0,
            Alignment::Center => (container - child) / 2.0,
            Alignment::End => container - child,
        }
    }
}

/// Sequential distribution of children along one axis
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlexLayout {
    pub direction: FlexDirection,
    pub align_items: AlignItems,
    pub justify_content: JustifyContent,
    /// Space inserted between adjacent children
    pub gap: f64,
}

impl FlexLayout {
    pub fn row() -> Self {
        Self::default()
    }

    pub fn column() -> Self {
        Self {
            direction: FlexDirection::Column,
            ..Self::default()
        }
    }

    pub fn with_align_items(mut self, align_items: AlignItems) -> Self {
        self.align_items = align_items;
        self
    }

    pub fn with_justify_content(mut self, justify_content: JustifyContent) -> Self {
        self.justify_content = justify_content;
        self
    }

    pub fn with_gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }
}

/// Independent placement of superimposed children in shared bounds
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AlignLayout {
    pub horizontal: Alignment,
    pub vertical: Alignment,
}

impl AlignLayout {
    pub fn new(horizontal: Alignment, vertical: Alignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }

    pub fn centered() -> Self {
        Self::new(Alignment::Center, Alignment::Center)
    }
}

/// What a positioned node is
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutKind {
    Host(HostKind),
    Flex(FlexLayout),
    Align(AlignLayout),
    Gap,
}

/// A node with its absolute bounds resolved
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub kind: LayoutKind,
    pub bounds: Bounds,
    /// Attributes forwarded to the serializer
    pub attrs: Props,
    /// Children in declaration (paint) order
    pub children: Vec<LayoutNode>,
}

impl LayoutNode {
    /// Depth-first iterator over this node and its descendants
    pub fn descendants(&self) -> Vec<&LayoutNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }
}

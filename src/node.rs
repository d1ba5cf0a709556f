//! Declarative node tree
//!
//! Items and layouts build trees of [`Node`]s. Host nodes are drawing
//! primitives, item nodes are references expanded by
//! [`crate::items::evaluate`], and flex/align/gap nodes are layout
//! directives resolved by [`crate::layout`].

use crate::layout::{AlignLayout, FlexLayout, Point};
use crate::props::{ItemProps, PropValue, Props};

/// Drawing primitives understood by the layout engine and serializer
#[derive(Debug, Clone, PartialEq)]
pub enum HostKind {
    Group,
    Rect,
    Ellipse,
    /// Closed shape through `points`, relative to the node origin
    Polygon {
        points: Vec<Point>,
    },
    Text {
        content: String,
    },
    /// Container for paint definitions
    Defs,
    /// A paint definition such as a gradient or pattern, kept verbatim
    Definition {
        tag: String,
    },
    /// External graphic content, embedded or referenced
    Resource {
        source: String,
    },
}

/// What a node is
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Host(HostKind),
    /// Reference to a registered item, expanded before layout
    Item {
        name: String,
        props: ItemProps,
    },
    Flex(FlexLayout),
    Align(AlignLayout),
    /// Fixed spacer along the parent's main axis
    Gap,
}

/// One element of a declarative tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub props: Props,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            props: Props::new(),
            children: vec![],
        }
    }

    pub fn host(kind: HostKind) -> Self {
        Self::new(NodeKind::Host(kind))
    }

    pub fn group() -> Self {
        Self::host(HostKind::Group)
    }

    pub fn rect() -> Self {
        Self::host(HostKind::Rect)
    }

    pub fn ellipse() -> Self {
        Self::host(HostKind::Ellipse)
    }

    pub fn polygon(points: Vec<Point>) -> Self {
        Self::host(HostKind::Polygon { points })
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self::host(HostKind::Text {
            content: content.into(),
        })
    }

    pub fn defs() -> Self {
        Self::host(HostKind::Defs)
    }

    /// A paint definition element such as `linearGradient` or `stop`
    pub fn definition(tag: impl Into<String>) -> Self {
        Self::host(HostKind::Definition { tag: tag.into() })
    }

    pub fn resource(source: impl Into<String>) -> Self {
        Self::host(HostKind::Resource {
            source: source.into(),
        })
    }

    pub fn item(name: impl Into<String>, props: ItemProps) -> Self {
        Self::new(NodeKind::Item {
            name: name.into(),
            props,
        })
    }

    pub fn flex(layout: FlexLayout) -> Self {
        Self::new(NodeKind::Flex(layout))
    }

    pub fn align(layout: AlignLayout) -> Self {
        Self::new(NodeKind::Align(layout))
    }

    /// A spacer; only the extent along the parent's main axis is used
    pub fn gap(width: f64, height: f64) -> Self {
        Self::new(NodeKind::Gap)
            .prop("width", width)
            .prop("height", height)
    }

    /// Set a single prop
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Merge props; later values win
    pub fn props(mut self, props: Props) -> Self {
        self.props.extend(props);
        self
    }

    /// Set a prop only when a value is present
    pub fn maybe_prop(self, key: &str, value: Option<impl Into<PropValue>>) -> Self {
        match value {
            Some(value) => self.prop(key, value),
            None => self,
        }
    }

    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Numeric prop, if present and numeric
    pub fn number(&self, key: &str) -> Option<f64> {
        self.props.get(key).and_then(PropValue::as_f64)
    }

    pub fn is_item(&self) -> bool {
        matches!(self.kind, NodeKind::Item { .. })
    }

    /// Number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Node::count).sum::<usize>()
    }
}

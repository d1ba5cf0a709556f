//! Layout computation engine
//!
//! Layout runs in two passes over an evaluated node tree:
//!
//! 1. **Measure** (bottom-up): every node gets an intrinsic size, either the
//!    declared `width`/`height` or one derived from its children or content.
//! 2. **Arrange** (top-down): every node gets absolute bounds from its
//!    parent's placement rule.
//!
//! Placement rules by parent kind:
//!
//! - group and other host primitives: each child sits at its own `x`/`y`
//!   relative to the parent origin
//! - flex: children follow each other along the main axis in declaration
//!   order, separated by `gap`, and are aligned on the cross axis
//! - align: children are superimposed and each is aligned independently
//!   within the shared bounds
//!
//! `x`/`y` on a child of a flex or align container are ignored. A negative or
//! non-finite `gap` counts as 0, like any other invalid size. The engine
//! holds no state between calls; the same tree and config always produce the
//! same result.

use crate::node::{HostKind, Node, NodeKind};
use crate::props::{PropValue, Props};
use crate::resource::load_svg_resource;

use super::config::LayoutConfig;
use super::types::*;

/// Props consumed by layout and not forwarded to the serializer
const GEOMETRY_KEYS: [&str; 4] = ["x", "y", "width", "height"];

/// Intrinsic sizes of a subtree, mirroring the node tree
struct Measured {
    size: Size,
    children: Vec<Measured>,
}

/// Compute the intrinsic size of a node
pub fn measure(node: &Node, config: &LayoutConfig) -> Size {
    measure_tree(node, config).size
}

/// Lay out a tree with its root at `origin`.
///
/// The tree should already be evaluated; any remaining item reference is laid
/// out as an empty group.
pub fn layout(node: &Node, origin: Point, config: &LayoutConfig) -> LayoutNode {
    let measured = measure_tree(node, config);
    arrange(node, &measured, origin, measured.size)
}

// ============================================
// Measure
// ============================================

fn measure_tree(node: &Node, config: &LayoutConfig) -> Measured {
    let children: Vec<Measured> = match &node.kind {
        NodeKind::Host(HostKind::Defs) | NodeKind::Host(HostKind::Definition { .. }) => vec![],
        _ => node
            .children
            .iter()
            .map(|child| measure_tree(child, config))
            .collect(),
    };

    let declared_width = declared_size(node, "width");
    let declared_height = declared_size(node, "height");

    let intrinsic = match &node.kind {
        NodeKind::Host(HostKind::Group)
        | NodeKind::Host(HostKind::Rect)
        | NodeKind::Host(HostKind::Ellipse) => positioned_extent(node, &children),
        NodeKind::Host(HostKind::Polygon { points }) => points_extent(points),
        NodeKind::Host(HostKind::Text { content }) => {
            text_size(node, content, declared_width, config)
        }
        NodeKind::Host(HostKind::Resource { source }) => resource_size(source),
        NodeKind::Host(HostKind::Defs) | NodeKind::Host(HostKind::Definition { .. }) => {
            Size::default()
        }
        NodeKind::Flex(flex) => flex_extent(flex, node, &children),
        NodeKind::Align(_) => overlay_extent(&children),
        NodeKind::Gap => Size::default(),
        NodeKind::Item { name, .. } => {
            log::warn!("item '{}' reached layout unexpanded", name);
            Size::default()
        }
    };

    Measured {
        size: Size::new(
            declared_width.unwrap_or(intrinsic.width),
            declared_height.unwrap_or(intrinsic.height),
        ),
        children,
    }
}

/// A declared size prop, clamped to a finite non-negative value
fn declared_size(node: &Node, key: &str) -> Option<f64> {
    node.number(key).map(|value| clamp_size(value, key))
}

fn clamp_size(value: f64, what: &str) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::debug!("clamping {} of {} to 0", what, value);
        0.0
    }
}

/// Offset prop; anything non-finite counts as 0
fn offset(node: &Node, key: &str) -> f64 {
    node.number(key).filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn positioned_extent(node: &Node, children: &[Measured]) -> Size {
    let mut width = 0.0f64;
    let mut height = 0.0f64;
    for (child, measured) in node.children.iter().zip(children) {
        width = width.max(offset(child, "x") + measured.size.width);
        height = height.max(offset(child, "y") + measured.size.height);
    }
    Size::new(width, height)
}

fn points_extent(points: &[Point]) -> Size {
    let width = points.iter().map(|p| p.x).fold(0.0f64, f64::max);
    let height = points.iter().map(|p| p.y).fold(0.0f64, f64::max);
    Size::new(clamp_size(width, "polygon width"), clamp_size(height, "polygon height"))
}

/// Estimate text extent from its font size and character count.
///
/// With a declared width, lines longer than that width wrap and add height.
fn text_size(node: &Node, content: &str, width: Option<f64>, config: &LayoutConfig) -> Size {
    let font_size = node
        .number("fontSize")
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(config.default_font_size);
    let line_height = node
        .number("lineHeight")
        .filter(|v| v.is_finite() && *v > 0.0)
        .unwrap_or(config.line_height);
    let advance = font_size * config.char_width_ratio;

    let line_widths: Vec<f64> = content
        .lines()
        .map(|line| line.chars().count() as f64 * advance)
        .collect();
    let natural_width = line_widths.iter().copied().fold(0.0f64, f64::max);

    let lines = match width {
        Some(w) if w > 0.0 => line_widths
            .iter()
            .map(|lw| (lw / w).ceil().max(1.0))
            .sum::<f64>()
            .max(1.0),
        _ => (line_widths.len() as f64).max(1.0),
    };

    Size::new(natural_width, lines * font_size * line_height)
}

fn resource_size(source: &str) -> Size {
    load_svg_resource(source)
        .and_then(|resource| resource.view_box)
        .map(|vb| {
            Size::new(
                clamp_size(vb.width, "viewBox width"),
                clamp_size(vb.height, "viewBox height"),
            )
        })
        .unwrap_or_default()
}

fn flex_extent(flex: &FlexLayout, node: &Node, children: &[Measured]) -> Size {
    let direction = flex.direction;
    let mut main = 0.0f64;
    let mut cross = 0.0f64;
    for (child, measured) in node.children.iter().zip(children) {
        main += measured.size.main(direction);
        if !matches!(child.kind, NodeKind::Gap) {
            cross = cross.max(measured.size.cross(direction));
        }
    }
    if children.len() > 1 {
        main += clamp_size(flex.gap, "gap") * (children.len() - 1) as f64;
    }
    Size::from_axes(direction, main.max(0.0), cross)
}

fn overlay_extent(children: &[Measured]) -> Size {
    children.iter().fold(Size::default(), |acc, m| {
        Size::new(acc.width.max(m.size.width), acc.height.max(m.size.height))
    })
}

// ============================================
// Arrange
// ============================================

fn arrange(
    node: &Node,
    measured: &Measured,
    origin: Point,
    size: Size,
) -> LayoutNode {
    let bounds = Bounds::from_origin(origin, size);

    let (kind, children) = match &node.kind {
        NodeKind::Host(HostKind::Definition { .. }) => return definition_node(node, origin),
        NodeKind::Host(HostKind::Defs) => (
            LayoutKind::Host(HostKind::Defs),
            node.children
                .iter()
                .map(|child| definition_node(child, origin))
                .collect(),
        ),
        NodeKind::Host(kind) => (
            LayoutKind::Host(kind.clone()),
            arrange_positioned(node, measured, origin),
        ),
        NodeKind::Flex(flex) => (
            LayoutKind::Flex(*flex),
            arrange_flex(flex, node, measured, bounds),
        ),
        NodeKind::Align(align) => (
            LayoutKind::Align(*align),
            arrange_overlay(align, node, measured, bounds),
        ),
        NodeKind::Gap => (LayoutKind::Gap, vec![]),
        NodeKind::Item { .. } => (LayoutKind::Host(HostKind::Group), vec![]),
    };

    let attrs = if matches!(kind, LayoutKind::Gap) {
        Props::new()
    } else {
        forwarded_attrs(&node.props)
    };

    LayoutNode {
        kind,
        bounds,
        attrs,
        children,
    }
}

fn forwarded_attrs(props: &Props) -> Props {
    props
        .iter()
        .filter(|(key, _)| !GEOMETRY_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Paint definitions keep every attribute and take no space
fn definition_node(node: &Node, origin: Point) -> LayoutNode {
    let kind = match &node.kind {
        NodeKind::Host(kind) => kind.clone(),
        _ => HostKind::Group,
    };
    LayoutNode {
        kind: LayoutKind::Host(kind),
        bounds: Bounds::from_origin(origin, Size::default()),
        attrs: node.props.clone(),
        children: node
            .children
            .iter()
            .map(|child| definition_node(child, origin))
            .collect(),
    }
}

fn arrange_positioned(
    node: &Node,
    measured: &Measured,
    origin: Point,
) -> Vec<LayoutNode> {
    node.children
        .iter()
        .zip(&measured.children)
        .map(|(child, m)| {
            let child_origin = Point::new(origin.x + offset(child, "x"), origin.y + offset(child, "y"));
            arrange(child, m, child_origin, m.size)
        })
        .collect()
}

fn arrange_flex(
    flex: &FlexLayout,
    node: &Node,
    measured: &Measured,
    bounds: Bounds,
) -> Vec<LayoutNode> {
    let direction = flex.direction;
    let container_main = bounds.size().main(direction);
    let container_cross = bounds.size().cross(direction);
    let count = node.children.len();
    let gap = clamp_size(flex.gap, "gap");

    let content_main = measured
        .children
        .iter()
        .map(|m| m.size.main(direction))
        .sum::<f64>()
        + gap * count.saturating_sub(1) as f64;
    let free = (container_main - content_main).max(0.0);

    let (mut cursor, spacing) = match flex.justify_content {
        JustifyContent::FlexStart => (0.0, gap),
        JustifyContent::Center => (free / 2.0, gap),
        JustifyContent::FlexEnd => (free, gap),
        JustifyContent::SpaceBetween if count > 1 => (0.0, gap + free / (count - 1) as f64),
        JustifyContent::SpaceBetween => (0.0, gap),
    };

    let mut placed = Vec::with_capacity(count);
    for (child, m) in node.children.iter().zip(&measured.children) {
        let main = m.size.main(direction);
        let cross = m.size.cross(direction);

        let (cross, cross_offset) = if matches!(child.kind, NodeKind::Gap) {
            (0.0, 0.0)
        } else {
            match flex.align_items {
                AlignItems::FlexStart => (cross, 0.0),
                AlignItems::Center => (cross, (container_cross - cross) / 2.0),
                AlignItems::FlexEnd => (cross, container_cross - cross),
                AlignItems::Stretch => (container_cross, 0.0),
            }
        };

        let delta = Size::from_axes(direction, cursor, cross_offset);
        let child_origin = Point::new(bounds.x + delta.width, bounds.y + delta.height);
        let child_size = Size::from_axes(direction, main, cross);
        placed.push(arrange(child, m, child_origin, child_size));

        cursor += main + spacing;
    }
    placed
}

fn arrange_overlay(
    align: &AlignLayout,
    node: &Node,
    measured: &Measured,
    bounds: Bounds,
) -> Vec<LayoutNode> {
    node.children
        .iter()
        .zip(&measured.children)
        .map(|(child, m)| {
            let child_origin = Point::new(
                bounds.x + align.horizontal.offset(bounds.width, m.size.width),
                bounds.y + align.vertical.offset(bounds.height, m.size.height),
            );
            arrange(child, m, child_origin, m.size)
        })
        .collect()
}

/// Numeric attribute of a laid-out node
pub fn attr_number(node: &LayoutNode, key: &str) -> Option<f64> {
    node.attrs.get(key).and_then(PropValue::as_f64)
}

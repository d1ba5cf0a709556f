//! Layout engine for computing node positions and sizes
//!
//! This module takes an evaluated node tree and computes the spatial layout,
//! producing a [`LayoutNode`] tree with absolute bounds.

pub mod config;
pub mod engine;
pub mod types;

pub use config::LayoutConfig;
pub use engine::{attr_number, layout, measure};
pub use types::*;

/// Render a laid-out tree as an indented outline, one node per line
pub fn debug_tree(node: &LayoutNode) -> String {
    let mut out = String::new();
    write_debug_tree(node, 0, &mut out);
    out
}

fn write_debug_tree(node: &LayoutNode, depth: usize, out: &mut String) {
    let kind = match &node.kind {
        LayoutKind::Host(host) => format!("{:?}", host),
        LayoutKind::Flex(flex) => format!("Flex({:?})", flex.direction),
        LayoutKind::Align(_) => "Align".to_string(),
        LayoutKind::Gap => "Gap".to_string(),
    };
    let b = &node.bounds;
    out.push_str(&format!(
        "{}{} @ ({:.1}, {:.1}) {:.1}x{:.1}\n",
        "  ".repeat(depth),
        kind,
        b.x,
        b.y,
        b.width,
        b.height
    ));
    for child in &node.children {
        write_debug_tree(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    #[test]
    fn test_debug_tree_outline() {
        let tree = Node::flex(FlexLayout::row()).child(Node::rect().prop("width", 10).prop("height", 4));
        let result = layout(&tree, Point::default(), &LayoutConfig::default());
        let outline = debug_tree(&result);
        let lines: Vec<_> = outline.lines().collect();
        assert_eq!(lines[0], "Flex(Row) @ (0.0, 0.0) 10.0x4.0");
        assert_eq!(lines[1], "  Rect @ (0.0, 0.0) 10.0x4.0");
    }
}

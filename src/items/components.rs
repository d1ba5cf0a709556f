//! Text presets shared by items

use crate::node::Node;
use crate::props::index_key;

const LABEL_FONT_SIZE: f64 = 18.0;
const DESC_FONT_SIZE: f64 = 14.0;
const VALUE_FONT_SIZE: f64 = 24.0;

fn item_text(role: &str, indexes: &[usize], content: &str, font_size: f64) -> Node {
    Node::text(content)
        .prop("data-element-type", role)
        .prop("data-indexes", index_key(indexes))
        .prop("fontSize", font_size)
}

/// Title text of an item
pub fn item_label(indexes: &[usize], content: &str) -> Node {
    item_text("item-label", indexes, content, LABEL_FONT_SIZE)
}

/// Secondary description text of an item
pub fn item_desc(indexes: &[usize], content: &str) -> Node {
    item_text("item-desc", indexes, content, DESC_FONT_SIZE)
        .prop("lineHeight", 1.4)
}

/// Numeric value of an item, formatted without trailing zeros
pub fn item_value(indexes: &[usize], value: f64) -> Node {
    item_text("item-value", indexes, &value.to_string(), VALUE_FONT_SIZE)
        .prop("fontWeight", "bold")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{HostKind, NodeKind};

    #[test]
    fn test_label_preset() {
        let label = item_label(&[1, 2], "Plan").prop("fontSize", 14);
        assert_eq!(
            label.kind,
            NodeKind::Host(HostKind::Text {
                content: "Plan".to_string()
            })
        );
        assert_eq!(label.number("fontSize"), Some(14.0));
        assert_eq!(
            label.props.get("data-indexes").and_then(|v| v.as_str()),
            Some("1-2")
        );
    }

    #[test]
    fn test_value_formatting() {
        let value = item_value(&[0], 42.0);
        assert!(matches!(
            value.kind,
            NodeKind::Host(HostKind::Text { ref content }) if content == "42"
        ));
    }
}

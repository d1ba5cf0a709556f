//! A bullet followed by one line of text

use crate::node::Node;
use crate::props::{resolve_props, ItemProps};

use super::components::item_label;
use super::{Composite, ItemDefinition, ItemError};

pub(super) const NAME: &str = "bullet-text";

const DEFAULT_WIDTH: f64 = 300.0;
const DEFAULT_HEIGHT: f64 = 30.0;
const DEFAULT_BULLET_SIZE: f64 = 5.0;
const DEFAULT_FONT_SIZE: f64 = 14.0;
const BULLET_X: f64 = 40.0;
const BULLET_SPACING: f64 = 12.0;

pub(super) fn definition() -> ItemDefinition {
    ItemDefinition::new(render, [Composite::Label])
}

fn render(props: &ItemProps) -> Result<Node, ItemError> {
    let (config, rest) = resolve_props(
        props,
        &[
            "width",
            "bulletSize",
            "bulletType",
            "fontSize",
            "itemBackgroundAlpha",
        ],
    );
    let width = config.width_or(DEFAULT_WIDTH);
    let height = config.height_or(DEFAULT_HEIGHT);
    let bullet_size = config.number_or("bulletSize", DEFAULT_BULLET_SIZE);
    let font_size = config.number_or("fontSize", DEFAULT_FONT_SIZE);
    let bullet_type = config.str_or("bulletType", "circle");
    match bullet_type {
        "circle" | "none" => {}
        other => {
            return Err(ItemError::InvalidOption {
                item: NAME.to_string(),
                option: "bulletType".to_string(),
                message: format!("expected 'circle' or 'none', got '{}'", other),
            })
        }
    }

    let text_color = config.color_or("colorPrimary", "#1783FF");
    let bullet_gap = if bullet_type == "none" {
        0.0
    } else {
        bullet_size + BULLET_SPACING
    };
    let text_x = BULLET_X + bullet_gap;
    let content_y = font_size / 2.0;
    let text_width = (width - 2.0 * BULLET_X - bullet_gap).max(0.0);

    let mut group = Node::group().props(rest.clone());
    if bullet_type == "circle" {
        group = group.child(
            Node::ellipse()
                .prop("x", BULLET_X)
                .prop("y", content_y)
                .prop("width", bullet_size)
                .prop("height", bullet_size)
                .prop("fill", text_color),
        );
    }

    let datum = &config.datum;
    let text = datum
        .label
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(datum.desc.as_deref())
        .unwrap_or_default();
    group = group.child(
        item_label(&config.indexes, text)
            .props(rest)
            .prop("x", text_x)
            .prop("y", content_y - font_size / 2.0)
            .prop("width", text_width)
            .prop("height", height)
            .prop("fill", text_color)
            .prop("fontSize", font_size)
            .prop("fontWeight", "regular")
            .prop("alignHorizontal", "left")
            .prop("alignVertical", "top"),
    );

    Ok(group)
}

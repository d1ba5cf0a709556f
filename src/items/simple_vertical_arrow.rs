//! Label and description beside a downward arrow carrying the item number

use crate::layout::{AlignItems, AlignLayout, FlexLayout, Point};
use crate::node::Node;
use crate::props::{resolve_props, ItemConfig, ItemProps, PositionH};

use super::components::{item_desc, item_label};
use super::{Composite, ItemDefinition, ItemError};

pub(super) const NAME: &str = "simple-vertical-arrow";

const DEFAULT_HEIGHT: f64 = 140.0;
const LABEL_GAP: f64 = 15.0;
const ARROW_WIDTH: f64 = 30.0;
const TEXT_WIDTH: f64 = 120.0;
/// Depth of the notch at the top and the point at the bottom
const ARROW_TIP: f64 = 10.0;

pub(super) fn definition() -> ItemDefinition {
    ItemDefinition::new(render, [Composite::Label, Composite::Desc])
}

fn render(props: &ItemProps) -> Result<Node, ItemError> {
    let (config, rest) = resolve_props(props, &["height"]);
    let height = config.height_or(DEFAULT_HEIGHT);
    let total_width = TEXT_WIDTH + LABEL_GAP + ARROW_WIDTH + LABEL_GAP + TEXT_WIDTH;

    let mut row = Node::flex(FlexLayout::row().with_align_items(AlignItems::Center));
    row = match config.position_h {
        PositionH::Normal => row
            .child(text_column(&config, AlignItems::FlexEnd, "right"))
            .child(Node::gap(LABEL_GAP, 0.0)),
        PositionH::Flipped => row.child(Node::gap(TEXT_WIDTH + LABEL_GAP, 0.0)),
    };
    row = row.child(numbered_arrow(&config, height));
    row = match config.position_h {
        PositionH::Normal => row.child(Node::gap(TEXT_WIDTH + LABEL_GAP, 0.0)),
        PositionH::Flipped => row
            .child(Node::gap(LABEL_GAP, 0.0))
            .child(text_column(&config, AlignItems::FlexStart, "left")),
    };

    Ok(Node::group()
        .prop("width", total_width)
        .prop("height", height)
        .props(rest)
        .child(row))
}

fn text_column(config: &ItemConfig, align: AlignItems, text_align: &str) -> Node {
    let datum = &config.datum;
    let label = item_label(&config.indexes, datum.label.as_deref().unwrap_or_default())
        .prop("width", TEXT_WIDTH)
        .prop("fill", config.color_or("colorText", "#262626"))
        .prop("alignHorizontal", text_align)
        .prop("alignVertical", "center")
        .prop("fontSize", 14);
    let desc = item_desc(&config.indexes, datum.desc.as_deref().unwrap_or_default())
        .prop("width", TEXT_WIDTH)
        .prop("fill", config.color_or("colorTextSecondary", "#8c8c8c"))
        .prop("alignHorizontal", text_align)
        .prop("alignVertical", "top");

    Node::flex(FlexLayout::column().with_align_items(align))
        .child(label)
        .child(desc)
}

fn numbered_arrow(config: &ItemConfig, height: f64) -> Node {
    let number = config.indexes.first().map_or(0, |i| i + 1) % 100;

    Node::align(AlignLayout::centered())
        .child(
            Node::polygon(arrow_points(ARROW_WIDTH, height, ARROW_TIP))
                .prop("width", ARROW_WIDTH)
                .prop("height", height)
                .prop("fill", config.color_or("colorPrimary", "#1890FF")),
        )
        .child(
            Node::text(format!("{:02}", number))
                .prop("width", ARROW_WIDTH)
                .prop("height", height)
                .prop("alignHorizontal", "center")
                .prop("alignVertical", "center")
                .prop("fill", config.color_or("colorWhite", "#ffffff"))
                .prop("fontWeight", "bold")
                .prop("fontSize", 16),
        )
}

/// Arrow outline with a notched top and pointed bottom
fn arrow_points(width: f64, height: f64, tip: f64) -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(width / 2.0, tip),
        Point::new(width, 0.0),
        Point::new(width, height - tip),
        Point::new(width / 2.0, height),
        Point::new(0.0, height - tip),
    ]
}

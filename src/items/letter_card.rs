//! Card showing the first letter of the label large, with the label as title

use crate::node::Node;
use crate::props::{index_key, resolve_props, ItemProps};
use crate::theme::color;

use super::components::item_label;
use super::{Composite, ItemDefinition, ItemError};

pub(super) const NAME: &str = "letter-card";

const DEFAULT_WIDTH: f64 = 280.0;
const DEFAULT_HEIGHT: f64 = 160.0;
const STRIPE_WIDTH: f64 = 4.0;
const STRIPE_GAP: f64 = 6.0;
const STRIPE_ROTATION: f64 = 45.0;
const BOTTOM_SHADE_HEIGHT: f64 = 40.0;
const GRADIENT_LIGHTEN: f64 = 12.0;
const GRADIENT_DARKEN: f64 = 4.0;

pub(super) fn definition() -> ItemDefinition {
    ItemDefinition::new(render, [Composite::Label])
}

fn render(props: &ItemProps) -> Result<Node, ItemError> {
    let (config, rest) = resolve_props(props, &["showStripe", "showGradient", "showBottomShade"]);
    let width = config.width_or(DEFAULT_WIDTH);
    let height = config.height_or(DEFAULT_HEIGHT);
    let show_stripe = config.bool_or("showStripe", true);
    let show_gradient = config.bool_or("showGradient", true);
    let show_bottom_shade = config.bool_or("showBottomShade", true);

    let base = config.color_or("colorPrimary", "#1783FF");
    let id = format!("letter-card-{}", index_key(&config.indexes));
    let gradient_id = format!("{}-gradient", id);
    let pattern_id = format!("{}-pattern", id);
    let shade_id = format!("{}-shade", id);

    let mut defs = Node::defs();
    if show_gradient {
        defs = defs.child(linear_gradient(
            &gradient_id,
            "100%",
            &color::darken(base, GRADIENT_DARKEN),
            &color::lighten(base, GRADIENT_LIGHTEN),
        ));
    }
    if show_stripe {
        defs = defs.child(stripe_pattern(&pattern_id));
    }
    if show_bottom_shade {
        defs = defs.child(linear_gradient(&shade_id, "0%", "rgba(0,0,0,0)", "rgba(0,0,0,0.16)"));
    }

    let background = if show_gradient {
        url(&gradient_id)
    } else {
        base.to_string()
    };
    let mut card = Node::group()
        .props(rest)
        .child(defs)
        .child(panel(0.0, width, height, background));
    if show_stripe {
        card = card.child(panel(0.0, width, height, url(&pattern_id)));
    }
    if show_bottom_shade {
        card = card.child(panel(
            height - BOTTOM_SHADE_HEIGHT,
            width,
            BOTTOM_SHADE_HEIGHT,
            url(&shade_id),
        ));
    }

    let label = config.datum.label.as_deref().unwrap_or_default();
    if let Some(letter) = label.chars().next() {
        card = card.child(
            item_label(&config.indexes, &letter.to_uppercase().to_string())
                .prop("x", 0)
                .prop("y", 16)
                .prop("width", width)
                .prop("fontSize", 96)
                .prop("fontWeight", "bold")
                .prop("fill", "#FFFFFF")
                .prop("alignHorizontal", "center")
                .prop("alignVertical", "top")
                .prop("lineHeight", 1),
        );
    }
    card = card.child(
        item_label(&config.indexes, &label.to_uppercase())
            .prop("x", 0)
            .prop("y", height - 40.0)
            .prop("width", width)
            .prop("fontSize", 16)
            .prop("fontWeight", "bold")
            .prop("fill", "#FFFFFF")
            .prop("alignHorizontal", "center")
            .prop("alignVertical", "center")
            .prop("lineHeight", 1),
    );

    Ok(card)
}

fn url(id: &str) -> String {
    format!("url(#{})", id)
}

fn panel(y: f64, width: f64, height: f64, fill: String) -> Node {
    Node::rect()
        .prop("x", 0)
        .prop("y", y)
        .prop("width", width)
        .prop("height", height)
        .prop("fill", fill)
        .prop("rx", 0)
        .prop("ry", 0)
}

/// Two-stop gradient from the top-left corner; `x2` picks diagonal or vertical
fn linear_gradient(id: &str, x2: &str, from: &str, to: &str) -> Node {
    Node::definition("linearGradient")
        .prop("id", id)
        .prop("x1", "0%")
        .prop("y1", "0%")
        .prop("x2", x2)
        .prop("y2", "100%")
        .child(Node::definition("stop").prop("offset", "0%").prop("stopColor", from))
        .child(Node::definition("stop").prop("offset", "100%").prop("stopColor", to))
}

fn stripe_pattern(id: &str) -> Node {
    let tile = STRIPE_WIDTH + STRIPE_GAP;
    Node::definition("pattern")
        .prop("id", id)
        .prop("patternUnits", "userSpaceOnUse")
        .prop("width", tile)
        .prop("height", tile)
        .prop("patternTransform", format!("rotate({})", STRIPE_ROTATION))
        .child(stripe_rect(tile, "rgba(255, 255, 255, 0)"))
        .child(stripe_rect(STRIPE_WIDTH, "rgba(0, 0, 0, 0.03)"))
}

fn stripe_rect(width: f64, fill: &str) -> Node {
    let tile = STRIPE_WIDTH + STRIPE_GAP;
    Node::definition("rect")
        .prop("x", 0)
        .prop("y", 0)
        .prop("width", width)
        .prop("height", tile)
        .prop("fill", fill)
}

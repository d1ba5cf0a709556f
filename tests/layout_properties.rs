//! Integration tests for flex and overlay placement.
//!
//! Trees are built directly from nodes and laid out with the default
//! configuration, so every expected coordinate below is exact.

use infographic::layout::{
    layout, measure, AlignItems, AlignLayout, Alignment, Bounds, FlexLayout, JustifyContent,
    LayoutConfig, LayoutKind, Point, Size,
};
use infographic::node::Node;
use infographic::{evaluate, Datum, Infographic, ItemContext, ItemProps, ThemeColors};

fn rect(width: f64, height: f64) -> Node {
    Node::rect().prop("width", width).prop("height", height)
}

fn lay_out(node: &Node) -> infographic::LayoutNode {
    layout(node, Point::default(), &LayoutConfig::default())
}

// ============================================
// Sequential distribution
// ============================================

#[test]
fn test_row_with_spacer_extent_and_centering() {
    let tree = Node::flex(FlexLayout::row().with_align_items(AlignItems::Center)).children([
        rect(50.0, 20.0),
        Node::gap(10.0, 0.0),
        rect(30.0, 40.0),
        rect(70.0, 10.0),
    ]);

    let result = lay_out(&tree);
    assert_eq!(result.bounds, Bounds::new(0.0, 0.0, 160.0, 40.0));

    let children = &result.children;
    assert_eq!(children[0].bounds, Bounds::new(0.0, 10.0, 50.0, 20.0));
    assert_eq!(children[1].kind, LayoutKind::Gap);
    assert_eq!(children[1].bounds.x, 50.0);
    assert_eq!(children[2].bounds, Bounds::new(60.0, 0.0, 30.0, 40.0));
    assert_eq!(children[3].bounds, Bounds::new(90.0, 15.0, 70.0, 10.0));

    for (child, cross) in [(&children[0], 20.0), (&children[2], 40.0), (&children[3], 10.0)] {
        assert_eq!(child.bounds.y, (40.0 - cross) / 2.0);
    }
}

#[test]
fn test_column_with_gap_places_in_declaration_order() {
    let tree = Node::flex(FlexLayout::column().with_gap(20.0))
        .children([rect(40.0, 40.0), rect(60.0, 40.0), rect(20.0, 40.0)]);

    let result = lay_out(&tree);
    assert_eq!(result.bounds.size(), Size::new(60.0, 160.0));

    let ys: Vec<f64> = result.children.iter().map(|c| c.bounds.y).collect();
    assert_eq!(ys, vec![0.0, 60.0, 120.0]);
    assert!(result.children.iter().all(|c| c.bounds.x == 0.0));
}

#[test]
fn test_stretch_fills_cross_axis() {
    let tree = Node::flex(FlexLayout::column().with_align_items(AlignItems::Stretch))
        .children([rect(50.0, 10.0), rect(20.0, 10.0)]);

    let result = lay_out(&tree);
    assert!(result.children.iter().all(|c| c.bounds.width == 50.0));
}

#[test]
fn test_justify_content_distributes_declared_width() {
    let row = |justify| {
        Node::flex(FlexLayout::row().with_justify_content(justify))
            .prop("width", 100.0)
            .children([rect(10.0, 10.0), rect(10.0, 10.0), rect(10.0, 10.0)])
    };

    let xs = |justify| -> Vec<f64> {
        lay_out(&row(justify))
            .children
            .iter()
            .map(|c| c.bounds.x)
            .collect()
    };

    assert_eq!(xs(JustifyContent::FlexStart), vec![0.0, 10.0, 20.0]);
    assert_eq!(xs(JustifyContent::Center), vec![35.0, 45.0, 55.0]);
    assert_eq!(xs(JustifyContent::FlexEnd), vec![70.0, 80.0, 90.0]);
    assert_eq!(xs(JustifyContent::SpaceBetween), vec![0.0, 45.0, 90.0]);
}

#[test]
fn test_overflowing_row_is_not_pulled_back() {
    let tree = Node::flex(FlexLayout::row().with_justify_content(JustifyContent::Center))
        .prop("width", 10.0)
        .children([rect(20.0, 10.0), rect(20.0, 10.0)]);

    let result = lay_out(&tree);
    assert_eq!(result.children[0].bounds.x, 0.0);
    assert_eq!(result.children[1].bounds.x, 20.0);
}

// ============================================
// Overlay alignment
// ============================================

#[test]
fn test_overlay_centers_each_child_independently() {
    let tree = Node::align(AlignLayout::centered()).children([rect(40.0, 40.0), rect(20.0, 10.0)]);

    let result = lay_out(&tree);
    assert_eq!(result.bounds.size(), Size::new(40.0, 40.0));
    assert_eq!(result.children[0].bounds, Bounds::new(0.0, 0.0, 40.0, 40.0));
    assert_eq!(result.children[1].bounds, Bounds::new(10.0, 15.0, 20.0, 10.0));
}

#[test]
fn test_overlay_end_alignment() {
    let tree = Node::align(AlignLayout::new(Alignment::End, Alignment::Start))
        .children([rect(30.0, 30.0), rect(10.0, 10.0)]);

    let result = lay_out(&tree);
    assert_eq!(result.children[1].bounds, Bounds::new(20.0, 0.0, 10.0, 10.0));
}

// ============================================
// Nesting and absolute coordinates
// ============================================

#[test]
fn test_nested_containers_use_absolute_coordinates() {
    let inner = Node::flex(FlexLayout::row()).children([rect(10.0, 10.0), rect(10.0, 10.0)]);
    let tree = Node::flex(FlexLayout::column()).children([rect(5.0, 30.0), inner]);

    let result = layout(&tree, Point::new(100.0, 50.0), &LayoutConfig::default());
    let row = &result.children[1];
    assert_eq!(row.bounds.origin(), Point::new(100.0, 80.0));
    assert_eq!(row.children[1].bounds.origin(), Point::new(110.0, 80.0));
}

#[test]
fn test_group_children_keep_their_offsets() {
    let tree = Node::group().children([
        rect(10.0, 10.0).prop("x", 5.0).prop("y", 5.0),
        rect(10.0, 10.0).prop("x", 30.0),
    ]);

    let result = lay_out(&tree);
    assert_eq!(result.bounds.size(), Size::new(40.0, 15.0));
    assert_eq!(result.children[1].bounds.origin(), Point::new(30.0, 0.0));
}

// ============================================
// Robustness
// ============================================

#[test]
fn test_invalid_sizes_clamp_to_zero() {
    let tree = Node::flex(FlexLayout::row()).children([
        rect(-5.0, 10.0),
        rect(f64::NAN, 10.0),
        rect(f64::INFINITY, 10.0),
        rect(10.0, 10.0),
    ]);

    let result = lay_out(&tree);
    assert_eq!(result.bounds.width, 10.0);
    assert!(result
        .descendants()
        .iter()
        .all(|n| n.bounds.width.is_finite() && n.bounds.width >= 0.0));
}

#[test]
fn test_invalid_gaps_clamp_to_zero() {
    for gap in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, -12.0] {
        let tree = Node::flex(FlexLayout::row().with_gap(gap))
            .children([rect(10.0, 10.0), rect(20.0, 10.0)]);

        let result = lay_out(&tree);
        assert_eq!(result.bounds, Bounds::new(0.0, 0.0, 30.0, 10.0), "gap {}", gap);
        assert_eq!(result.children[1].bounds.x, 10.0, "gap {}", gap);
    }
}

#[test]
fn test_document_with_nan_gap_stays_finite() {
    let doc = Infographic::from_str(
        r#"
[design]
item = "bullet-text"
gap = nan

[[data]]
label = "a"

[[data]]
label = "b"
"#,
    )
    .expect("nan is valid TOML");

    let evaluated = evaluate(&doc.to_tree().unwrap()).unwrap();
    let result = lay_out(&evaluated);
    let item_width = result.children[0].bounds.width;
    assert!(item_width > 0.0);
    assert_eq!(result.bounds.width, 2.0 * item_width);
    assert_eq!(result.children[1].bounds.x, item_width);
    assert!(result
        .descendants()
        .iter()
        .all(|n| n.bounds.x.is_finite() && n.bounds.y.is_finite()));
}

#[test]
fn test_empty_container_has_zero_size() {
    let config = LayoutConfig::default();
    assert_eq!(measure(&Node::flex(FlexLayout::row()), &config), Size::default());
    assert_eq!(measure(&Node::align(AlignLayout::centered()), &config), Size::default());
}

#[test]
fn test_layout_is_deterministic() {
    let tree = Node::flex(FlexLayout::column().with_gap(4.0).with_align_items(AlignItems::Center))
        .children([
            Node::text("Heading").prop("fontSize", 18),
            Node::align(AlignLayout::centered()).children([rect(30.0, 30.0), Node::text("01")]),
            rect(80.0, 12.0),
        ]);

    let first = lay_out(&tree);
    let second = lay_out(&tree);
    assert_eq!(first, second);
}

#[test]
fn test_evaluated_items_stack_in_a_column() {
    let items = (0..3).map(|i| {
        let context = ItemContext::new(
            Datum::label(format!("Step {}", i)).with_desc("details"),
            vec![i],
            ThemeColors::from_primary("#1783FF"),
        );
        Node::item("simple-vertical-arrow", ItemProps::new(context))
    });
    let tree = Node::flex(FlexLayout::column().with_gap(10.0)).children(items);

    let evaluated = evaluate(&tree).expect("built-in item");
    let result = lay_out(&evaluated);
    assert_eq!(result.bounds.size(), Size::new(300.0, 3.0 * 140.0 + 20.0));
    assert_eq!(result.children[2].bounds.y, 300.0);
}

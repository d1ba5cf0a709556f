//! Integration tests for the item, palette and font catalogs.
//!
//! The catalogs are process-wide, so every name registered here carries a
//! `registry-test-` prefix to stay clear of other tests in this binary.

use std::collections::HashMap;

use futures::executor::block_on;
use futures::future::{self, BoxFuture, FutureExt};

use infographic::fonts::{
    decode_font_family, default_font, encode_font_family, get_font, get_font_urls, has_font,
    register_font, FontDescriptor, FontFetcher, FontFormat, FontLoadError, FontLoader,
    FontStatus,
};
use infographic::items::{get_item, item_names};
use infographic::node::{HostKind, Node, NodeKind};
use infographic::theme::palette_names;
use infographic::{
    evaluate, get_palette, register_item, register_palette, render_toml, Catalog, Composite,
    ConfigurationError, Datum, ItemContext, ItemDefinition, ItemError, ItemProps, ThemeColors,
};

fn props(label: &str) -> ItemProps {
    ItemProps::new(ItemContext::new(
        Datum::label(label),
        vec![0],
        ThemeColors::from_primary("#1783FF"),
    ))
}

fn badge() -> ItemDefinition {
    ItemDefinition::new(
        |props: &ItemProps| {
            let label = props
                .context
                .datum
                .label
                .clone()
                .ok_or_else(|| ItemError::MissingField {
                    item: "registry-test-badge".to_string(),
                    field: "label".to_string(),
                })?;
            let fill = props
                .context
                .theme_colors
                .color_primary
                .clone()
                .unwrap_or_else(|| "#000000".to_string());
            Ok(Node::group()
                .prop("width", 80)
                .prop("height", 24)
                .child(Node::rect().prop("width", 80).prop("height", 24).prop("fill", fill))
                .child(Node::text(label).prop("x", 8)))
        },
        [Composite::Label],
    )
}

fn contains_item(node: &Node) -> bool {
    node.is_item() || node.children.iter().any(contains_item)
}

// ============================================
// Items
// ============================================

#[test]
fn test_custom_item_renders_through_document() {
    register_item("registry-test-badge", badge());

    let svg = render_toml(
        r#"
[design]
item = "registry-test-badge"

[[data]]
label = "Shipped"
desc = "not displayed"
"#,
    )
    .expect("registered item should render");

    assert!(svg.contains("Shipped"));
    assert!(!svg.contains("not displayed"));
    assert!(svg.contains(r##"fill="#1783FF""##));
}

#[test]
fn test_nested_item_references_are_expanded() {
    register_item("registry-test-inner", badge());
    register_item(
        "registry-test-outer",
        ItemDefinition::new(
            |props: &ItemProps| {
                Ok(Node::group().child(Node::item("registry-test-inner", props.clone())))
            },
            [Composite::Label],
        ),
    );

    let tree = Node::group().child(Node::item("registry-test-outer", props("nested")));
    let evaluated = evaluate(&tree).expect("both items registered");
    assert!(!contains_item(&evaluated));
    assert_eq!(evaluated.children[0].children[0].number("width"), Some(80.0));
}

#[test]
fn test_circular_item_becomes_placeholder() {
    register_item(
        "registry-test-loop",
        ItemDefinition::new(
            |props: &ItemProps| Ok(Node::item("registry-test-loop", props.clone())),
            [Composite::Label],
        ),
    );

    let tree = Node::item("registry-test-loop", props("x").with_attr("width", 50));
    let evaluated = evaluate(&tree).expect("cycle degrades instead of failing");
    assert_eq!(evaluated.kind, NodeKind::Host(HostKind::Group));
    assert!(evaluated.children.is_empty());
    assert_eq!(evaluated.number("width"), Some(50.0));
}

#[test]
fn test_failing_item_does_not_blank_its_siblings() {
    register_item("registry-test-strict", badge());

    let unlabeled = ItemProps::new(ItemContext::default());
    let tree = Node::group().children([
        Node::item("registry-test-strict", unlabeled),
        Node::item("registry-test-strict", props("kept")),
    ]);

    let evaluated = evaluate(&tree).expect("item errors are contained");
    assert!(evaluated.children[0].children.is_empty());
    assert_eq!(evaluated.children[1].children.len(), 2);
}

#[test]
fn test_unknown_item_fails_loudly() {
    let err = get_item("registry-test-absent").unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::not_found(Catalog::Item, "registry-test-absent")
    );

    let tree = Node::group().child(Node::item("registry-test-absent", props("a")));
    assert!(evaluate(&tree).is_err());
}

#[test]
fn test_reregistering_an_item_overwrites_in_place() {
    register_item(
        "registry-test-replaced",
        ItemDefinition::new(|_: &ItemProps| Ok(Node::rect()), [Composite::Label]),
    );
    let position = item_names()
        .iter()
        .position(|n| n == "registry-test-replaced");

    register_item(
        "registry-test-replaced",
        ItemDefinition::new(|_: &ItemProps| Ok(Node::ellipse()), [Composite::Desc]),
    );

    let names = item_names();
    assert_eq!(names.iter().filter(|n| *n == "registry-test-replaced").count(), 1);
    assert_eq!(names.iter().position(|n| n == "registry-test-replaced"), position);

    let definition = get_item("registry-test-replaced").unwrap();
    assert!(definition.supports(Composite::Desc));
    assert!(!definition.supports(Composite::Label));
    let rendered = definition.render(&props("a")).unwrap();
    assert_eq!(rendered.kind, NodeKind::Host(HostKind::Ellipse));
}

// ============================================
// Palettes
// ============================================

#[test]
fn test_registered_palette_cycles_by_index() {
    register_palette(
        "registry-test-duo",
        vec![
            ThemeColors::from_primary("#AA0000"),
            ThemeColors::from_primary("#0000AA"),
        ],
    )
    .unwrap();
    assert!(palette_names().contains(&"registry-test-duo".to_string()));
    assert_eq!(get_palette("registry-test-duo").unwrap().len(), 2);

    register_item("registry-test-swatch", badge());
    let svg = render_toml(
        r#"
[design]
item = "registry-test-swatch"
palette = "registry-test-duo"

[[data]]
label = "a"

[[data]]
label = "b"

[[data]]
label = "c"
"#,
    )
    .unwrap();

    assert_eq!(svg.matches(r##"fill="#AA0000""##).count(), 2);
    assert_eq!(svg.matches(r##"fill="#0000AA""##).count(), 1);
}

#[test]
fn test_reregistering_a_palette_replaces_it() {
    register_palette("registry-test-p", vec![ThemeColors::from_primary("#010101")]).unwrap();
    register_palette(
        "registry-test-p",
        vec![
            ThemeColors::from_primary("#020202"),
            ThemeColors::from_primary("#030303"),
        ],
    )
    .unwrap();

    let palette = get_palette("registry-test-p").unwrap();
    assert_eq!(palette.len(), 2);
    assert_eq!(palette[0].color_primary.as_deref(), Some("#020202"));
}

#[test]
fn test_empty_palette_is_rejected() {
    let err = register_palette("registry-test-empty", vec![]).unwrap_err();
    assert!(matches!(err, ConfigurationError::EmptyPalette { .. }));
    assert!(get_palette("registry-test-empty").is_err());
}

#[test]
fn test_unknown_palette_fails_loudly() {
    let err = get_palette("registry-test-no-such-palette").unwrap_err();
    assert_eq!(err.missing_name(), Some("registry-test-no-such-palette"));
}

// ============================================
// Fonts
// ============================================

#[test]
fn test_unknown_font_falls_back_to_default() {
    assert!(!has_font("registry-test-no-font"));
    let font = get_font("registry-test-no-font");
    assert_eq!(font, get_font(&default_font()));
}

#[test]
fn test_custom_font_urls_are_verbatim() {
    register_font(
        FontDescriptor::new("registry-test-font", "Registry Test Sans")
            .with_source(FontFormat::Woff2, "https://cdn.example.com/rts.woff2")
            .with_source(FontFormat::Woff, "https://cdn.example.com/rts.woff"),
    );
    assert!(has_font("registry-test-font"));
    assert_eq!(
        get_font_urls("registry-test-font"),
        vec![
            "https://cdn.example.com/rts.woff2".to_string(),
            "https://cdn.example.com/rts.woff".to_string(),
        ]
    );
}

#[test]
fn test_font_family_token_reverses() {
    let token = encode_font_family("Source Han Sans");
    assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    assert_eq!(decode_font_family(&token).as_deref(), Some("Source Han Sans"));
    assert_eq!(decode_font_family("Source Han Sans"), None);
}

/// Serves bytes for known URLs, fails unknown ones, and never answers
/// URLs starting with `pending:`
struct TableFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl FontFetcher for TableFetcher {
    fn fetch(&self, url: &str) -> BoxFuture<'static, Result<Vec<u8>, FontLoadError>> {
        if url.starts_with("pending:") {
            return future::pending().boxed();
        }
        let result = self
            .files
            .get(url)
            .cloned()
            .ok_or_else(|| FontLoadError::fetch(url, "404"));
        future::ready(result).boxed()
    }
}

fn table_loader() -> FontLoader {
    let mut files = HashMap::new();
    files.insert("https://fonts.test/good.woff2".to_string(), vec![1, 2, 3]);
    FontLoader::new(TableFetcher { files })
}

#[test]
fn test_font_batch_isolates_failures() {
    register_font(
        FontDescriptor::new("registry-test-good", "Good")
            .with_source(FontFormat::Woff2, "https://fonts.test/good.woff2"),
    );
    register_font(
        FontDescriptor::new("registry-test-bad", "Bad")
            .with_source(FontFormat::Woff2, "https://fonts.test/missing.woff2"),
    );

    let loader = table_loader();
    let results = block_on(loader.load_fonts(&["registry-test-good", "registry-test-bad"]));

    assert_eq!(results[0], ("registry-test-good".to_string(), FontStatus::Ready));
    assert!(matches!(results[1].1, FontStatus::Failed(FontLoadError::Fetch { .. })));
    assert!(loader.is_ready("registry-test-good"));
    assert!(!loader.is_ready("registry-test-bad"));
    assert_eq!(loader.loaded("registry-test-good").unwrap().data.as_slice(), &[1, 2, 3]);

    // Loading again is a no-op for a ready font
    assert_eq!(block_on(loader.load_font("registry-test-good")), FontStatus::Ready);
}

#[test]
fn test_stalled_font_times_out_and_renders_with_default() {
    register_font(
        FontDescriptor::new("registry-test-stalled", "Stalled")
            .with_source(FontFormat::Woff2, "pending:stalled.woff2"),
    );

    let loader = table_loader();
    let status = block_on(loader.load_font_with_timeout("registry-test-stalled", future::ready(())));

    assert!(matches!(status, FontStatus::Failed(FontLoadError::TimedOut { .. })));
    assert_eq!(loader.status("registry-test-stalled"), Some(status));
    assert_eq!(
        loader.resolve_render_font("registry-test-stalled"),
        get_font(&default_font())
    );
}

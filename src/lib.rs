//! Infographic - a layout and theme engine for data-driven infographics
//!
//! This library turns a declarative node tree (or a TOML [`Infographic`]
//! document) into positioned SVG. Registered items expand data records into
//! drawing primitives, palettes color them by position, and a flex/overlay
//! layout engine places everything.
//!
//! # Example
//!
//! ```rust
//! use infographic::render_toml;
//!
//! let svg = render_toml(r#"
//!     [design]
//!     item = "bullet-text"
//!
//!     [[data]]
//!     label = "First point"
//! "#).unwrap();
//! assert!(svg.contains("<svg"));
//! assert!(svg.contains("First point"));
//! ```

pub mod document;
pub mod error;
pub mod fonts;
pub mod items;
pub mod layout;
pub mod node;
pub mod props;
pub mod registry;
pub mod renderer;
pub mod resource;
pub mod theme;

pub use document::{Design, DocumentError, Infographic};
pub use error::{Catalog, ConfigurationError};
pub use items::{evaluate, get_item, register_item, Composite, ItemDefinition, ItemError};
pub use layout::{layout as compute_layout, Bounds, LayoutConfig, LayoutNode, Point};
pub use node::{HostKind, Node, NodeKind};
pub use props::{resolve_props, Datum, ItemConfig, ItemContext, ItemProps, PositionH, PropValue, Props};
pub use renderer::{render_svg, render_svg_with_font, SvgConfig};
pub use theme::{get_palette, register_palette, Palette, PaletteError, ThemeColors};

use thiserror::Error;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// Unknown item, palette or font
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Document could not be read or parsed
    #[error("document error: {0}")]
    Document(#[from] DocumentError),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout configuration
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
    /// Palette overriding the one named by the document
    pub palette: Option<Palette>,
    /// Debug mode: print the laid-out tree to stderr
    pub debug: bool,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }

    /// Use this palette instead of the document's named palette
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Enable or disable debug mode
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Render a document to SVG with default configuration
pub fn render(doc: &Infographic) -> Result<String, RenderError> {
    render_with_config(doc, RenderConfig::default())
}

/// Render a document to SVG with custom configuration
///
/// # Example
///
/// ```rust
/// use infographic::{render_with_config, Datum, Design, Infographic, RenderConfig, SvgConfig};
///
/// let doc = Infographic::new(
///     Design::new("letter-card"),
///     vec![Datum::label("alpha"), Datum::label("beta")],
/// );
/// let config = RenderConfig::new().with_svg(SvgConfig::default().with_viewbox_padding(0.0));
///
/// let svg = render_with_config(&doc, config).unwrap();
/// assert!(svg.contains("letter-card-1-gradient"));
/// ```
pub fn render_with_config(doc: &Infographic, config: RenderConfig) -> Result<String, RenderError> {
    let tree = match &config.palette {
        Some(palette) => doc.to_tree_with_palette(palette)?,
        None => doc.to_tree()?,
    };
    let font = doc.design.font.clone().unwrap_or_else(fonts::default_font);
    render_tree(&tree, &font, &config)
}

/// Parse a TOML document and render it with default configuration
pub fn render_toml(source: &str) -> Result<String, RenderError> {
    let doc = Infographic::from_str(source)?;
    render(&doc)
}

/// Evaluate, lay out and serialize an arbitrary node tree.
///
/// `font` is looked up in the font catalog, falling back to the default font.
pub fn render_tree(tree: &Node, font: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let evaluated = evaluate(tree)?;
    let result = layout::layout(&evaluated, Point::default(), &config.layout);

    let outline = layout::debug_tree(&result);
    log::debug!("layout:\n{}", outline);
    if config.debug {
        eprintln!("=== Layout Debug ===");
        eprint!("{}", outline);
        eprintln!("====================");
    }

    let font = fonts::get_font(font);
    Ok(render_svg_with_font(&result, &config.svg, &font))
}

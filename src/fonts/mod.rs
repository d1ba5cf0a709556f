//! Font catalog
//!
//! Unlike items and palettes, an unknown font name is never an error: lookups
//! fall back to the designated default font so a document always renders.

mod loader;

pub use loader::{FontFetcher, FontLoadError, FontLoader, FontStatus, LoadedFont};

use std::sync::{OnceLock, PoisonError, RwLock};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use crate::error::{Catalog, ConfigurationError};
use crate::registry::{self, Registry};

/// Font used when a requested name is not registered
pub const DEFAULT_FONT: &str = "Alibaba PuHuiTi";

const DEFAULT_WOFF2_BASE_URL: &str = "/fonts/woff2";

const FAMILY_TOKEN_PREFIX: &str = "ff-";

/// Container format of a font source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFormat {
    Woff2,
    Woff,
    TrueType,
}

impl FontFormat {
    /// Value for the `format()` hint of an `@font-face` source
    pub fn css_format(&self) -> &'static str {
        match self {
            FontFormat::Woff2 => "woff2",
            FontFormat::Woff => "woff",
            FontFormat::TrueType => "truetype",
        }
    }
}

/// One loadable file of a font
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub format: FontFormat,
    /// Absolute URL, or a path relative to the woff2 base for built-in fonts
    pub url: String,
}

/// A registered font
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Logical name used for lookups
    pub name: String,
    /// CSS family name
    pub font_family: String,
    pub sources: Vec<FontSource>,
    pub built_in: bool,
}

impl FontDescriptor {
    /// A custom font served from absolute URLs
    pub fn new(name: impl Into<String>, font_family: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            font_family: font_family.into(),
            sources: vec![],
            built_in: false,
        }
    }

    /// Add a loadable source
    pub fn with_source(mut self, format: FontFormat, url: impl Into<String>) -> Self {
        self.sources.push(FontSource {
            format,
            url: url.into(),
        });
        self
    }

    fn built_in(name: &str, family: &str, file: &str) -> Self {
        Self {
            name: name.to_string(),
            font_family: family.to_string(),
            sources: vec![FontSource {
                format: FontFormat::Woff2,
                url: file.to_string(),
            }],
            built_in: true,
        }
    }

    /// Token identifying this font's family in attributes and ids
    pub fn encoded_family(&self) -> String {
        encode_font_family(&self.font_family)
    }
}

fn built_in_fonts() -> Vec<FontDescriptor> {
    vec![
        FontDescriptor::built_in(DEFAULT_FONT, "Alibaba PuHuiTi", "alibaba-puhuiti.woff2"),
        FontDescriptor::built_in("Source Han Sans", "Source Han Sans", "source-han-sans.woff2"),
        FontDescriptor::built_in("LXGW WenKai", "LXGW WenKai", "lxgw-wenkai.woff2"),
    ]
}

fn fonts() -> &'static RwLock<Registry<FontDescriptor>> {
    static FONTS: OnceLock<RwLock<Registry<FontDescriptor>>> = OnceLock::new();
    FONTS.get_or_init(|| {
        let mut registry = Registry::new();
        for font in built_in_fonts() {
            registry.register(font.name.clone(), font);
        }
        RwLock::new(registry)
    })
}

fn default_font_name() -> &'static RwLock<String> {
    static DEFAULT: OnceLock<RwLock<String>> = OnceLock::new();
    DEFAULT.get_or_init(|| RwLock::new(DEFAULT_FONT.to_string()))
}

fn woff2_base_url() -> &'static RwLock<String> {
    static BASE: OnceLock<RwLock<String>> = OnceLock::new();
    BASE.get_or_init(|| RwLock::new(DEFAULT_WOFF2_BASE_URL.to_string()))
}

/// Register (or overwrite) a font under its logical name
pub fn register_font(descriptor: FontDescriptor) {
    registry::write(fonts()).register(descriptor.name.clone(), descriptor);
}

/// Name of the current default font
pub fn default_font() -> String {
    default_font_name()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Change the default font; the name must already be registered
pub fn set_default_font(name: &str) -> Result<(), ConfigurationError> {
    if !registry::read(fonts()).contains(name) {
        return Err(ConfigurationError::not_found(Catalog::Font, name));
    }
    *default_font_name()
        .write()
        .unwrap_or_else(PoisonError::into_inner) = name.to_string();
    Ok(())
}

/// Look up a font, falling back to the default font for unknown names
pub fn get_font(name: &str) -> FontDescriptor {
    let fonts = registry::read(fonts());
    if let Some(font) = fonts.get(name) {
        return font.clone();
    }
    let default = default_font();
    log::debug!("font '{}' not registered, using '{}'", name, default);
    fonts
        .get(&default)
        .or_else(|| fonts.get(DEFAULT_FONT))
        .cloned()
        .unwrap_or_else(|| FontDescriptor::new(DEFAULT_FONT, DEFAULT_FONT))
}

/// Whether a font name is registered (no fallback)
pub fn has_font(name: &str) -> bool {
    registry::read(fonts()).contains(name)
}

/// All registered fonts in registration order
pub fn get_fonts() -> Vec<FontDescriptor> {
    registry::read(fonts())
        .list()
        .map(|(_, font)| font.clone())
        .collect()
}

/// Base URL that built-in font files are resolved against
pub fn get_woff2_base_url() -> String {
    woff2_base_url()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Change where built-in font files are served from
pub fn set_woff2_base_url(url: impl Into<String>) {
    *woff2_base_url()
        .write()
        .unwrap_or_else(PoisonError::into_inner) = url.into();
}

/// Loadable URLs of a font (after default fallback), in preference order
pub fn get_font_urls(name: &str) -> Vec<String> {
    let font = get_font(name);
    font.sources
        .iter()
        .map(|source| source_url(&font, source))
        .collect()
}

/// Where one source of a font is served from.
///
/// Built-in fonts resolve their file name against the woff2 base URL; custom
/// fonts already carry absolute URLs.
pub fn source_url(font: &FontDescriptor, source: &FontSource) -> String {
    if !font.built_in {
        return source.url.clone();
    }
    let base = get_woff2_base_url();
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        source.url.trim_start_matches('/')
    )
}

/// Map a family name to a token safe for attribute values and ids
pub fn encode_font_family(family: &str) -> String {
    format!("{}{}", FAMILY_TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(family))
}

/// Reverse of [`encode_font_family`]; `None` for anything that is not a token
pub fn decode_font_family(token: &str) -> Option<String> {
    let encoded = token.strip_prefix(FAMILY_TOKEN_PREFIX)?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    String::from_utf8(bytes).ok()
}

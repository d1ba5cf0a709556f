//! Theme colors and the palette catalog
//!
//! A palette is an ordered list of color sets. Repeated items pick their set
//! by position, so the same index always gets the same colors.

pub mod color;

use std::path::Path;
use std::sync::{OnceLock, RwLock};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Catalog, ConfigurationError};
use crate::registry::{self, Registry};

/// Named colors available to an item.
///
/// Every field is optional: an item reads the subset it needs and supplies
/// its own fallback for anything absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_text_secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_white: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_primary_bg: Option<String>,
    /// Any additional named colors
    #[serde(flatten)]
    pub extra: IndexMap<String, String>,
}

impl ThemeColors {
    /// Derive a complete color set from a single primary color
    pub fn from_primary(primary: &str) -> Self {
        Self {
            color_primary: Some(primary.to_string()),
            color_secondary: Some(color::lighten(primary, 20.0)),
            color_text: Some("#262626".to_string()),
            color_text_secondary: Some("#8c8c8c".to_string()),
            color_white: Some("#ffffff".to_string()),
            color_bg: Some("#ffffff".to_string()),
            color_primary_bg: Some(color::lighten(primary, 40.0)),
            extra: IndexMap::new(),
        }
    }

    /// Look up a color by its camelCase name
    pub fn get(&self, name: &str) -> Option<&str> {
        let field = match name {
            "colorPrimary" => &self.color_primary,
            "colorSecondary" => &self.color_secondary,
            "colorText" => &self.color_text,
            "colorTextSecondary" => &self.color_text_secondary,
            "colorWhite" => &self.color_white,
            "colorBg" => &self.color_bg,
            "colorPrimaryBg" => &self.color_primary_bg,
            _ => return self.extra.get(name).map(|s| s.as_str()),
        };
        field.as_deref()
    }
}

/// Ordered color sets cycled across repeated items
pub type Palette = Vec<ThemeColors>;

/// Pick the color set for an item from its position.
///
/// Uses `indexes[0] mod palette.len()`; an empty index path counts as 0 and
/// an empty palette yields an empty color set.
pub fn resolve_theme(palette: &[ThemeColors], indexes: &[usize]) -> ThemeColors {
    if palette.is_empty() {
        return ThemeColors::default();
    }
    let index = indexes.first().copied().unwrap_or(0);
    palette[index % palette.len()].clone()
}

const ANTV: &[&str] = &[
    "#1783FF", "#00C9C9", "#F0884D", "#D580FF", "#7863FF", "#60C42D", "#BD8F24", "#FF80CA",
    "#2491B3", "#17C76F",
];

const SPECTRAL: &[&str] = &[
    "#9E0142", "#D53E4F", "#F46D43", "#FDAE61", "#FEE08B", "#E6F598", "#ABDDA4", "#66C2A5",
    "#3288BD", "#5E4FA2",
];

fn palette_from_primaries(primaries: &[&str]) -> Palette {
    primaries
        .iter()
        .map(|p| ThemeColors::from_primary(p))
        .collect()
}

fn palettes() -> &'static RwLock<Registry<Palette>> {
    static PALETTES: OnceLock<RwLock<Registry<Palette>>> = OnceLock::new();
    PALETTES.get_or_init(|| {
        let mut registry = Registry::new();
        registry.register("antv", palette_from_primaries(ANTV));
        registry.register("spectral", palette_from_primaries(SPECTRAL));
        RwLock::new(registry)
    })
}

/// Register (or overwrite) a palette in the process-wide catalog
pub fn register_palette(name: &str, colors: Palette) -> Result<(), ConfigurationError> {
    if colors.is_empty() {
        return Err(ConfigurationError::EmptyPalette {
            name: name.to_string(),
        });
    }
    registry::write(palettes()).register(name, colors);
    Ok(())
}

/// Look up a palette; an unknown name is a configuration error
pub fn get_palette(name: &str) -> Result<Palette, ConfigurationError> {
    registry::read(palettes())
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigurationError::not_found(Catalog::Palette, name))
}

/// All registered palettes in registration order
pub fn get_palettes() -> Vec<(String, Palette)> {
    registry::read(palettes())
        .list()
        .map(|(name, colors)| (name.to_string(), colors.clone()))
        .collect()
}

/// Names of all registered palettes in registration order
pub fn palette_names() -> Vec<String> {
    registry::read(palettes())
        .names()
        .map(|s| s.to_string())
        .collect()
}

/// Errors that can occur when loading palette files
#[derive(Error, Debug)]
pub enum PaletteError {
    #[error("Failed to read palette file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse palette TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// A palette loaded from a TOML file
#[derive(Debug, Clone)]
pub struct PaletteFile {
    pub name: Option<String>,
    pub description: Option<String>,
    pub colors: Palette,
}

#[derive(Deserialize)]
struct TomlPalette {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    primaries: Vec<String>,
    #[serde(default)]
    colors: Vec<ThemeColors>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

impl PaletteFile {
    /// Load a palette from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PaletteError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a palette from a TOML string.
    ///
    /// Explicit `[[colors]]` sets come first, followed by one derived set per
    /// entry of `primaries`.
    pub fn from_str(content: &str) -> Result<Self, PaletteError> {
        let parsed: TomlPalette = toml::from_str(content)?;
        let mut colors = parsed.colors;
        colors.extend(parsed.primaries.iter().map(|p| ThemeColors::from_primary(p)));

        Ok(PaletteFile {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primaries(colors: &[&str]) -> Palette {
        colors
            .iter()
            .map(|c| ThemeColors {
                color_primary: Some(c.to_string()),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_resolve_theme_cycles_by_first_index() {
        let palette = primaries(&["#a00", "#0a0", "#00a"]);
        let picked: Vec<_> = (0..5)
            .map(|i| resolve_theme(&palette, &[i]).color_primary.unwrap())
            .collect();
        assert_eq!(picked, vec!["#a00", "#0a0", "#00a", "#a00", "#0a0"]);
    }

    #[test]
    fn test_resolve_theme_ignores_nested_indexes() {
        let palette = primaries(&["#a00", "#0a0"]);
        assert_eq!(resolve_theme(&palette, &[1, 7]), palette[1]);
        assert_eq!(resolve_theme(&palette, &[]), palette[0]);
    }

    #[test]
    fn test_resolve_theme_empty_palette() {
        assert_eq!(resolve_theme(&[], &[3]), ThemeColors::default());
    }

    #[test]
    fn test_from_primary_fills_core_colors() {
        let colors = ThemeColors::from_primary("#1783FF");
        assert_eq!(colors.get("colorPrimary"), Some("#1783FF"));
        assert!(colors.get("colorSecondary").is_some());
        assert_eq!(colors.get("colorWhite"), Some("#ffffff"));
        assert_eq!(colors.get("colorUnknown"), None);
    }

    #[test]
    fn test_builtin_palettes_registered() {
        let names = palette_names();
        assert!(names.contains(&"antv".to_string()));
        assert!(names.contains(&"spectral".to_string()));
        assert_eq!(get_palette("antv").unwrap().len(), ANTV.len());

        let (name, spectral) = &get_palettes()[1];
        assert_eq!(name, "spectral");
        assert_eq!(spectral[0].color_primary.as_deref(), Some("#9E0142"));
    }

    #[test]
    fn test_register_empty_palette_rejected() {
        let result = register_palette("theme-test-empty", vec![]);
        assert!(matches!(result, Err(ConfigurationError::EmptyPalette { .. })));
        assert!(get_palette("theme-test-empty").is_err());
    }

    #[test]
    fn test_palette_file_from_str() {
        let toml_str = r##"
primaries = ["#ff0000"]

[metadata]
name = "Warm"

[[colors]]
colorPrimary = "#111111"
colorAccent = "#222222"
"##;
        let file = PaletteFile::from_str(toml_str).expect("should parse");
        assert_eq!(file.name, Some("Warm".to_string()));
        assert_eq!(file.colors.len(), 2);
        assert_eq!(file.colors[0].get("colorAccent"), Some("#222222"));
        assert_eq!(file.colors[1].get("colorPrimary"), Some("#ff0000"));
    }

    #[test]
    fn test_palette_file_invalid() {
        assert!(matches!(
            PaletteFile::from_str("colors = 3 {{"),
            Err(PaletteError::Parse(_))
        ));
        assert!(matches!(
            PaletteFile::from_file(Path::new("/nonexistent/palette.toml")),
            Err(PaletteError::Io(_))
        ));
    }
}

//! Setup-time error types shared by the catalogs

use std::fmt;

use thiserror::Error;

/// The process-wide catalogs that can be queried by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Item,
    Palette,
    Font,
}

impl Catalog {
    pub fn as_str(&self) -> &'static str {
        match self {
            Catalog::Item => "item",
            Catalog::Palette => "palette",
            Catalog::Font => "font",
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Misconfiguration detected while wiring a render together.
///
/// These are loud, developer-facing failures: an unknown item or palette name
/// means the integration is broken, so the responsible operation fails
/// instead of silently degrading.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Name not present in a catalog
    #[error("{catalog} not found: {name}")]
    NotFound { catalog: Catalog, name: String },

    /// A palette must contain at least one color set
    #[error("palette '{name}' has no color sets")]
    EmptyPalette { name: String },
}

impl ConfigurationError {
    /// Create a not-found error for the given catalog
    pub fn not_found(catalog: Catalog, name: impl Into<String>) -> Self {
        Self::NotFound {
            catalog,
            name: name.into(),
        }
    }

    /// Name of the missing entry, if this is a lookup failure
    pub fn missing_name(&self) -> Option<&str> {
        match self {
            Self::NotFound { name, .. } => Some(name),
            Self::EmptyPalette { .. } => None,
        }
    }
}

//! Configuration for the layout engine

/// Configuration options for layout computation
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Estimated glyph advance as a fraction of the font size
    pub char_width_ratio: f64,

    /// Line height as a multiple of the font size
    pub line_height: f64,

    /// Font size for text that does not declare one
    pub default_font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
            line_height: 1.4,
            default_font_size: 14.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the glyph advance ratio used to estimate text width
    pub fn with_char_width_ratio(mut self, ratio: f64) -> Self {
        self.char_width_ratio = ratio;
        self
    }

    /// Set the line height multiplier
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the fallback font size
    pub fn with_default_font_size(mut self, size: f64) -> Self {
        self.default_font_size = size;
        self
    }
}

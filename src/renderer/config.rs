//! Output options for the SVG serializer

/// How a laid-out infographic is written out
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Space kept around the content on every side of the viewBox
    pub viewbox_padding: f64,

    /// Emit an XML declaration before the root element
    pub standalone: bool,

    /// One element per line, indented by depth
    pub pretty_print: bool,

    /// Prefix for container classes and generated resource ids ("ig-" gives
    /// `ig-flex` and `ig-resource-0`)
    pub class_prefix: Option<String>,

    /// Canvas fill painted under everything, covering the padded viewBox
    pub background: Option<String>,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            viewbox_padding: 20.0,
            standalone: true,
            pretty_print: true,
            class_prefix: Some("ig-".to_string()),
            background: None,
        }
    }
}

impl SvgConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_viewbox_padding(mut self, padding: f64) -> Self {
        self.viewbox_padding = padding;
        self
    }

    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Use bare class names and resource ids
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Fill the canvas with `color`
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background = Some(color.into());
        self
    }
}

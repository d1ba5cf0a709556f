//! Infographic documents
//!
//! A document names one item design and lists the data records it repeats
//! over. Documents are written in TOML:
//!
//! ```toml
//! [design]
//! item = "simple-vertical-arrow"
//! palette = "antv"
//! direction = "column"
//! alternate = true
//!
//! [design.props]
//! height = 120
//!
//! [[data]]
//! label = "Plan"
//! desc = "Decide what to build"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigurationError;
use crate::items::get_item;
use crate::layout::{AlignItems, FlexDirection, FlexLayout, JustifyContent};
use crate::node::Node;
use crate::props::{Datum, ItemContext, ItemProps, PositionH, Props};
use crate::theme::{get_palette, resolve_theme, ThemeColors};

/// Errors that can occur when loading documents
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

fn default_palette() -> String {
    "antv".to_string()
}

/// How the records of a document are drawn and arranged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Design {
    /// Registered item drawn once per record
    pub item: String,
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default)]
    pub direction: FlexDirection,
    #[serde(default)]
    pub align: AlignItems,
    #[serde(default)]
    pub justify: JustifyContent,
    #[serde(default)]
    pub gap: f64,
    /// Flip every other item
    #[serde(default)]
    pub alternate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    /// Attributes passed to every item
    #[serde(default)]
    pub props: Props,
}

impl Design {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            palette: default_palette(),
            direction: FlexDirection::default(),
            align: AlignItems::default(),
            justify: JustifyContent::default(),
            gap: 0.0,
            alternate: false,
            font: None,
            props: Props::new(),
        }
    }
}

/// A design plus the records it repeats over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Infographic {
    pub design: Design,
    #[serde(default)]
    pub data: Vec<Datum>,
}

impl Infographic {
    pub fn new(design: Design, data: Vec<Datum>) -> Self {
        Self { design, data }
    }

    /// Load a document from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a document from a TOML string
    pub fn from_str(content: &str) -> Result<Self, DocumentError> {
        Ok(toml::from_str(content)?)
    }

    /// Build the node tree using the palette named by the design
    pub fn to_tree(&self) -> Result<Node, ConfigurationError> {
        let palette = get_palette(&self.design.palette)?;
        self.to_tree_with_palette(&palette)
    }

    /// Build the node tree with an explicit palette.
    ///
    /// Each record becomes one item reference inside a flex container. Record
    /// `i` gets index path `[i]`, the palette entry `i mod len`, and only the
    /// datum fields the item declares.
    pub fn to_tree_with_palette(&self, palette: &[ThemeColors]) -> Result<Node, ConfigurationError> {
        let design = &self.design;
        let definition = get_item(&design.item)?;

        let items = self.data.iter().enumerate().map(|(i, datum)| {
            let indexes = vec![i];
            let position_h = if design.alternate && i % 2 == 1 {
                PositionH::Flipped
            } else {
                PositionH::Normal
            };
            let context = ItemContext::new(
                datum.project(&definition.composites),
                indexes.clone(),
                resolve_theme(palette, &indexes),
            )
            .with_position_h(position_h);
            Node::item(
                design.item.clone(),
                ItemProps::new(context).with_attrs(&design.props),
            )
        });

        let layout = FlexLayout {
            direction: design.direction,
            align_items: design.align,
            justify_content: design.justify,
            gap: design.gap,
        };
        Ok(Node::flex(layout).children(items))
    }
}

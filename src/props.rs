//! Item configuration splitting
//!
//! An item declares the option keys it understands; [`resolve_props`] pulls
//! those out of the incoming attribute bag and leaves everything else in a
//! pass-through bag that the item forwards untouched to whatever primitive
//! it renders. This lets a leaf item accept `fill`, `stroke`, etc. without
//! listing them.

use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::items::Composite;
use crate::theme::ThemeColors;

/// A single property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Bool(bool),
    Number(f64),
    Str(String),
    List(Vec<PropValue>),
}

impl PropValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropValue::Number(n) => Some(*n),
            PropValue::Str(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Str(s) => f.write_str(s),
            PropValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

impl From<i32> for PropValue {
    fn from(n: i32) -> Self {
        PropValue::Number(n as f64)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s)
    }
}

/// Ordered attribute bag; order is kept so output is deterministic
pub type Props = IndexMap<String, PropValue>;

/// One data record driving an item instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(flatten)]
    pub extra: Props,
}

impl Datum {
    /// A record with only a label
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Keep only the slots an item declares; extra fields are untouched
    pub fn project(&self, composites: &BTreeSet<Composite>) -> Self {
        let keep = |slot: Composite| composites.contains(&slot);
        Self {
            label: self.label.clone().filter(|_| keep(Composite::Label)),
            desc: self.desc.clone().filter(|_| keep(Composite::Desc)),
            value: self.value.filter(|_| keep(Composite::Value)),
            icon: self.icon.clone().filter(|_| keep(Composite::Icon)),
            extra: self.extra.clone(),
        }
    }
}

/// Which side an item's text sits on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionH {
    #[default]
    Normal,
    Flipped,
}

/// Per-instance context every item receives.
///
/// `indexes` is the position path within (possibly nested) repeated data;
/// it is fixed when the tree is built and never changed by layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemContext {
    pub datum: Datum,
    pub indexes: Vec<usize>,
    pub theme_colors: ThemeColors,
    pub position_h: PositionH,
}

impl ItemContext {
    pub fn new(datum: Datum, indexes: Vec<usize>, theme_colors: ThemeColors) -> Self {
        Self {
            datum,
            indexes,
            theme_colors,
            position_h: PositionH::Normal,
        }
    }

    pub fn with_position_h(mut self, position_h: PositionH) -> Self {
        self.position_h = position_h;
        self
    }

    /// Indexes joined with `-`, for ids and data attributes
    pub fn index_key(&self) -> String {
        index_key(&self.indexes)
    }
}

/// Join an index path with `-`
pub fn index_key(indexes: &[usize]) -> String {
    indexes
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// What an item component is invoked with
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemProps {
    pub context: ItemContext,
    pub attrs: Props,
}

impl ItemProps {
    pub fn new(context: ItemContext) -> Self {
        Self {
            context,
            attrs: Props::new(),
        }
    }

    /// Set an attribute
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Merge a bag of attributes; later values win
    pub fn with_attrs(mut self, attrs: &Props) -> Self {
        for (k, v) in attrs {
            self.attrs.insert(k.clone(), v.clone());
        }
        self
    }
}

/// The declared side of a split: context, size hints and recognized options
#[derive(Debug, Clone, PartialEq)]
pub struct ItemConfig {
    pub datum: Datum,
    pub indexes: Vec<usize>,
    pub theme_colors: ThemeColors,
    pub position_h: PositionH,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub options: Props,
}

impl ItemConfig {
    /// A recognized option, if it was supplied
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.options.get(key)
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(PropValue::as_f64).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(PropValue::as_bool).unwrap_or(default)
    }

    pub fn str_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).and_then(PropValue::as_str).unwrap_or(default)
    }

    pub fn width_or(&self, default: f64) -> f64 {
        self.width.unwrap_or(default)
    }

    pub fn height_or(&self, default: f64) -> f64 {
        self.height.unwrap_or(default)
    }

    /// A theme color by camelCase name, or the given fallback
    pub fn color_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.theme_colors.get(name).unwrap_or(default)
    }
}

/// Split an item's props into its declared configuration and a pass-through bag.
///
/// Keys in `recognized` move into `ItemConfig::options`; every other
/// attribute stays in the returned bag in its original order. The context and
/// the `width`/`height` size hints are always available on the config; the
/// size hints are only removed from the pass-through bag when recognized.
pub fn resolve_props(props: &ItemProps, recognized: &[&str]) -> (ItemConfig, Props) {
    let mut options = Props::new();
    let mut rest = Props::new();
    for (key, value) in &props.attrs {
        if recognized.contains(&key.as_str()) {
            options.insert(key.clone(), value.clone());
        } else {
            rest.insert(key.clone(), value.clone());
        }
    }

    let size = |key: &str| props.attrs.get(key).and_then(PropValue::as_f64);
    let context = &props.context;
    let config = ItemConfig {
        datum: context.datum.clone(),
        indexes: context.indexes.clone(),
        theme_colors: context.theme_colors.clone(),
        position_h: context.position_h,
        width: size("width"),
        height: size("height"),
        options,
    };
    (config, rest)
}

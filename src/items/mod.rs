//! Item catalog and tree evaluation
//!
//! An item is a named component that turns an [`ItemProps`] into a subtree of
//! host and layout nodes. Item nodes inside a tree are expanded by
//! [`evaluate`] before layout.
//!
//! A process-wide catalog is pre-populated with the built-in items:
//!
//! - `simple-vertical-arrow`: label and description beside a numbered arrow
//! - `letter-card`: a card showing the label's first letter large
//! - `bullet-text`: a bullet followed by a single text line

mod bullet_text;
pub mod components;
mod letter_card;
mod simple_vertical_arrow;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

use thiserror::Error;

use crate::error::{Catalog, ConfigurationError};
use crate::node::{Node, NodeKind};
use crate::props::ItemProps;
use crate::registry::{self, Registry};

/// A data-binding slot an item can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Composite {
    Label,
    Desc,
    Value,
    Icon,
}

impl Composite {
    pub fn as_str(&self) -> &'static str {
        match self {
            Composite::Label => "label",
            Composite::Desc => "desc",
            Composite::Value => "value",
            Composite::Icon => "icon",
        }
    }
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors an item component can report while building its subtree
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ItemError {
    /// A datum field the item cannot render without
    #[error("item {item} requires datum field '{field}'")]
    MissingField { item: String, field: String },

    /// An option had an unusable value
    #[error("invalid value for {option} in item {item}: {message}")]
    InvalidOption {
        item: String,
        option: String,
        message: String,
    },

    /// An item expanded (directly or indirectly) into itself
    #[error("circular item reference detected: {chain}")]
    CircularReference { chain: String },
}

/// Builds an item's subtree from its props
pub type ItemComponent = Arc<dyn Fn(&ItemProps) -> Result<Node, ItemError> + Send + Sync>;

/// A registered item
#[derive(Clone)]
pub struct ItemDefinition {
    pub component: ItemComponent,
    /// Datum slots this item displays
    pub composites: BTreeSet<Composite>,
}

impl ItemDefinition {
    pub fn new<F>(component: F, composites: impl IntoIterator<Item = Composite>) -> Self
    where
        F: Fn(&ItemProps) -> Result<Node, ItemError> + Send + Sync + 'static,
    {
        Self {
            component: Arc::new(component),
            composites: composites.into_iter().collect(),
        }
    }

    /// Whether the item declares the given slot
    pub fn supports(&self, slot: Composite) -> bool {
        self.composites.contains(&slot)
    }

    /// Invoke the component
    pub fn render(&self, props: &ItemProps) -> Result<Node, ItemError> {
        (self.component)(props)
    }
}

impl fmt::Debug for ItemDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDefinition")
            .field("composites", &self.composites)
            .finish_non_exhaustive()
    }
}

fn items() -> &'static RwLock<Registry<ItemDefinition>> {
    static ITEMS: OnceLock<RwLock<Registry<ItemDefinition>>> = OnceLock::new();
    ITEMS.get_or_init(|| {
        let mut registry = Registry::new();
        registry.register(simple_vertical_arrow::NAME, simple_vertical_arrow::definition());
        registry.register(letter_card::NAME, letter_card::definition());
        registry.register(bullet_text::NAME, bullet_text::definition());
        RwLock::new(registry)
    })
}

/// Register (or overwrite) an item in the process-wide catalog
pub fn register_item(name: &str, definition: ItemDefinition) {
    registry::write(items()).register(name, definition);
}

/// Look up an item; an unknown name is a configuration error
pub fn get_item(name: &str) -> Result<ItemDefinition, ConfigurationError> {
    registry::read(items())
        .get(name)
        .cloned()
        .ok_or_else(|| ConfigurationError::not_found(Catalog::Item, name))
}

/// All registered items in registration order
pub fn get_items() -> Vec<(String, ItemDefinition)> {
    registry::read(items())
        .list()
        .map(|(name, item)| (name.to_string(), item.clone()))
        .collect()
}

/// Names of all registered items in registration order
pub fn item_names() -> Vec<String> {
    registry::read(items())
        .names()
        .map(|s| s.to_string())
        .collect()
}

/// Expand every item reference in `node` into host and layout nodes.
///
/// An unknown item name fails the whole evaluation. An item that reports an
/// [`ItemError`] is replaced by an empty group (keeping any declared size)
/// and the rest of the tree renders normally.
///
/// Props set on the item node itself (rather than in its [`ItemProps`]) are
/// merged onto the expanded root, overriding the component's own values.
pub fn evaluate(node: &Node) -> Result<Node, ConfigurationError> {
    let mut resolving = Vec::new();
    expand(node, &mut resolving)
}

fn expand(node: &Node, resolving: &mut Vec<String>) -> Result<Node, ConfigurationError> {
    let NodeKind::Item { name, props } = &node.kind else {
        let children = node
            .children
            .iter()
            .map(|child| expand(child, resolving))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Node {
            kind: node.kind.clone(),
            props: node.props.clone(),
            children,
        });
    };

    let definition = get_item(name)?;

    if resolving.iter().any(|n| n == name) {
        let error = ItemError::CircularReference {
            chain: format!("{} -> {}", resolving.join(" -> "), name),
        };
        return Ok(placeholder(node, props, &error));
    }

    let rendered = match definition.render(props) {
        Ok(rendered) => rendered,
        Err(error) => return Ok(placeholder(node, props, &error)),
    };

    resolving.push(name.clone());
    let expanded = expand(&rendered, resolving);
    resolving.pop();

    let mut expanded = expanded?;
    expanded
        .props
        .extend(node.props.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(expanded)
}

fn placeholder(node: &Node, props: &ItemProps, error: &ItemError) -> Node {
    log::warn!(
        "item at [{}] replaced by placeholder: {}",
        props.context.index_key(),
        error
    );
    let mut group = Node::group();
    for key in ["width", "height"] {
        if let Some(value) = props.attrs.get(key) {
            group.props.insert(key.to_string(), value.clone());
        }
    }
    group.props(node.props.clone())
}

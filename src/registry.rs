//! Named-entry store shared by the item, palette and font catalogs
//!
//! `Registry<T>` is a plain insertion-ordered map. The process-wide catalogs
//! wrap one in a `RwLock` behind accessor functions; the policy for absent
//! names (fail or fall back) belongs to each catalog, not to this type.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

/// Insertion-ordered catalog of named values
#[derive(Debug, Clone)]
pub struct Registry<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Registry<T> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry, returning the value it replaced.
    ///
    /// Last write wins; nothing is merged. An overwritten entry keeps the
    /// position of its first registration in `list()`.
    pub fn register(&mut self, name: impl Into<String>, value: T) -> Option<T> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), value);
        if previous.is_some() {
            log::info!("registry entry '{}' overwritten", name);
        }
        previous
    }

    /// Look up an entry by name
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    /// Check if an entry exists
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All entries in registration order
    pub fn list(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read access to a shared catalog.
///
/// A writer that panicked cannot leave an entry half-inserted, so a poisoned
/// lock is still safe to read.
pub(crate) fn read<T>(lock: &RwLock<Registry<T>>) -> RwLockReadGuard<'_, Registry<T>> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

/// Write access to a shared catalog
pub(crate) fn write<T>(lock: &RwLock<Registry<T>>) -> RwLockWriteGuard<'_, Registry<T>> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        registry.register("a", 1);
        assert_eq!(registry.get("a"), Some(&1));
        assert!(registry.contains("a"));
        assert_eq!(registry.get("b"), None);
    }

    #[test]
    fn test_overwrite_last_write_wins() {
        let mut registry = Registry::new();
        assert_eq!(registry.register("p", "A"), None);
        assert_eq!(registry.register("p", "B"), Some("A"));
        assert_eq!(registry.get("p"), Some(&"B"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_in_insertion_order() {
        let mut registry = Registry::new();
        registry.register("zeta", 1);
        registry.register("alpha", 2);
        registry.register("mid", 3);
        registry.register("zeta", 4);

        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let values: Vec<_> = registry.list().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![4, 2, 3]);
    }

    #[test]
    fn test_shared_access() {
        let lock = RwLock::new(Registry::new());
        write(&lock).register("x", 10);
        assert_eq!(read(&lock).get("x"), Some(&10));
    }
}

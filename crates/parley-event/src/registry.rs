//! Event type registry.
//!
//! Maps case-insensitive category names to their descriptors. The hub
//! builds one of these at construction and creates a dispatcher for
//! each entry.

use crate::{category_key, CategoryDescriptor, EventError, EventKind};
use std::sync::Arc;

/// Catalog of known categories, in registration order.
///
/// Names are unique ignoring ASCII case.
#[derive(Debug, Clone, Default)]
pub struct EventTypeRegistry {
    entries: Vec<Arc<CategoryDescriptor>>,
}

impl EventTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every [`EventKind`].
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &kind in EventKind::ALL {
            registry.entries.push(Arc::new(kind.descriptor()));
        }
        registry
    }

    /// Registers a category.
    ///
    /// Returns `false` and leaves the registry unchanged if a category
    /// with the same name (ignoring case) is already present.
    pub fn register(&mut self, category: CategoryDescriptor) -> bool {
        if self.contains(category.name()) {
            tracing::debug!(category = %category.name(), "category already registered");
            return false;
        }
        self.entries.push(Arc::new(category));
        true
    }

    /// Registers a category, reporting a collision as an error.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::DuplicateCategory`] on a name collision.
    pub fn try_register(&mut self, category: CategoryDescriptor) -> Result<(), EventError> {
        let name = category.name().to_string();
        if self.register(category) {
            Ok(())
        } else {
            Err(EventError::DuplicateCategory(name))
        }
    }

    /// Looks up a category by name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::UnknownCategory`] if nothing is registered
    /// under `name`.
    pub fn lookup(&self, name: &str) -> Result<Arc<CategoryDescriptor>, EventError> {
        self.position(name)
            .map(|i| Arc::clone(&self.entries[i]))
            .ok_or_else(|| EventError::UnknownCategory(name.to_string()))
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Removes a category, returning its descriptor.
    pub fn remove(&mut self, name: &str) -> Option<Arc<CategoryDescriptor>> {
        self.position(name).map(|i| self.entries.remove(i))
    }

    /// Number of registered categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over descriptors in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<CategoryDescriptor>> {
        self.entries.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = category_key(name);
        self.entries.iter().position(|c| c.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParamKind;

    fn custom(name: &str) -> CategoryDescriptor {
        CategoryDescriptor::builder(name)
            .plain("data", ParamKind::Text)
            .build()
            .unwrap()
    }

    #[test]
    fn builtin_holds_whole_catalog() {
        let registry = EventTypeRegistry::builtin();
        assert_eq!(registry.len(), EventKind::ALL.len());
        assert!(registry.contains("ChannelKick"));
        assert!(registry.contains("errorinfo"));
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = EventTypeRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(custom("ZncPlayback")));

        let found = registry.lookup("zncplayback").unwrap();
        assert_eq!(found.name(), "ZncPlayback");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn register_rejects_case_insensitive_duplicate() {
        let mut registry = EventTypeRegistry::new();
        assert!(registry.register(custom("ZncPlayback")));
        assert!(!registry.register(custom("ZNCPLAYBACK")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("ZncPlayback").unwrap().name(), "ZncPlayback");
    }

    #[test]
    fn try_register_reports_duplicate() {
        let mut registry = EventTypeRegistry::builtin();
        let err = registry.try_register(custom("channeljoin")).unwrap_err();
        assert_eq!(err, EventError::DuplicateCategory("channeljoin".into()));
    }

    #[test]
    fn lookup_unknown() {
        let registry = EventTypeRegistry::builtin();
        let err = registry.lookup("ChannelFoo").unwrap_err();
        assert!(matches!(err, EventError::UnknownCategory(_)));
    }

    #[test]
    fn remove_then_reregister() {
        let mut registry = EventTypeRegistry::new();
        registry.register(custom("A"));
        registry.register(custom("B"));

        let removed = registry.remove("a").unwrap();
        assert_eq!(removed.name(), "A");
        assert!(registry.remove("a").is_none());
        assert!(registry.register(custom("A")));

        let names: Vec<_> = registry.iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["B", "A"]);
    }
}

//! One-time state carried across a redirect.
//!
//! Validation errors and the clear-history marker are written on request N (the
//! redirect) and consumed on request N+1 (the render). Storage is abstracted by
//! [`TransientStore`] so any session mechanism can back it; the host inserts a
//! [`TransientStoreHandle`] into the request extensions, or configures one on the
//! layer.

use crate::protocol::constants::{CLEAR_HISTORY_KEY, VALIDATION_ERRORS_KEY};
use crate::types::{ErrorBags, ValidationErrors};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

/// Key-value store whose entries survive exactly until they are taken.
pub trait TransientStore: Send + Sync {
    /// Read an entry without consuming it.
    fn get(&self, key: &str) -> Option<String>;

    /// Write an entry.
    fn put(&self, key: &str, value: String);

    /// Remove an entry, returning it.
    fn remove(&self, key: &str) -> Option<String>;

    /// Read and consume an entry.
    fn take(&self, key: &str) -> Option<String> {
        self.remove(key)
    }

    /// Keep every pending entry alive for one more request.
    ///
    /// Stores that expire entries after a read override this; the default store
    /// only drops entries on [`take`](TransientStore::take).
    fn keep(&self) {}
}

/// Shared handle to the store of the current client.
#[derive(Clone)]
pub struct TransientStoreHandle(pub Arc<dyn TransientStore>);

impl TransientStoreHandle {
    /// Wrap a store.
    pub fn new(store: impl TransientStore + 'static) -> Self {
        Self(Arc::new(store))
    }
}

impl Deref for TransientStoreHandle {
    type Target = dyn TransientStore;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl std::fmt::Debug for TransientStoreHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TransientStoreHandle(..)")
    }
}

/// In-memory store for a single client.
///
/// Suited to tests and single-user tools; a multi-user server needs one store
/// per session.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransientStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.entries.lock().insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) -> Option<String> {
        self.entries.lock().remove(key)
    }
}

/// Persist `errors` under `bag`, next to any bags already stored.
///
/// A corrupt stored payload is discarded.
pub fn store_validation_errors(
    store: &dyn TransientStore,
    errors: &ValidationErrors,
    bag: &str,
) -> crate::Result<()> {
    let mut bags = match store.get(VALIDATION_ERRORS_KEY) {
        Some(json) if !json.is_empty() => {
            serde_json::from_str::<ErrorBags>(&json).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding corrupt stored validation errors");
                ErrorBags::new()
            })
        }
        _ => ErrorBags::new(),
    };

    bags.insert(bag.to_string(), errors.first_messages());
    store.put(VALIDATION_ERRORS_KEY, serde_json::to_string(&bags)?);
    Ok(())
}

/// Consume the stored error bags.
///
/// `None` when nothing was stored; a corrupt payload yields empty bags.
pub fn take_validation_errors(store: &dyn TransientStore) -> Option<ErrorBags> {
    let json = store.take(VALIDATION_ERRORS_KEY)?;
    match serde_json::from_str::<ErrorBags>(&json) {
        Ok(bags) => Some(bags),
        Err(err) => {
            tracing::warn!(error = %err, "ignoring corrupt stored validation errors");
            Some(ErrorBags::new())
        }
    }
}

/// Ask the next rendered page to clear the client's history.
pub fn mark_clear_history(store: &dyn TransientStore) {
    store.put(CLEAR_HISTORY_KEY, "true".to_string());
}

/// Consume the clear-history marker.
pub fn take_clear_history(store: &dyn TransientStore) -> bool {
    store.take(CLEAR_HISTORY_KEY).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_are_consumed_once() {
        let store = MemoryStore::new();
        let errors = ValidationErrors::new().with("Name", "The Name field is required.");
        store_validation_errors(&store, &errors, "default").unwrap();

        let bags = take_validation_errors(&store).unwrap();
        assert_eq!(bags["default"]["Name"], "The Name field is required.");
        assert!(take_validation_errors(&store).is_none());
    }

    #[test]
    fn test_bags_accumulate() {
        let store = MemoryStore::new();
        store_validation_errors(&store, &ValidationErrors::new().with("a", "x"), "login").unwrap();
        store_validation_errors(&store, &ValidationErrors::new().with("b", "y"), "signup").unwrap();

        let bags = take_validation_errors(&store).unwrap();
        assert_eq!(bags.keys().collect::<Vec<_>>(), vec!["login", "signup"]);
    }

    #[test]
    fn test_corrupt_payload() {
        let store = MemoryStore::new();
        store.put(VALIDATION_ERRORS_KEY, "{not json".to_string());
        assert!(take_validation_errors(&store).unwrap().is_empty());

        store.put(VALIDATION_ERRORS_KEY, "[1,2]".to_string());
        store_validation_errors(&store, &ValidationErrors::new().with("a", "x"), "default").unwrap();
        assert_eq!(take_validation_errors(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_history_marker() {
        let store = MemoryStore::new();
        assert!(!take_clear_history(&store));
        mark_clear_history(&store);
        assert!(take_clear_history(&store));
        assert!(!take_clear_history(&store));
    }
}

// In-memory implementations for tests and ephemeral use
//
// Data lives only as long as the process. Clones share the same map, so a
// test can open a second credential store over a clone to simulate a page
// reload.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::traits::KeyValueStore;

// ============================================================================
// InMemoryKeyValueStore - Stores values in a shared HashMap
// ============================================================================

/// In-memory key/value store
#[derive(Debug, Default, Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with raw values (useful for testing)
    pub fn seed(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// All keys currently present, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Remove everything
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

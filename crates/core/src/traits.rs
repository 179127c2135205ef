// Core traits for pluggable backends
//
// The portal persists everything as string values under string keys, the
// way browser local storage does. This trait lets the credential store run
// over different backends:
// - In-memory implementation for tests and ephemeral use
// - JSON file implementation for durable local storage

use crate::error::Result;

// ============================================================================
// KeyValueStore - String-keyed, string-valued persistence
// ============================================================================

/// Trait for a local key/value store
///
/// Every write replaces the whole value under its key. There is no
/// cross-process locking: two writers to the same key race, last write wins.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

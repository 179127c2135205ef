// Storage backend abstraction
// Decision: Use enum dispatch for simplicity over trait objects
//
// This module provides a unified StorageBackend enum that can work with
// either a JSON file (durable) or in-memory (ephemeral) storage.

use std::path::PathBuf;

use studentportal_core::{InMemoryKeyValueStore, KeyValueStore, Result};

use super::config::{BackendKind, StorageConfig};
use super::file::FileKeyValueStore;

/// Storage backend that can be either a JSON file or in-memory
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory map (tests, ephemeral sessions)
    InMemory(InMemoryKeyValueStore),
    /// JSON file on local disk
    File(FileKeyValueStore),
}

impl StorageBackend {
    /// Create an in-memory storage backend
    pub fn in_memory() -> Self {
        Self::InMemory(InMemoryKeyValueStore::new())
    }

    /// Open a file storage backend at `path`
    pub fn file(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self::File(FileKeyValueStore::open(path)?))
    }

    /// Build the backend selected by `config`
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        match config.backend {
            BackendKind::Memory => {
                tracing::info!("Using in-memory storage backend");
                Ok(Self::in_memory())
            }
            BackendKind::File => {
                tracing::info!(path = %config.path.display(), "Using file storage backend");
                Self::file(config.path.clone())
            }
        }
    }

    /// Check if data is lost when the process exits
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }
}

impl From<InMemoryKeyValueStore> for StorageBackend {
    fn from(store: InMemoryKeyValueStore) -> Self {
        Self::InMemory(store)
    }
}

impl From<FileKeyValueStore> for StorageBackend {
    fn from(store: FileKeyValueStore) -> Self {
        Self::File(store)
    }
}

impl KeyValueStore for StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            Self::InMemory(store) => store.get(key),
            Self::File(store) => store.get(key),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        match self {
            Self::InMemory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        match self {
            Self::InMemory(store) => store.remove(key),
            Self::File(store) => store.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_in_memory() {
        let backend = StorageBackend::from_config(&StorageConfig::default()).unwrap();
        assert!(backend.is_ephemeral());
    }

    #[test]
    fn test_file_config_opens_file_backend() {
        let dir = TempDir::new().unwrap();
        let config = StorageConfig::file(dir.path().join("store.json"));
        let backend = StorageBackend::from_config(&config).unwrap();
        assert!(!backend.is_ephemeral());

        backend.set("students", "[]").unwrap();
        let reopened = StorageBackend::from_config(&config).unwrap();
        assert_eq!(reopened.get("students").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_dispatch_to_in_memory() {
        let shared = InMemoryKeyValueStore::new();
        let backend = StorageBackend::from(shared.clone());
        backend.set("k", "v").unwrap();
        assert_eq!(shared.get("k").unwrap().as_deref(), Some("v"));
        backend.remove("k").unwrap();
        assert!(shared.is_empty());
    }
}

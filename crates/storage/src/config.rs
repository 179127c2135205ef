// Storage configuration
// Decision: Default to the in-memory backend so tests and demos need no files

use serde::Deserialize;
use std::path::PathBuf;

/// Default location of the JSON store when the file backend is selected
pub const DEFAULT_STORAGE_PATH: &str = "portal-storage.json";

/// Which key/value backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Values are lost when the process exits
    #[default]
    Memory,
    /// Values are kept in a JSON file
    File,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: BackendKind,
    /// File path for the file backend; ignored for memory
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            path: PathBuf::from(DEFAULT_STORAGE_PATH),
        }
    }
}

impl StorageConfig {
    /// File-backed configuration at `path`
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::File,
            path: path.into(),
        }
    }
}

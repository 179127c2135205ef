// Error types for the persistence layer

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur while reading or writing the backing store.
///
/// Validation problems with user input are never reported through this
/// type; they are values returned by the auth flow.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error from a durable backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StoreError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}

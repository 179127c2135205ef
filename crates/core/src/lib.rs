// Student Portal Core
//
// This crate provides the storage-agnostic building blocks of the portal:
// the registered student record, the portal sections, and the key/value
// store abstraction that stands in for browser local storage.
//
// Key design decisions:
// - Uses a trait (KeyValueStore) for pluggable persistence backends
// - Values are JSON text so stores written by older clients round-trip
// - In-memory implementation lives here for tests and ephemeral use
// - Store failures are a single error enum; user-input problems are not errors here

// Domain entity types
pub mod portal;
pub mod student;

pub mod error;
pub mod traits;

// Telemetry (tracing subscriber setup)
pub mod telemetry;

// In-memory implementations for tests and ephemeral use
pub mod memory;

// Re-exports for convenience
pub use error::{Result, StoreError};
pub use memory::InMemoryKeyValueStore;
pub use portal::{welcome_message, PortalSection};
pub use student::{StudentProfile, UserRecord};
pub use traits::KeyValueStore;

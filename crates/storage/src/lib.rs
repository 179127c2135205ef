// Storage layer for the student portal
// Decision: The credential collection is rewritten in full on every mutation
//
// This crate provides:
// - FileKeyValueStore: implements KeyValueStore over a JSON file
// - StorageBackend: enum over the file and in-memory backends
// - CredentialStore: owns the registered students and the active session

pub mod backend;
pub mod config;
pub mod credentials;
pub mod file;

pub use backend::StorageBackend;
pub use config::{BackendKind, StorageConfig};
pub use credentials::{CredentialStore, CURRENT_STUDENT_KEY, STUDENTS_KEY};
pub use file::FileKeyValueStore;

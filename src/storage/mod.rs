//! Storage layer for FinGrid
//!
//! Provides atomic JSON file writes and the session credential store.

pub mod file_io;
pub mod secret_store;

pub use file_io::{read_json_optional, read_json_required, write_json_atomic};
pub use secret_store::{EncryptedFileStore, MemorySecretStore, SecretStore};

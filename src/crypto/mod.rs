//! Cryptographic functions for FinGrid
//!
//! Provides AES-256-GCM sealing with Argon2id key derivation for the
//! at-rest session credential.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{open, seal, EncryptedData};
pub use key_derivation::{derive_key, generate_device_secret, DerivedKey, KeyDerivationParams};
pub use secure_memory::SecureString;

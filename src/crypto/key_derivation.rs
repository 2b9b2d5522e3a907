//! Key derivation using Argon2id
//!
//! The credential file key is derived from a random per-device secret with
//! Argon2id. The salt and cost parameters live in the settings file.

use aes_gcm::aead::{rand_core::RngCore, OsRng as AeadRng};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, Params,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::SecureString;
use crate::error::{FinGridError, FinGridResult};

/// Length of a freshly generated device secret, in bytes
const DEVICE_SECRET_LEN: usize = 32;

/// Parameters for key derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded)
    pub salt: String,
    /// Memory cost in KiB (default: 19456 = 19 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 2)
    pub time_cost: u32,
    /// Parallelism degree (default: 1)
    pub parallelism: u32,
}

impl KeyDerivationParams {
    /// Create new params with a random salt
    pub fn new() -> Self {
        let salt = SaltString::generate(&mut OsRng);
        Self {
            salt: salt.to_string(),
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }

    /// Create params with specific values
    pub fn with_values(salt: String, memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt,
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self::new()
    }
}

/// A derived 32-byte AES-256 key, wiped on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// Generate a random device secret, base64 encoded
pub fn generate_device_secret() -> SecureString {
    let mut bytes = [0u8; DEVICE_SECRET_LEN];
    AeadRng.fill_bytes(&mut bytes);
    let encoded = STANDARD.encode(bytes);
    bytes.zeroize();
    SecureString::new(encoded)
}

/// Derive an encryption key from a secret
pub fn derive_key(secret: &str, params: &KeyDerivationParams) -> FinGridResult<DerivedKey> {
    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| FinGridError::Encryption(format!("Invalid salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32),
    )
    .map_err(|e| FinGridError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let hash = argon2
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| FinGridError::Encryption(format!("Key derivation failed: {}", e)))?;

    let output = hash
        .hash
        .ok_or_else(|| FinGridError::Encryption("No hash output generated".to_string()))?;

    let bytes = output.as_bytes();
    if bytes.len() < 32 {
        return Err(FinGridError::Encryption(
            "Hash output too short for AES-256 key".to_string(),
        ));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&bytes[..32]);

    Ok(DerivedKey { key })
}

#[cfg(test)]
pub(crate) fn fast_params() -> KeyDerivationParams {
    let salt = SaltString::generate(&mut OsRng);
    KeyDerivationParams::with_values(salt.to_string(), 8, 1, 1)
}

//! AES-256-GCM encryption/decryption
//!
//! Seals small secrets at rest. Each record is bound to a label through the
//! AEAD associated data, so a sealed credential cannot be replayed as some
//! other kind of record.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use super::{DerivedKey, SecureString};
use crate::error::{FinGridError, FinGridResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Current sealed-record format
const FORMAT_VERSION: u8 = 1;

/// Encrypted data with associated metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptedData {
    /// The nonce used for this encryption (base64 encoded)
    pub nonce: String,
    /// The encrypted ciphertext with authentication tag (base64 encoded)
    pub ciphertext: String,
    /// Format version
    #[serde(default = "default_version")]
    pub version: u8,
}

fn default_version() -> u8 {
    FORMAT_VERSION
}

fn decode_field(field: &str, value: &str) -> FinGridResult<Vec<u8>> {
    STANDARD
        .decode(value)
        .map_err(|e| FinGridError::Encryption(format!("Invalid {} encoding: {}", field, e)))
}

/// Seal a secret string under `key`, bound to `label`
pub fn seal(plaintext: &str, label: &str, key: &DerivedKey) -> FinGridResult<EncryptedData> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| FinGridError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext.as_bytes(),
                aad: label.as_bytes(),
            },
        )
        .map_err(|e| FinGridError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(EncryptedData {
        nonce: STANDARD.encode(nonce_bytes),
        ciphertext: STANDARD.encode(ciphertext),
        version: FORMAT_VERSION,
    })
}

/// Open a sealed secret; fails on a wrong key, wrong label or tampering
pub fn open(sealed: &EncryptedData, label: &str, key: &DerivedKey) -> FinGridResult<SecureString> {
    if sealed.version != FORMAT_VERSION {
        return Err(FinGridError::Encryption(format!(
            "Unsupported encryption version: {}",
            sealed.version
        )));
    }

    let nonce_bytes = decode_field("nonce", &sealed.nonce)?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(FinGridError::Encryption(format!(
            "Invalid nonce size: expected {}, got {}",
            NONCE_SIZE,
            nonce_bytes.len()
        )));
    }
    let ciphertext = decode_field("ciphertext", &sealed.ciphertext)?;

    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| FinGridError::Encryption(format!("Failed to create cipher: {}", e)))?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: ciphertext.as_ref(),
                aad: label.as_bytes(),
            },
        )
        .map_err(|_| {
            FinGridError::Encryption("Decryption failed: invalid key or corrupted data".into())
        })?;

    String::from_utf8(plaintext)
        .map(SecureString::new)
        .map_err(|e| FinGridError::Encryption(format!("Invalid UTF-8 in decrypted data: {}", e)))
}

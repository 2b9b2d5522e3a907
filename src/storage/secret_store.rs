//! Persistent home of the session credential
//!
//! The session credential is the only secret the client keeps. [`SecretStore`]
//! is the seam between the session state machine and wherever the secret
//! actually lives: an encrypted file next to the settings in the CLI, or
//! process memory when embedded or under test.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::file_io::{read_json_optional, remove_if_exists, write_private_json_atomic};
use crate::crypto::{
    derive_key, generate_device_secret, open, seal, DerivedKey, EncryptedData,
    KeyDerivationParams, SecureString,
};
use crate::error::{FinGridError, FinGridResult};

/// AEAD label binding sealed records to the session-credential entry
const CREDENTIAL_LABEL: &str = "fingrid/session-credential";

/// A single-entry store for the session credential
pub trait SecretStore: Send + Sync {
    /// Read the credential, `None` when nothing is stored
    fn read(&self) -> FinGridResult<Option<SecureString>>;

    /// Replace the stored credential
    fn write(&self, credential: &SecureString) -> FinGridResult<()>;

    /// Remove the credential; removing an absent credential succeeds
    fn delete(&self) -> FinGridResult<()>;
}

/// On-disk shape of the credential file
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    sealed: EncryptedData,
    saved_at: DateTime<Utc>,
}

/// On-disk shape of the device secret file
#[derive(Serialize, Deserialize)]
struct DeviceSecret {
    secret: String,
}

/// Credential sealed with AES-256-GCM in a JSON file
///
/// The key is derived with Argon2id from a random per-device secret stored in
/// a separate owner-only file, created on first write.
pub struct EncryptedFileStore {
    credential_path: PathBuf,
    device_secret_path: PathBuf,
    params: KeyDerivationParams,
}

impl EncryptedFileStore {
    pub fn new(
        credential_path: PathBuf,
        device_secret_path: PathBuf,
        params: KeyDerivationParams,
    ) -> Self {
        Self {
            credential_path,
            device_secret_path,
            params,
        }
    }

    fn device_secret(&self, create: bool) -> FinGridResult<SecureString> {
        if let Some(stored) = read_json_optional::<DeviceSecret, _>(&self.device_secret_path)? {
            return Ok(SecureString::new(stored.secret));
        }
        if !create {
            return Err(FinGridError::Storage(
                "Device secret is missing; stored credential cannot be opened".into(),
            ));
        }

        debug!(path = %self.device_secret_path.display(), "generating device secret");
        let secret = generate_device_secret();
        write_private_json_atomic(
            &self.device_secret_path,
            &DeviceSecret {
                secret: secret.as_str().to_string(),
            },
        )?;
        Ok(secret)
    }

    fn key(&self, create: bool) -> FinGridResult<DerivedKey> {
        let secret = self.device_secret(create)?;
        derive_key(secret.as_str(), &self.params)
    }
}

impl SecretStore for EncryptedFileStore {
    fn read(&self) -> FinGridResult<Option<SecureString>> {
        let Some(stored) = read_json_optional::<StoredCredential, _>(&self.credential_path)? else {
            return Ok(None);
        };
        let key = self.key(false)?;
        open(&stored.sealed, CREDENTIAL_LABEL, &key).map(Some)
    }

    fn write(&self, credential: &SecureString) -> FinGridResult<()> {
        let key = self.key(true)?;
        let stored = StoredCredential {
            sealed: seal(credential.as_str(), CREDENTIAL_LABEL, &key)?,
            saved_at: Utc::now(),
        };
        write_private_json_atomic(&self.credential_path, &stored)
    }

    fn delete(&self) -> FinGridResult<()> {
        remove_if_exists(&self.credential_path)
    }
}

/// Credential kept in process memory only
#[derive(Default)]
pub struct MemorySecretStore {
    value: Mutex<Option<SecureString>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a credential
    pub fn with_credential(credential: impl Into<SecureString>) -> Self {
        Self {
            value: Mutex::new(Some(credential.into())),
        }
    }

    fn slot(&self) -> FinGridResult<std::sync::MutexGuard<'_, Option<SecureString>>> {
        self.value
            .lock()
            .map_err(|_| FinGridError::Storage("Secret store lock poisoned".into()))
    }
}

impl SecretStore for MemorySecretStore {
    fn read(&self) -> FinGridResult<Option<SecureString>> {
        Ok(self.slot()?.clone())
    }

    fn write(&self, credential: &SecureString) -> FinGridResult<()> {
        *self.slot()? = Some(credential.clone());
        Ok(())
    }

    fn delete(&self) -> FinGridResult<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::key_derivation::fast_params;
    use tempfile::TempDir;

    fn file_store(dir: &TempDir, params: &KeyDerivationParams) -> EncryptedFileStore {
        EncryptedFileStore::new(
            dir.path().join("credential.json"),
            dir.path().join("device.secret"),
            params.clone(),
        )
    }

    #[test]
    fn test_empty_file_store_reads_none() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir, &fast_params());
        assert!(store.read().unwrap().is_none());
    }

    #[test]
    fn test_credential_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let params = fast_params();

        file_store(&dir, &params)
            .write(&SecureString::new("tok-A"))
            .unwrap();

        let reopened = file_store(&dir, &params);
        assert_eq!(reopened.read().unwrap().unwrap().as_str(), "tok-A");
    }

    #[test]
    fn test_credential_is_not_stored_in_plaintext() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir, &fast_params());
        store.write(&SecureString::new("tok-plain")).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("credential.json")).unwrap();
        assert!(!raw.contains("tok-plain"));
    }

    #[test]
    fn test_lost_device_secret_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir, &fast_params());
        store.write(&SecureString::new("tok-A")).unwrap();
        std::fs::remove_file(dir.path().join("device.secret")).unwrap();

        assert!(store.read().is_err());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = file_store(&dir, &fast_params());
        store.write(&SecureString::new("tok-A")).unwrap();

        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());
        store.delete().unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySecretStore::with_credential("tok-B");
        assert_eq!(store.read().unwrap().unwrap().as_str(), "tok-B");

        store.delete().unwrap();
        assert!(store.read().unwrap().is_none());
    }
}

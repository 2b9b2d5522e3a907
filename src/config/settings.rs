//! User settings for FinGrid
//!
//! Manages the backend location, display preferences, the ledger failure
//! policy and the key-derivation parameters of the credential file.

use serde::{Deserialize, Serialize};

use super::paths::FinGridPaths;
use crate::crypto::key_derivation::KeyDerivationParams;
use crate::error::FinGridError;
use crate::ledger::FailurePolicy;
use crate::storage::file_io::{read_json_required, write_json_atomic};

/// Backend used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5053/api";

/// User settings for FinGrid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the budget backend, including the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Currency symbol appended to amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// What happens to the last good ledger view when a refresh fails
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Optional per-request timeout; requests never time out when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Argon2 parameters used to derive the credential-file key
    #[serde(default = "KeyDerivationParams::new")]
    pub key_params: KeyDerivationParams,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_currency() -> String {
    "₴".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_base_url: default_api_base_url(),
            currency_symbol: default_currency(),
            failure_policy: FailurePolicy::default(),
            request_timeout_secs: None,
            key_params: KeyDerivationParams::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if the file doesn't exist
    ///
    /// Defaults are persisted immediately so the generated key salt stays stable
    /// across runs. A file written without `key_params` is completed and saved
    /// back for the same reason.
    pub fn load_or_create(paths: &FinGridPaths) -> Result<Self, FinGridError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let raw: serde_json::Value = read_json_required(&settings_path).map_err(|e| {
                FinGridError::Config(format!("Failed to load settings file: {}", e))
            })?;
            let missing_key_params = raw.get("key_params").is_none();
            let settings: Settings = serde_json::from_value(raw).map_err(|e| {
                FinGridError::Config(format!("Failed to load settings file: {}", e))
            })?;
            if missing_key_params {
                settings.save(paths)?;
            }
            Ok(settings)
        } else {
            let settings = Settings::default();
            settings.save(paths)?;
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinGridPaths) -> Result<(), FinGridError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Override the backend location (command-line flag or environment)
    pub fn with_api_base_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url;
        }
        self
    }
}

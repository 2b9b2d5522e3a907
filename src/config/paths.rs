//! Path management for FinGrid
//!
//! ## Path Resolution Order
//!
//! 1. `FINGRID_DATA_DIR` environment variable (if set)
//! 2. The platform configuration directory for `fingrid`
//!    (`~/.config/fingrid` on Linux, `%APPDATA%\fingrid\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FinGridError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "FINGRID_DATA_DIR";

/// Manages all paths used by FinGrid
#[derive(Debug, Clone)]
pub struct FinGridPaths {
    /// Base directory for all FinGrid state
    base_dir: PathBuf,
}

impl FinGridPaths {
    /// Create a new FinGridPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FinGridError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            ProjectDirs::from("", "", "fingrid")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    FinGridError::Config("Could not determine a home directory".into())
                })?
        };

        Ok(Self { base_dir })
    }

    /// Create FinGridPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the encrypted session credential
    pub fn credential_file(&self) -> PathBuf {
        self.base_dir.join("credential.json")
    }

    /// Get the path to the per-device secret the credential key is derived from
    pub fn device_secret_file(&self) -> PathBuf {
        self.base_dir.join("device.secret")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), FinGridError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FinGridError::Io(format!("Failed to create base directory: {}", e)))?;

        Ok(())
    }

    /// Check if FinGrid has been configured (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinGridPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.credential_file(),
            temp_dir.path().join("credential.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let paths = FinGridPaths::with_base_dir(nested.clone());

        assert!(!paths.is_initialized());
        paths.ensure_directories().unwrap();
        assert!(nested.exists());
    }
}

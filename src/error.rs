//! Custom error types for FinGrid
//!
//! This module defines the error hierarchy for the client core using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for FinGrid operations
#[derive(Error, Debug)]
pub enum FinGridError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Client-side validation errors, raised before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Credential store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Transport-level failure talking to the backend
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// A response body did not match the endpoint schema
    #[error("Invalid payload from {endpoint}: {reason}")]
    InvalidPayload {
        endpoint: &'static str,
        reason: String,
    },

    /// The three ledger sources disagree with each other
    #[error("Inconsistent ledger: {0}")]
    InconsistentLedger(String),

    /// One of the fetches of an aggregation cycle failed
    #[error("Ledger refresh failed: {0}")]
    Aggregation(Box<FinGridError>),

    /// The backend refused the supplied credentials
    #[error("Authentication rejected: {0}")]
    AuthRejected(String),
}

impl FinGridError {
    /// Create a "not found" error for bank accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for manual wallets
    pub fn wallet_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Wallet",
            identifier: identifier.into(),
        }
    }

    /// Wrap a fetch failure as the single failure of an aggregation cycle
    pub fn aggregation(source: FinGridError) -> Self {
        match source {
            already @ Self::Aggregation(_) => already,
            other => Self::Aggregation(Box::new(other)),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether the user can sensibly retry the operation that produced this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::InconsistentLedger(_) => true,
            Self::Api { status, .. } => *status >= 500 || *status == 429,
            Self::Aggregation(inner) => inner.is_retryable(),
            _ => false,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for FinGridError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FinGridError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for FinGridError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Api {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => Self::Network(err.to_string()),
        }
    }
}

/// Result type alias for FinGrid operations
pub type FinGridResult<T> = Result<T, FinGridError>;

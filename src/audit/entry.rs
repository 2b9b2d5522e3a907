//! Audit entry data structures
//!
//! Defines the events recorded in the audit journal: session transitions and
//! every mutation sent to the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kinds of audited events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Login,
    Register,
    Logout,
    /// An entity was created on the backend
    Create,
    /// An account's inclusion flag was flipped
    Toggle,
    /// The bank link was (re)established
    Sync,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Login => write!(f, "LOGIN"),
            Operation::Register => write!(f, "REGISTER"),
            Operation::Logout => write!(f, "LOGOUT"),
            Operation::Create => write!(f, "CREATE"),
            Operation::Toggle => write!(f, "TOGGLE"),
            Operation::Sync => write!(f, "SYNC"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Session,
    Account,
    Transaction,
    Category,
    Bank,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::Session => write!(f, "Session"),
            EntityType::Account => write!(f, "Account"),
            EntityType::Transaction => write!(f, "Transaction"),
            EntityType::Category => write!(f, "Category"),
            EntityType::Bank => write!(f, "Bank"),
        }
    }
}

/// A single audit log entry
///
/// Never carries credentials: session events record only the account email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the event occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// ID of the affected entity
    pub entity_id: String,

    /// Human-readable description of the entity (e.g., category name)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    /// JSON representation of what the backend returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            entity_name: None,
            payload: None,
        }
    }

    /// A session transition for the given account email
    pub fn session(operation: Operation, email: Option<&str>) -> Self {
        let mut entry = Self::new(operation, EntityType::Session, "session");
        entry.entity_name = email.map(str::to_string);
        entry
    }

    /// An entity created on the backend
    pub fn created<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id);
        entry.entity_name = entity_name;
        entry.payload = serde_json::to_value(entity).ok();
        entry
    }

    /// An account whose inclusion flag was flipped, in its new state
    pub fn toggled<T: Serialize>(
        account_id: impl Into<String>,
        account_name: impl Into<String>,
        account: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Toggle, EntityType::Account, account_id);
        entry.entity_name = Some(account_name.into());
        entry.payload = serde_json::to_value(account).ok();
        entry
    }

    /// A completed bank sync
    pub fn bank_synced<T: Serialize>(user_name: impl Into<String>, result: &T) -> Self {
        let mut entry = Self::new(Operation::Sync, EntityType::Bank, "bank");
        entry.entity_name = Some(user_name.into());
        entry.payload = serde_json::to_value(result).ok();
        entry
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        output
    }
}

//! Transaction history model
//!
//! History mixes bank-synced and manually entered transactions. Every record
//! carries exactly one origin; anything else is rejected when decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::ids::TransactionId;
use super::money::Money;

/// Where a transaction record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSource {
    /// Imported from the bank by the backend
    Bank,
    /// Entered by hand against a manual wallet
    Manual,
}

impl fmt::Display for TransactionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bank => write!(f, "Bank"),
            Self::Manual => write!(f, "Manual"),
        }
    }
}

/// One entry of the unified transaction history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: TransactionId,

    /// Signed amount; negative is an expense
    pub amount: Money,

    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,

    /// When the transaction happened (Unix seconds on the wire)
    #[serde(rename = "time", with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,

    pub source: TransactionSource,

    #[serde(default, deserialize_with = "nullable_string")]
    pub category_name: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub category_icon: String,
}

impl TransactionRecord {
    /// Check if this is an expense
    pub fn is_expense(&self) -> bool {
        self.amount.is_negative()
    }

    /// Check if this is income
    pub fn is_income(&self) -> bool {
        self.amount.is_positive()
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.timestamp.format("%Y-%m-%d"),
            self.description,
            self.amount
        )
    }
}

/// Treat an explicit JSON `null` the same as a missing string
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_decode_bank_record() {
        let json = r#"{
            "id": "tx-9",
            "amount": -120.5,
            "description": "Coffee",
            "time": 1700000000,
            "source": "Bank",
            "categoryName": "Food",
            "categoryIcon": "cup.and.saucer.fill"
        }"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id.as_str(), "tx-9");
        assert_eq!(record.amount, Money::from_minor(-12050));
        assert_eq!(record.timestamp, Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        assert_eq!(record.source, TransactionSource::Bank);
        assert!(record.is_expense());
    }

    #[test]
    fn test_null_category_fields_decode_as_empty() {
        let json = r#"{"id": "m1", "amount": 50, "description": null, "time": 0,
                       "source": "Manual", "categoryName": null, "categoryIcon": null}"#;
        let record: TransactionRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.category_name, "");
        assert_eq!(record.description, "");
        assert!(record.is_income());
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let json = r#"{"id": "x", "amount": 1, "description": "", "time": 0, "source": "Crypto"}"#;
        assert!(serde_json::from_str::<TransactionRecord>(json).is_err());
    }
}

//! Ledger aggregation
//!
//! Merges the budget summary, the bank accounts and the transaction history
//! into one consistent [`LedgerSnapshot`].

pub mod aggregator;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use aggregator::{LedgerAggregator, RefreshOutcome, SnapshotReceiver};
pub use snapshot::LedgerSnapshot;

/// What a failed refresh does to the view it could not replace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep showing the last good snapshot
    #[default]
    Retain,
    /// Drop it so stale figures are never shown
    Clear,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Retain => write!(f, "retain"),
            Self::Clear => write!(f, "clear"),
        }
    }
}

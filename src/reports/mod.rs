//! Reports module for FinGrid
//!
//! Pure derivations over the ledger view: budget progress per category and
//! the spending breakdown behind the analytics chart.

pub mod breakdown;
pub mod progress;

pub use breakdown::{color_for, SpendingBreakdown, SpendingShare, PALETTE};
pub use progress::{BudgetProgress, BudgetProgressReport, ProgressState};

//! Service layer for FinGrid
//!
//! The service layer runs the user-facing flows on top of the API and the
//! ledger: client-side validation first, then the backend call, then a
//! ledger refresh so every view reflects the change.

pub mod auth;
pub mod bank;
pub mod budget;

use crate::error::FinGridResult;
use crate::ledger::RefreshOutcome;

pub use auth::{AuthService, RegisterOutcome};
pub use bank::BankService;
pub use budget::{BudgetService, ManualTransactionInput, NewCategoryInput};

/// A backend change that went through, plus the refresh that followed it
///
/// The change itself succeeded even when `refresh` is an error.
#[derive(Debug)]
pub struct Applied<T> {
    pub value: T,
    pub refresh: FinGridResult<RefreshOutcome>,
}

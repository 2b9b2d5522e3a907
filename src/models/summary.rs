//! Budget summary model
//!
//! The summary is the backend's computed picture of the user's capital: bank
//! balance (included accounts only), manual cash balance, their total, and the
//! category and wallet lists.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::ManualWallet;
use super::category::{Category, CategoryValidationError};
use super::ids::{CategoryId, WalletId};
use super::money::Money;

/// The backend's budget summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_capital: Money,
    pub bank_balance: Money,
    pub manual_balance: Money,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub manual_wallets: Vec<ManualWallet>,
}

impl BudgetSummary {
    /// Validate the summary's internal invariants
    ///
    /// Checks that total capital is exactly bank plus manual balance and that
    /// every category carries non-negative figures.
    pub fn validate(&self) -> Result<(), SummaryValidationError> {
        let expected = self
            .bank_balance
            .checked_add(self.manual_balance)
            .ok_or(SummaryValidationError::BalanceOverflow)?;
        if self.total_capital != expected {
            return Err(SummaryValidationError::TotalMismatch {
                total: self.total_capital,
                expected,
            });
        }

        for category in &self.categories {
            category
                .validate()
                .map_err(SummaryValidationError::Category)?;
        }

        Ok(())
    }

    /// Find a category by ID
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Find a manual wallet by ID
    pub fn wallet(&self, id: WalletId) -> Option<&ManualWallet> {
        self.manual_wallets.iter().find(|w| w.id == id)
    }

    /// The wallet manual transactions are booked against by default
    pub fn default_wallet(&self) -> Option<&ManualWallet> {
        self.manual_wallets.first()
    }
}

/// Validation errors for budget summaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryValidationError {
    TotalMismatch { total: Money, expected: Money },
    /// Bank plus manual balance does not fit in minor units
    BalanceOverflow,
    Category(CategoryValidationError),
}

impl fmt::Display for SummaryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TotalMismatch { total, expected } => write!(
                f,
                "total capital {} does not equal bank + manual balance {}",
                total, expected
            ),
            Self::BalanceOverflow => write!(f, "bank + manual balance overflows"),
            Self::Category(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SummaryValidationError {}

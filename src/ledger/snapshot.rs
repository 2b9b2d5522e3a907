//! The merged ledger view
//!
//! A snapshot is only ever built from three sources that agree with each
//! other; [`LedgerSnapshot::assemble`] is the single place that checks it.

use serde::Serialize;

use crate::error::{FinGridError, FinGridResult};
use crate::models::{
    included_balance, Account, AccountId, BudgetSummary, Category, Money, TransactionRecord,
};

/// Immutable result of one successful aggregation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub generation: u64,
    pub summary: BudgetSummary,
    pub accounts: Vec<Account>,
    pub transactions: Vec<TransactionRecord>,
}

impl LedgerSnapshot {
    /// Merge the three sources, rejecting them if they disagree
    ///
    /// The summary's totals must add up, every category figure must be
    /// non-negative, and the bank balance must equal the sum of the included
    /// accounts.
    pub fn assemble(
        generation: u64,
        summary: BudgetSummary,
        accounts: Vec<Account>,
        transactions: Vec<TransactionRecord>,
    ) -> FinGridResult<Self> {
        summary
            .validate()
            .map_err(|e| FinGridError::InconsistentLedger(e.to_string()))?;

        let included = included_balance(&accounts).ok_or_else(|| {
            FinGridError::InconsistentLedger("included account balances overflow".to_string())
        })?;
        if included != summary.bank_balance {
            return Err(FinGridError::InconsistentLedger(format!(
                "bank balance {} does not match included accounts {}",
                summary.bank_balance, included
            )));
        }

        Ok(Self {
            generation,
            summary,
            accounts,
            transactions,
        })
    }

    pub fn account(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|a| &a.id == id)
    }

    pub fn total_capital(&self) -> Money {
        self.summary.total_capital
    }

    pub fn categories(&self) -> &[Category] {
        &self.summary.categories
    }

    /// Whether the view carries the same data as `other`, ignoring generations
    pub fn same_data(&self, other: &LedgerSnapshot) -> bool {
        self.summary == other.summary
            && self.accounts == other.accounts
            && self.transactions == other.transactions
    }
}

//! Bank service
//!
//! Linking the bank and choosing which bank accounts count toward the
//! totals.

use tracing::info;

use super::Applied;
use crate::api::{BankSyncResponse, LedgerApi};
use crate::audit::{AuditEntry, AuditLogger};
use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::{LedgerAggregator, RefreshOutcome};
use crate::models::AccountId;

/// Service for bank operations
pub struct BankService<'a, A: LedgerApi + ?Sized> {
    ledger: &'a LedgerAggregator<A>,
    audit: Option<&'a AuditLogger>,
}

impl<'a, A: LedgerApi + ?Sized> BankService<'a, A> {
    pub fn new(ledger: &'a LedgerAggregator<A>) -> Self {
        Self {
            ledger,
            audit: None,
        }
    }

    pub fn with_audit(mut self, audit: &'a AuditLogger) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Link the bank with a personal bank token and pull its accounts
    pub async fn sync(&self, bank_token: &SecureString) -> FinGridResult<Applied<BankSyncResponse>> {
        if bank_token.is_blank() {
            return Err(FinGridError::Validation("Bank token is required".into()));
        }

        let result = self.ledger.api().sync_bank(bank_token).await?;
        info!(accounts = result.accounts_count, "bank synced");

        if let Some(audit) = self.audit {
            audit.record(&AuditEntry::bank_synced(result.user_name.clone(), &result));
        }

        Ok(Applied {
            value: result,
            refresh: self.ledger.refresh().await,
        })
    }

    /// Flip whether an account counts toward the totals
    pub async fn toggle_inclusion(&self, account_id: &AccountId) -> FinGridResult<RefreshOutcome> {
        let outcome = self.ledger.toggle_inclusion(account_id).await?;

        if let Some(audit) = self.audit {
            let snapshot = outcome.snapshot().cloned().or_else(|| self.ledger.snapshot());
            let entry = match snapshot.as_ref().and_then(|s| s.account(account_id)) {
                Some(account) => AuditEntry::toggled(account.id.as_str(), account.name.clone(), account),
                None => AuditEntry::toggled(account_id.as_str(), account_id.as_str(), &account_id),
            };
            audit.record(&entry);
        }

        Ok(outcome)
    }
}

//! Budget service
//!
//! Manual transactions, categories and the derived budget views.

use std::sync::Arc;

use tracing::info;

use super::Applied;
use crate::api::{LedgerApi, ManualTransactionRequest, NewCategoryRequest};
use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::{LedgerAggregator, LedgerSnapshot, RefreshOutcome};
use crate::models::{Category, CategoryId, Money, TransactionRecord, DEFAULT_CATEGORY_ICON};
use crate::reports::{BudgetProgressReport, SpendingBreakdown};

/// A manual transaction as entered by the user
#[derive(Debug, Clone, Default)]
pub struct ManualTransactionInput {
    /// Unsigned amount
    pub amount: Option<Money>,
    pub is_income: bool,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
}

/// A category as entered by the user
#[derive(Debug, Clone, Default)]
pub struct NewCategoryInput {
    pub name: String,
    pub monthly_limit: Option<Money>,
    pub icon: Option<String>,
}

/// Service for budget operations
pub struct BudgetService<'a, A: LedgerApi + ?Sized> {
    ledger: &'a LedgerAggregator<A>,
    audit: Option<&'a AuditLogger>,
}

impl<'a, A: LedgerApi + ?Sized> BudgetService<'a, A> {
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

    /// Book a manual income or expense against the first manual wallet
    pub async fn add_manual_transaction(
        &self,
        input: ManualTransactionInput,
    ) -> FinGridResult<Applied<TransactionRecord>> {
        let (amount, category_id) = match (input.amount, input.category_id) {
            (Some(amount), Some(category_id)) => (amount, category_id),
            _ => {
                return Err(FinGridError::Validation(
                    "Amount and category are required".into(),
                ))
            }
        };
        if !amount.is_positive() {
            return Err(FinGridError::Validation(
                "Amount must be greater than zero".into(),
            ));
        }

        let snapshot = self.current_snapshot().await?;
        let wallet = snapshot.summary.default_wallet().ok_or_else(|| {
            FinGridError::Validation("No manual wallet to record the transaction in".into())
        })?;
        if snapshot.summary.category(category_id).is_none() {
            return Err(FinGridError::category_not_found(category_id.to_string()));
        }

        let description = input
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| {
                let fallback = if input.is_income { "Income" } else { "Expense" };
                fallback.to_string()
            });

        let request = ManualTransactionRequest {
            wallet_id: wallet.id,
            amount,
            is_income: input.is_income,
            description,
            category_id,
        };
        let record = self.ledger.api().add_manual_transaction(&request).await?;
        info!(transaction = %record.id, "manual transaction added");

        if let Some(audit) = self.audit {
            audit.record(&AuditEntry::created(
                EntityType::Transaction,
                record.id.as_str(),
                Some(record.description.clone()),
                &record,
            ));
        }

        Ok(Applied {
            value: record,
            refresh: self.ledger.refresh().await,
        })
    }

    /// Create a spending category
    pub async fn add_category(&self, input: NewCategoryInput) -> FinGridResult<Applied<Category>> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(FinGridError::Validation(
                "Category name cannot be empty".into(),
            ));
        }
        let monthly_limit = input.monthly_limit.ok_or_else(|| {
            FinGridError::Validation("Monthly limit is required".into())
        })?;
        if monthly_limit.is_negative() {
            return Err(FinGridError::Validation(
                "Monthly limit cannot be negative".into(),
            ));
        }

        let icon = input
            .icon
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string());

        let request = NewCategoryRequest {
            name: name.to_string(),
            monthly_limit,
            icon,
        };
        let category = self.ledger.api().add_category(&request).await?;
        info!(category = %category.id, "category added");

        if let Some(audit) = self.audit {
            audit.record(&AuditEntry::created(
                EntityType::Category,
                category.id.to_string(),
                Some(category.name.clone()),
                &category,
            ));
        }

        Ok(Applied {
            value: category,
            refresh: self.ledger.refresh().await,
        })
    }

    /// Progress of every category in the current view
    pub async fn progress(&self) -> FinGridResult<BudgetProgressReport> {
        let snapshot = self.current_snapshot().await?;
        Ok(BudgetProgressReport::generate(snapshot.categories()))
    }

    /// Spend-by-category breakdown from the analytics endpoint
    pub async fn spending_breakdown(&self) -> FinGridResult<SpendingBreakdown> {
        let spends = self.ledger.api().fetch_analytics().await?;
        Ok(SpendingBreakdown::from_spends(&spends))
    }

    /// The current view, refreshing first when there is none
    async fn current_snapshot(&self) -> FinGridResult<Arc<LedgerSnapshot>> {
        if let Some(snapshot) = self.ledger.snapshot() {
            return Ok(snapshot);
        }
        match self.ledger.refresh().await? {
            RefreshOutcome::Applied(snapshot) => Ok(snapshot),
            RefreshOutcome::Stale { .. } => self.ledger.snapshot().ok_or_else(|| {
                FinGridError::Network("Ledger refresh was superseded, try again".into())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Endpoint, FakeBackend};
    use crate::ledger::FailurePolicy;
    use crate::models::TransactionSource;

    fn ledger() -> LedgerAggregator<FakeBackend> {
        LedgerAggregator::new(Arc::new(FakeBackend::new()), FailurePolicy::Retain)
    }

    fn expense(minor: i64, category: i64) -> ManualTransactionInput {
        ManualTransactionInput {
            amount: Some(Money::from_minor(minor)),
            is_income: false,
            description: None,
            category_id: Some(CategoryId::new(category)),
        }
    }

    #[tokio::test]
    async fn test_missing_amount_or_category_makes_no_call() {
        let ledger = ledger();
        let service = BudgetService::new(&ledger);

        let mut no_amount = expense(100, 1);
        no_amount.amount = None;
        assert!(service
            .add_manual_transaction(no_amount)
            .await
            .unwrap_err()
            .is_validation());

        let mut no_category = expense(100, 1);
        no_category.category_id = None;
        assert!(service
            .add_manual_transaction(no_category)
            .await
            .unwrap_err()
            .is_validation());

        assert!(service
            .add_manual_transaction(expense(0, 1))
            .await
            .unwrap_err()
            .is_validation());

        assert_eq!(ledger.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_expense_updates_ledger() {
        let ledger = ledger();
        let before = ledger.refresh().await.unwrap().snapshot().cloned().unwrap();
        let service = BudgetService::new(&ledger);

        let applied = service
            .add_manual_transaction(expense(2_500, 1))
            .await
            .unwrap();

        assert_eq!(applied.value.amount, Money::from_minor(-2_500));
        assert_eq!(applied.value.description, "Expense");
        assert_eq!(applied.value.source, TransactionSource::Manual);

        let after = applied.refresh.unwrap().snapshot().cloned().unwrap();
        assert_eq!(
            after.total_capital(),
            before.total_capital() - Money::from_minor(2_500)
        );
        assert_eq!(after.transactions.len(), before.transactions.len() + 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let ledger = ledger();
        ledger.refresh().await.unwrap();
        let calls = ledger.api().calls();

        let err = BudgetService::new(&ledger)
            .add_manual_transaction(expense(100, 99))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(ledger.api().calls(), calls);
    }

    #[tokio::test]
    async fn test_add_category_defaults_icon() {
        let ledger = ledger();
        let applied = BudgetService::new(&ledger)
            .add_category(NewCategoryInput {
                name: " Gym ".into(),
                monthly_limit: Some(Money::from_minor(80_000)),
                icon: None,
            })
            .await
            .unwrap();

        assert_eq!(applied.value.name, "Gym");
        assert_eq!(applied.value.icon, DEFAULT_CATEGORY_ICON);
        let snapshot = applied.refresh.unwrap().snapshot().cloned().unwrap();
        assert!(snapshot.categories().iter().any(|c| c.name == "Gym"));
    }

    #[tokio::test]
    async fn test_add_category_validation() {
        let ledger = ledger();
        let service = BudgetService::new(&ledger);

        let nameless = NewCategoryInput {
            name: "  ".into(),
            monthly_limit: Some(Money::zero()),
            icon: None,
        };
        assert!(service.add_category(nameless).await.unwrap_err().is_validation());

        let no_limit = NewCategoryInput {
            name: "Gym".into(),
            ..Default::default()
        };
        assert!(service.add_category(no_limit).await.unwrap_err().is_validation());
        assert_eq!(ledger.api().calls(), 0);
    }

    #[tokio::test]
    async fn test_mutation_survives_failed_refresh() {
        let ledger = ledger();
        ledger.refresh().await.unwrap();
        ledger.api().fail(Endpoint::History);

        let applied = BudgetService::new(&ledger)
            .add_category(NewCategoryInput {
                name: "Gym".into(),
                monthly_limit: Some(Money::zero()),
                icon: Some("dumbbell".into()),
            })
            .await
            .unwrap();
        assert_eq!(applied.value.icon, "dumbbell");
        assert!(applied.refresh.is_err());
    }

    #[tokio::test]
    async fn test_progress_and_breakdown() {
        let ledger = ledger();
        let service = BudgetService::new(&ledger);

        let progress = service.progress().await.unwrap();
        assert_eq!(progress.rows.len(), 2);
        assert_eq!(progress.rows[1].ratio, 0.0);

        let breakdown = service.spending_breakdown().await.unwrap();
        assert_eq!(breakdown.rows.len(), 1);
        assert_eq!(breakdown.rows[0].share, 100.0);
    }
}

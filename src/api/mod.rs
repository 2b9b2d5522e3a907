//! Budget backend API
//!
//! The traits here are the seams the ledger and the services talk through;
//! [`HttpClient`] implements both against the real REST backend.

pub mod client;
#[cfg(test)]
pub(crate) mod fake;
pub mod wire;

use async_trait::async_trait;

use crate::crypto::SecureString;
use crate::error::FinGridResult;
use crate::models::{Account, AccountId, BudgetSummary, Category, CategorySpend, TransactionRecord};

pub use client::HttpClient;
pub use wire::{
    BankSyncResponse, LoginRequest, LoginResponse, ManualTransactionRequest, NewCategoryRequest,
    RegisterRequest, RegisterResponse,
};

/// Where the client gets the bearer credential for each request
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<SecureString>;
}

/// Ledger endpoints; every call carries the session credential
#[async_trait]
pub trait LedgerApi: Send + Sync {
    async fn fetch_summary(&self) -> FinGridResult<BudgetSummary>;

    async fn fetch_accounts(&self) -> FinGridResult<Vec<Account>>;

    async fn fetch_history(&self) -> FinGridResult<Vec<TransactionRecord>>;

    async fn fetch_analytics(&self) -> FinGridResult<Vec<CategorySpend>>;

    async fn add_manual_transaction(
        &self,
        request: &ManualTransactionRequest,
    ) -> FinGridResult<TransactionRecord>;

    async fn add_category(&self, request: &NewCategoryRequest) -> FinGridResult<Category>;

    /// Link the bank with an opaque bank-issued token
    async fn sync_bank(&self, bank_token: &SecureString) -> FinGridResult<BankSyncResponse>;

    /// Flip the account's inclusion flag server-side
    async fn toggle_inclusion(&self, account_id: &AccountId) -> FinGridResult<Account>;
}

/// Sign-in and sign-up endpoints
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest<'_>) -> FinGridResult<LoginResponse>;

    async fn register(&self, request: &RegisterRequest<'_>) -> FinGridResult<RegisterResponse>;
}

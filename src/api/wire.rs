//! Request and response bodies of the budget backend
//!
//! Model types double as response schemas where the backend returns them
//! as-is; the bodies below cover everything else. Every decoded payload goes
//! through [`check_payload`] before it leaves the API layer.

use serde::{Deserialize, Serialize};

use crate::error::FinGridError;
use crate::models::{
    Account, BudgetSummary, Category, CategoryId, CategorySpend, Money, TransactionRecord,
    WalletId,
};

/// Body of `POST /Account/login`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub remember_me: bool,
}

/// Response of `POST /Account/login`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub is_auth_successful: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Body of `POST /Account/register`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Response of `POST /Account/register`
///
/// Some deployments register without signing the user in; `token` is then
/// absent and the user has to log in separately.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of `POST /Budget/manual-transaction`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualTransactionRequest {
    pub wallet_id: WalletId,
    /// Unsigned amount; direction comes from `is_income`
    pub amount: Money,
    pub is_income: bool,
    pub description: String,
    pub category_id: CategoryId,
}

/// Body of `POST /Budget/categories`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryRequest {
    pub name: String,
    pub monthly_limit: Money,
    pub icon: String,
}

/// Response of `POST /Bank/sync`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankSyncResponse {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub accounts_count: u32,
}

/// Error body some endpoints send with a non-success status
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ApiErrorResponse {
    pub(crate) fn into_message(self) -> Option<String> {
        self.message
            .or(self.error)
            .or(self.title)
            .filter(|m| !m.trim().is_empty())
    }
}

/// Semantic checks for decoded response bodies
pub trait CheckPayload {
    fn check(&self) -> Result<(), String>;
}

impl CheckPayload for BudgetSummary {
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl CheckPayload for Category {
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl CheckPayload for CategorySpend {
    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}

impl CheckPayload for Account {
    fn check(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("account without an id".into());
        }
        Ok(())
    }
}

impl CheckPayload for TransactionRecord {
    fn check(&self) -> Result<(), String> {
        if self.id.as_str().trim().is_empty() {
            return Err("transaction without an id".into());
        }
        Ok(())
    }
}

impl CheckPayload for BankSyncResponse {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl<T: CheckPayload> CheckPayload for Vec<T> {
    fn check(&self) -> Result<(), String> {
        self.iter()
            .enumerate()
            .try_for_each(|(i, item)| item.check().map_err(|e| format!("item {}: {}", i, e)))
    }
}

/// Reject a decoded payload that breaks its endpoint's rules
pub fn check_payload<T: CheckPayload>(
    endpoint: &'static str,
    payload: T,
) -> Result<T, FinGridError> {
    payload
        .check()
        .map_err(|reason| FinGridError::InvalidPayload { endpoint, reason })?;
    Ok(payload)
}

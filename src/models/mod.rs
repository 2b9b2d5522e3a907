//! Core data models for FinGrid
//!
//! This module contains the data structures exchanged with the backend:
//! bank accounts, manual wallets, categories, transaction history and the
//! budget summary. All amounts use the [`Money`] type.

pub mod account;
pub mod category;
pub mod ids;
pub mod money;
pub mod summary;
pub mod transaction;

pub use account::{included_balance, Account, ManualWallet};
pub use category::{Category, CategorySpend, CategoryValidationError, DEFAULT_CATEGORY_ICON};
pub use ids::{AccountId, CategoryId, TransactionId, WalletId};
pub use money::{Money, MoneyParseError};
pub use summary::{BudgetSummary, SummaryValidationError};
pub use transaction::{TransactionRecord, TransactionSource};

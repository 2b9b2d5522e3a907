//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod auth;
pub mod bank;
pub mod budget;
pub mod context;
pub mod ledger;
pub mod route;

use crate::crypto::SecureString;
use crate::error::{FinGridError, FinGridResult};
use crate::services::Applied;

pub use audit::handle_audit;
pub use auth::{handle_login, handle_logout, handle_register, handle_status};
pub use bank::{handle_accounts_command, handle_bank_command, AccountCommands, BankCommands};
pub use budget::{
    handle_category_command, handle_transaction_command, CategoryCommands, TransactionCommands,
};
pub use context::AppContext;
pub use ledger::{handle_analytics, handle_history, handle_summary};
pub use route::handle_route;

/// Use the value given on the command line, or ask for it with hidden input
pub(crate) fn secret_or_prompt(given: Option<String>, prompt: &str) -> FinGridResult<SecureString> {
    match given {
        Some(value) => Ok(SecureString::new(value)),
        None => rpassword::prompt_password(prompt)
            .map(SecureString::new)
            .map_err(|e| FinGridError::Io(format!("Failed to read input: {}", e))),
    }
}

/// Warn when a change went through but the views could not catch up
pub(crate) fn report_refresh<T>(applied: &Applied<T>) {
    if let Err(e) = &applied.refresh {
        eprintln!("Saved, but refreshing the ledger failed: {}", e);
    }
}

//! Display formatting for terminal output
//!
//! Tables for the ledger views and a JSON alternative for scripting.

pub mod ledger;

use serde::Serialize;

use crate::error::FinGridResult;

pub use ledger::{format_account_list, format_history, format_summary};

/// Output format for read commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

/// Render `data` as pretty JSON
pub fn to_json<T: Serialize + ?Sized>(data: &T) -> FinGridResult<String> {
    Ok(serde_json::to_string_pretty(data)?)
}

/// Print either the table produced by `table` or `data` as JSON
pub fn print_output<T, F>(data: &T, format: OutputFormat, table: F) -> FinGridResult<()>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Table => print!("{}", table(data)),
        OutputFormat::Json => println!("{}", to_json(data)?),
    }
    Ok(())
}

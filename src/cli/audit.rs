//! Audit journal CLI command

use super::AppContext;
use crate::display::{print_output, OutputFormat};
use crate::error::FinGridResult;

/// Show the most recent journal entries
pub fn handle_audit(ctx: &AppContext, limit: usize, format: OutputFormat) -> FinGridResult<()> {
    let entries = ctx.audit.read_recent(limit)?;

    print_output(entries.as_slice(), format, |entries| {
        if entries.is_empty() {
            return "No audit entries yet.\n".to_string();
        }
        entries
            .iter()
            .map(|e| format!("{}\n", e.format_human_readable()))
            .collect()
    })
}

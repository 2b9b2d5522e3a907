//! Ledger CLI commands
//!
//! Read-only views over the aggregated ledger.

use super::AppContext;
use crate::display::{format_history, format_summary, print_output, OutputFormat};
use crate::error::FinGridResult;
use crate::services::BudgetService;
use crate::session::RouteGroup;

/// Totals, wallets and budget progress
pub async fn handle_summary(ctx: &AppContext, format: OutputFormat) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Home)?;
    let snapshot = ctx.load_snapshot().await?;
    print_output(snapshot.as_ref(), format, |s| format_summary(s, ctx.currency()))
}

/// Recent transactions across bank and manual sources
pub async fn handle_history(
    ctx: &AppContext,
    limit: usize,
    format: OutputFormat,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Home)?;
    let snapshot = ctx.load_snapshot().await?;
    let recent = &snapshot.transactions[..snapshot.transactions.len().min(limit)];
    print_output(recent, format, |_| {
        format_history(&snapshot.transactions, ctx.currency(), limit)
    })
}

/// Spend by category with its share of the total
pub async fn handle_analytics(ctx: &AppContext, format: OutputFormat) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Analytics)?;
    let breakdown = BudgetService::new(&ctx.ledger).spending_breakdown().await?;
    print_output(&breakdown, format, |b| b.format_terminal(ctx.currency()))
}

//! Budget CLI commands
//!
//! Categories with monthly limits and manual income/expense entries.

use clap::Subcommand;

use super::{report_refresh, AppContext};
use crate::display::{print_output, OutputFormat};
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::LedgerSnapshot;
use crate::models::{CategoryId, Money};
use crate::services::{BudgetService, ManualTransactionInput, NewCategoryInput};
use crate::session::RouteGroup;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Show monthly progress for every category
    List,

    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Monthly limit (e.g., "4000" or "4000.00"); 0 means no limit
        #[arg(short, long)]
        limit: String,
        /// Icon name
        #[arg(short, long)]
        icon: Option<String>,
    },
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a cash income or expense in the manual wallet
    Add {
        /// Amount, always positive (e.g., "125.50")
        amount: String,
        /// Category name or ID
        #[arg(short, long)]
        category: String,
        /// Record as income instead of expense
        #[arg(long)]
        income: bool,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },
}

fn parse_amount(input: &str, what: &str) -> FinGridResult<Money> {
    Money::parse(input)
        .map_err(|e| FinGridError::Validation(format!("Invalid {} '{}': {}", what, input, e)))
}

/// Find a category by ID ("cat-3" or "3") or by name, case-insensitively
fn resolve_category(snapshot: &LedgerSnapshot, input: &str) -> FinGridResult<CategoryId> {
    let categories = snapshot.categories();
    if let Ok(id) = input.parse::<CategoryId>() {
        if categories.iter().any(|c| c.id == id) {
            return Ok(id);
        }
    }

    categories
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(input.trim()))
        .map(|c| c.id)
        .ok_or_else(|| FinGridError::category_not_found(input))
}

/// Handle a category command
pub async fn handle_category_command(
    ctx: &AppContext,
    cmd: CategoryCommands,
    format: OutputFormat,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Budget)?;
    let service = BudgetService::new(&ctx.ledger).with_audit(&ctx.audit);

    match cmd {
        CategoryCommands::List => {
            let report = service.progress().await?;
            print_output(&report, format, |r| r.format_terminal(ctx.currency()))?;
        }

        CategoryCommands::Add { name, limit, icon } => {
            let monthly_limit = parse_amount(&limit, "limit")?;
            let applied = service
                .add_category(NewCategoryInput {
                    name,
                    monthly_limit: Some(monthly_limit),
                    icon,
                })
                .await?;

            let category = &applied.value;
            println!("Created category: {} ({})", category.name, category.id);
            if category.monthly_limit.is_zero() {
                println!("  Monthly limit: none");
            } else {
                println!(
                    "  Monthly limit: {}",
                    category.monthly_limit.format_with_symbol(ctx.currency())
                );
            }
            report_refresh(&applied);
        }
    }

    Ok(())
}

/// Handle a transaction command
pub async fn handle_transaction_command(
    ctx: &AppContext,
    cmd: TransactionCommands,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Budget)?;

    match cmd {
        TransactionCommands::Add {
            amount,
            category,
            income,
            description,
        } => {
            let amount = parse_amount(&amount, "amount")?;
            if !amount.is_positive() {
                return Err(FinGridError::Validation(
                    "Amount must be greater than zero".into(),
                ));
            }

            let snapshot = ctx.load_snapshot().await?;
            let category_id = resolve_category(&snapshot, &category)?;

            let applied = BudgetService::new(&ctx.ledger)
                .with_audit(&ctx.audit)
                .add_manual_transaction(ManualTransactionInput {
                    amount: Some(amount),
                    is_income: income,
                    description,
                    category_id: Some(category_id),
                })
                .await?;

            let record = &applied.value;
            println!("Recorded: {}", record.description);
            println!("  Amount:   {}", record.amount.format_with_symbol(ctx.currency()));
            println!("  Category: {}", record.category_name);
            report_refresh(&applied);
        }
    }

    Ok(())
}

//! Bank CLI commands
//!
//! Linking the bank and choosing which of its accounts count toward the
//! total capital.

use clap::Subcommand;

use super::{report_refresh, secret_or_prompt, AppContext};
use crate::display::{format_account_list, print_output, OutputFormat};
use crate::error::{FinGridError, FinGridResult};
use crate::ledger::LedgerSnapshot;
use crate::models::AccountId;
use crate::services::BankService;
use crate::session::RouteGroup;

/// Bank subcommands
#[derive(Subcommand)]
pub enum BankCommands {
    /// Link the bank with a personal token and import its accounts
    Sync {
        /// Personal bank token; prompted for when omitted
        #[arg(long, env = "FINGRID_BANK_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
}

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// List bank accounts
    List,

    /// Include or exclude an account from the total capital
    Toggle {
        /// Account name or ID
        account: String,
    },
}

/// Find an account by exact ID or by name, case-insensitively
fn resolve_account(snapshot: &LedgerSnapshot, input: &str) -> FinGridResult<AccountId> {
    let input = input.trim();
    snapshot
        .accounts
        .iter()
        .find(|a| a.id.as_str() == input)
        .or_else(|| {
            snapshot
                .accounts
                .iter()
                .find(|a| a.name.eq_ignore_ascii_case(input))
        })
        .map(|a| a.id.clone())
        .ok_or_else(|| FinGridError::account_not_found(input))
}

/// Handle a bank command
pub async fn handle_bank_command(ctx: &AppContext, cmd: BankCommands) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::ConnectBank)?;

    match cmd {
        BankCommands::Sync { token } => {
            let token = secret_or_prompt(token, "Bank token: ")?;
            let applied = BankService::new(&ctx.ledger)
                .with_audit(&ctx.audit)
                .sync(&token)
                .await?;

            println!(
                "Bank linked for {}: {} account(s) imported",
                applied.value.user_name, applied.value.accounts_count
            );
            report_refresh(&applied);
        }
    }

    Ok(())
}

/// Handle an account command
pub async fn handle_accounts_command(
    ctx: &AppContext,
    cmd: AccountCommands,
    format: OutputFormat,
) -> FinGridResult<()> {
    ctx.require_route(RouteGroup::Profile)?;

    match cmd {
        AccountCommands::List => {
            let snapshot = ctx.load_snapshot().await?;
            print_output(snapshot.accounts.as_slice(), format, |accounts| {
                format_account_list(accounts, ctx.currency())
            })?;
        }

        AccountCommands::Toggle { account } => {
            let snapshot = ctx.load_snapshot().await?;
            let account_id = resolve_account(&snapshot, &account)?;

            let outcome = BankService::new(&ctx.ledger)
                .with_audit(&ctx.audit)
                .toggle_inclusion(&account_id)
                .await?;

            let snapshot = outcome
                .snapshot()
                .cloned()
                .or_else(|| ctx.ledger.snapshot());
            match snapshot.as_ref().and_then(|s| s.account(&account_id)) {
                Some(updated) => {
                    let state = if updated.is_included_in_total {
                        "included in"
                    } else {
                        "excluded from"
                    };
                    println!("{} is now {} the total capital", updated.name, state);
                }
                None => println!("Toggled account {}", account_id),
            }
            if let Some(snapshot) = snapshot {
                println!(
                    "Total capital: {}",
                    snapshot.total_capital().format_with_symbol(ctx.currency())
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, BudgetSummary, Money};

    fn snapshot() -> LedgerSnapshot {
        let summary = BudgetSummary {
            total_capital: Money::from_minor(1_000),
            bank_balance: Money::from_minor(1_000),
            manual_balance: Money::zero(),
            categories: Vec::new(),
            manual_wallets: Vec::new(),
        };
        let card = Account::new("acc-black", "Black card", Money::from_minor(1_000));
        LedgerSnapshot::assemble(1, summary, vec![card], Vec::new()).unwrap()
    }

    #[test]
    fn test_resolve_account_by_id_or_name() {
        let snapshot = snapshot();
        assert_eq!(resolve_account(&snapshot, "acc-black").unwrap().as_str(), "acc-black");
        assert_eq!(resolve_account(&snapshot, "black CARD").unwrap().as_str(), "acc-black");
        assert!(resolve_account(&snapshot, "savings").unwrap_err().is_not_found());
    }
}

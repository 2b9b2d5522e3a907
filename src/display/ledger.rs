//! Ledger display formatting
//!
//! Formats the summary, bank accounts and history for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::ledger::LedgerSnapshot;
use crate::models::{Account, Money, TransactionRecord};
use crate::reports::BudgetProgressReport;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "In total")]
    included: &'static str,
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn signed(amount: Money, currency: &str) -> String {
    if amount.is_positive() {
        format!("+{}", amount.format_with_symbol(currency))
    } else {
        amount.format_with_symbol(currency)
    }
}

/// Totals, manual wallets and category progress
pub fn format_summary(snapshot: &LedgerSnapshot, currency: &str) -> String {
    let summary = &snapshot.summary;
    let mut output = String::new();

    output.push_str(&format!(
        "Total capital: {}\n",
        summary.total_capital.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Bank:        {}\n",
        summary.bank_balance.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Cash:        {}\n",
        summary.manual_balance.format_with_symbol(currency)
    ));

    if !summary.manual_wallets.is_empty() {
        output.push_str("\nWallets:\n");
        for wallet in &summary.manual_wallets {
            output.push_str(&format!(
                "  {:<20} {:>14}\n",
                wallet.name,
                wallet.balance.format_with_symbol(currency)
            ));
        }
    }

    output.push_str("\nBudgets:\n");
    output.push_str(&BudgetProgressReport::generate(snapshot.categories()).format_terminal(currency));
    output
}

/// Bank accounts as a table with the included total underneath
pub fn format_account_list(accounts: &[Account], currency: &str) -> String {
    if accounts.is_empty() {
        return "No bank accounts. Run 'fingrid bank sync' to link your bank.\n".to_string();
    }

    let rows = accounts.iter().map(|a| AccountRow {
        id: a.id.to_string(),
        name: a.name.clone(),
        balance: a.balance.format_with_symbol(currency),
        included: if a.is_included_in_total { "yes" } else { "no" },
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let included: Money = accounts
        .iter()
        .filter(|a| a.is_included_in_total)
        .map(|a| a.balance)
        .sum();
    format!(
        "{}\nIncluded in total: {}\n",
        table,
        included.format_with_symbol(currency)
    )
}

/// The most recent `limit` transactions
pub fn format_history(transactions: &[TransactionRecord], currency: &str, limit: usize) -> String {
    if transactions.is_empty() {
        return "No transactions yet.\n".to_string();
    }

    let rows = transactions.iter().take(limit).map(|t| HistoryRow {
        date: t.timestamp.format("%Y-%m-%d %H:%M").to_string(),
        description: t.description.clone(),
        category: t.category_name.clone(),
        source: t.source.to_string(),
        amount: signed(t.amount, currency),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    let mut output = format!("{}\n", table);
    if transactions.len() > limit {
        output.push_str(&format!(
            "... {} older transactions not shown\n",
            transactions.len() - limit
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BudgetSummary, Category, CategoryId, TransactionId, TransactionSource,
    };
    use chrono::{TimeZone, Utc};

    fn record(id: &str, amount: i64) -> TransactionRecord {
        TransactionRecord {
            id: TransactionId::new(id),
            amount: Money::from_minor(amount),
            description: format!("tx {}", id),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            source: TransactionSource::Manual,
            category_name: "Food".into(),
            category_icon: "cart.fill".into(),
        }
    }

    #[test]
    fn test_account_list_shows_inclusion() {
        let mut savings = Account::new("s", "Savings", Money::from_minor(50_000));
        savings.is_included_in_total = false;
        let accounts = vec![Account::new("c", "Card", Money::from_minor(1_050)), savings];

        let output = format_account_list(&accounts, "₴");
        assert!(output.contains("Savings"));
        assert!(output.contains("no"));
        assert!(output.contains("Included in total: 10.50 ₴"));
    }

    #[test]
    fn test_history_truncates() {
        let history = vec![record("1", -100), record("2", 250), record("3", -1)];
        let output = format_history(&history, "₴", 2);
        assert!(output.contains("+2.50 ₴"));
        assert!(!output.contains("tx 3"));
        assert!(output.contains("1 older transactions"));
    }

    #[test]
    fn test_summary_lists_budgets() {
        let mut food = Category::new(CategoryId::new(1), "Food", Money::from_minor(10_000));
        food.spent = Money::from_minor(12_000);
        let summary = BudgetSummary {
            total_capital: Money::from_minor(1_000),
            bank_balance: Money::from_minor(1_000),
            manual_balance: Money::zero(),
            categories: vec![food],
            manual_wallets: Vec::new(),
        };
        let card = Account::new("a", "Card", Money::from_minor(1_000));
        let snapshot = LedgerSnapshot::assemble(1, summary, vec![card], Vec::new()).unwrap();

        let output = format_summary(&snapshot, "₴");
        assert!(output.contains("Total capital: 10.00 ₴"));
        assert!(output.contains("Food"));
        assert!(output.contains("120%"));
    }
}

//! Budget progress
//!
//! Turns a category's spend and monthly limit into the figures behind a
//! progress bar: the raw ratio, the ratio clamped for display and whether the
//! category is over budget.

use serde::Serialize;

use crate::models::{Category, CategoryId, Money};

/// Width of the terminal progress bar in cells
const BAR_WIDTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProgressState {
    Normal,
    OverBudget,
}

/// Progress of one category against its monthly limit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category_id: CategoryId,
    pub name: String,
    pub spent: Money,
    pub monthly_limit: Money,
    /// spent / limit, unclamped; zero when no limit is set
    pub ratio: f64,
    /// `ratio` clamped to 1 for drawing
    pub display_ratio: f64,
    pub state: ProgressState,
    /// Limit minus spent; negative once over budget
    pub remaining: Money,
}

impl BudgetProgress {
    pub fn for_category(category: &Category) -> Self {
        let ratio = ratio(category.spent, category.monthly_limit);
        Self {
            category_id: category.id,
            name: category.name.clone(),
            spent: category.spent,
            monthly_limit: category.monthly_limit,
            ratio,
            display_ratio: ratio.min(1.0),
            state: if ratio >= 1.0 {
                ProgressState::OverBudget
            } else {
                ProgressState::Normal
            },
            remaining: category.monthly_limit - category.spent,
        }
    }

    /// Unclamped ratio as a percentage
    pub fn percent(&self) -> f64 {
        self.ratio * 100.0
    }

    pub fn is_over_budget(&self) -> bool {
        self.state == ProgressState::OverBudget
    }

    /// A fixed-width bar such as `█████░░░░░`
    pub fn bar(&self) -> String {
        let filled = (self.display_ratio * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
    }
}

fn ratio(spent: Money, limit: Money) -> f64 {
    if limit.is_positive() {
        spent.minor() as f64 / limit.minor() as f64
    } else {
        0.0
    }
}

/// Progress for every category of the summary
#[derive(Debug, Clone, Serialize)]
pub struct BudgetProgressReport {
    pub rows: Vec<BudgetProgress>,
}

impl BudgetProgressReport {
    pub fn generate(categories: &[Category]) -> Self {
        Self {
            rows: categories.iter().map(BudgetProgress::for_category).collect(),
        }
    }

    pub fn over_budget(&self) -> impl Iterator<Item = &BudgetProgress> {
        self.rows.iter().filter(|r| r.is_over_budget())
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        if self.rows.is_empty() {
            return "No categories yet.\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<20} {:<width$} {:>14} {:>14} {:>7}\n",
            "Category",
            "Progress",
            "Spent",
            "Limit",
            "%",
            width = BAR_WIDTH
        ));
        output.push_str(&"-".repeat(20 + BAR_WIDTH + 14 + 14 + 7 + 4));
        output.push('\n');

        for row in &self.rows {
            let marker = if row.is_over_budget() { " !" } else { "" };
            output.push_str(&format!(
                "{:<20} {} {:>14} {:>14} {:>6.0}%{}\n",
                row.name,
                row.bar(),
                row.spent.format_with_symbol(currency),
                row.monthly_limit.format_with_symbol(currency),
                row.percent(),
                marker
            ));
        }

        output
    }
}

//! Spending breakdown
//!
//! Normalizes per-category spend into percentage shares and gives each row a
//! palette color by position, so the same ordering always gets the same
//! colors.

use serde::Serialize;

use crate::models::{CategorySpend, Money};

/// Chart colors, assigned by row index
pub const PALETTE: [&str; 6] = [
    "#2ECC71", "#E74C3C", "#F1C40F", "#3498DB", "#9B59B6", "#E67E22",
];

pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One slice of the breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingShare {
    pub name: String,
    pub spent: Money,
    /// Percentage of the total, 0 when nothing was spent
    pub share: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingBreakdown {
    pub rows: Vec<SpendingShare>,
    pub total: Money,
}

impl SpendingBreakdown {
    /// Build the breakdown; a negative spend counts as nothing spent
    pub fn from_spends(spends: &[CategorySpend]) -> Self {
        let counted = |s: &CategorySpend| s.spent.max(Money::zero());
        let total: Money = spends.iter().map(counted).sum();

        let rows = spends
            .iter()
            .enumerate()
            .map(|(index, spend)| {
                let share = if total.is_positive() {
                    counted(spend).minor() as f64 / total.minor() as f64 * 100.0
                } else {
                    0.0
                };
                SpendingShare {
                    name: spend.name.clone(),
                    spent: spend.spent,
                    share,
                    color: color_for(index),
                }
            })
            .collect();

        Self { rows, total }
    }

    /// No rows at all: nothing has been categorized yet
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Format the breakdown for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        if self.is_empty() {
            return "No spending data yet.\n".to_string();
        }

        let mut output = String::new();
        output.push_str(&format!(
            "{:<24} {:>14} {:>7}  {}\n",
            "Category", "Spent", "Share", "Color"
        ));
        output.push_str(&"-".repeat(56));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<24} {:>14} {:>6.1}%  {}\n",
                row.name,
                row.spent.format_with_symbol(currency),
                row.share,
                row.color
            ));
        }

        output.push_str(&"-".repeat(56));
        output.push('\n');
        output.push_str(&format!(
            "{:<24} {:>14}\n",
            "Total",
            self.total.format_with_symbol(currency)
        ));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spends(amounts: &[i64]) -> Vec<CategorySpend> {
        amounts
            .iter()
            .enumerate()
            .map(|(i, a)| CategorySpend::new(format!("Category {}", i), Money::from_minor(*a)))
            .collect()
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let breakdown = SpendingBreakdown::from_spends(&spends(&[3_333, 3_333, 3_334, 1]));
        let sum: f64 = breakdown.rows.iter().map(|r| r.share).sum();
        assert!((sum - 100.0).abs() < 1e-9);
        assert_eq!(breakdown.total, Money::from_minor(10_001));
    }

    #[test]
    fn test_zero_total_gives_zero_shares() {
        let breakdown = SpendingBreakdown::from_spends(&spends(&[0, 0]));
        assert!(breakdown.rows.iter().all(|r| r.share == 0.0));
        assert!(!breakdown.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let breakdown = SpendingBreakdown::from_spends(&[]);
        assert!(breakdown.is_empty());
        assert!(breakdown.total.is_zero());
        assert_eq!(breakdown.format_terminal("₴"), "No spending data yet.\n");
    }

    #[test]
    fn test_colors_wrap_around_palette() {
        let breakdown = SpendingBreakdown::from_spends(&spends(&[1; 8]));
        assert_eq!(breakdown.rows[0].color, "#2ECC71");
        assert_eq!(breakdown.rows[5].color, "#E67E22");
        assert_eq!(breakdown.rows[6].color, breakdown.rows[0].color);
        assert_eq!(breakdown.rows[7].color, "#E74C3C");
    }

    #[test]
    fn test_single_category_takes_everything() {
        let breakdown = SpendingBreakdown::from_spends(&spends(&[125_040]));
        assert_eq!(breakdown.rows[0].share, 100.0);
    }
}

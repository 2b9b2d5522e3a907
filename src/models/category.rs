//! Budget category models
//!
//! A category carries a monthly limit and the amount spent against it so far.
//! Both figures are computed by the backend; the client only validates them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::money::Money;

/// Icon used for categories created without an explicit one
pub const DEFAULT_CATEGORY_ICON: &str = "tag.fill";

/// A budget category with its monthly limit and current spend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Monthly spending limit (zero means "no limit set")
    pub monthly_limit: Money,

    /// Amount spent in the current month
    pub spent: Money,

    /// Symbolic icon name chosen by the user
    #[serde(default)]
    pub icon: String,
}

impl Category {
    /// Create a category with no spend yet
    pub fn new(id: CategoryId, name: impl Into<String>, monthly_limit: Money) -> Self {
        Self {
            id,
            name: name.into(),
            monthly_limit,
            spent: Money::zero(),
            icon: DEFAULT_CATEGORY_ICON.to_string(),
        }
    }

    /// Validate the category figures
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.monthly_limit.is_negative() {
            return Err(CategoryValidationError::NegativeLimit(self.id));
        }

        if self.spent.is_negative() {
            return Err(CategoryValidationError::NegativeSpent(self.id));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One row of the spend-by-category analytics endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpend {
    pub name: String,
    pub spent: Money,
}

impl CategorySpend {
    pub fn new(name: impl Into<String>, spent: Money) -> Self {
        Self {
            name: name.into(),
            spent,
        }
    }

    /// Validate the spend figure
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.spent.is_negative() {
            return Err(CategoryValidationError::NegativeSpend(self.name.clone()));
        }
        Ok(())
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    NegativeLimit(CategoryId),
    NegativeSpent(CategoryId),
    NegativeSpend(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeLimit(id) => write!(f, "Category {} has a negative monthly limit", id),
            Self::NegativeSpent(id) => write!(f, "Category {} has a negative spent amount", id),
            Self::NegativeSpend(name) => {
                write!(f, "Analytics row '{}' has a negative spent amount", name)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

//! Budget store and budget classification
//!
//! Per-category spending limits held for the lifetime of a session, and the
//! three-way status a category's spending falls into against its limit.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Parse a non-negative amount such as a budget limit or monthly income
pub fn parse_non_negative(input: &str, what: &str) -> LedgerResult<Money> {
    let amount = Money::parse(input)
        .map_err(|e| LedgerError::Validation(format!("Invalid {}: {}", what, e)))?;

    if amount.is_negative() {
        return Err(LedgerError::Validation(format!(
            "{} cannot be negative: {}",
            what, amount
        )));
    }

    Ok(amount)
}

/// Mapping from category name to budget limit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetStore {
    limits: BTreeMap<String, Money>,
}

impl BudgetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or overwrite the limit for a category
    pub fn set(&mut self, category: impl Into<String>, limit: Money) -> LedgerResult<()> {
        if limit.is_negative() {
            return Err(LedgerError::Validation(format!(
                "Budget limit cannot be negative: {}",
                limit
            )));
        }
        self.limits.insert(category.into(), limit);
        Ok(())
    }

    pub fn get(&self, category: &str) -> Option<Money> {
        self.limits.get(category).copied()
    }

    /// Iterate over (category, limit) in category order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

/// Where a category's spending sits relative to its limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spending is strictly below the warning threshold
    WithinBudget,
    /// Spending is at or above the warning threshold but not over the limit
    Warning,
    /// Spending is over the limit
    Exceeded,
}

impl BudgetStatus {
    /// Classify `spent` against `budget`
    ///
    /// `warning_threshold` is the fraction of the budget (normally 0.75) at which
    /// a category enters the warning band. Spending exactly equal to the budget
    /// is a warning, not exceeded.
    pub fn classify(spent: Money, budget: Money, warning_threshold: f64) -> Self {
        if spent > budget {
            Self::Exceeded
        } else if spent.cents() as f64 >= budget.cents() as f64 * warning_threshold {
            Self::Warning
        } else {
            Self::WithinBudget
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, Self::Exceeded)
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithinBudget => write!(f, "Within Budget"),
            Self::Warning => write!(f, "Warning"),
            Self::Exceeded => write!(f, "Exceeded"),
        }
    }
}

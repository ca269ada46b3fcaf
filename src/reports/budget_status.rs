//! Budget Status Report
//!
//! Compares each budgeted category's spending against its limit.

use std::collections::BTreeMap;
use std::io::Write;

use super::spending::spending_by_category;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{BudgetStatus, BudgetStore, Money, Transaction};

/// Warning band used when no setting overrides it
pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.75;

/// One budgeted category's line in the report
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetStatusRow {
    pub category: String,
    /// Magnitude of the category total (zero when it has no transactions)
    pub spent: Money,
    pub budget: Money,
    pub status: BudgetStatus,
}

impl BudgetStatusRow {
    /// Budget left before the limit is reached (negative when exceeded)
    pub fn remaining(&self) -> Money {
        self.budget - self.spent
    }
}

/// Budget Status Report
#[derive(Debug, Clone)]
pub struct BudgetStatusReport {
    /// Budgeted categories in name order
    pub rows: Vec<BudgetStatusRow>,
    /// True when no budgeted category is over its limit
    pub all_within_budget: bool,
    pub monthly_income: Option<Money>,
}

/// Classify every budgeted category
///
/// Categories with transactions but no budget are not reported. Expenses are
/// negative amounts, so spending is the negated category total; a category that
/// nets to zero or above (refunds outweighing purchases) has spent nothing.
pub fn budget_status(
    transactions: &[Transaction],
    budgets: &BudgetStore,
    warning_threshold: f64,
) -> BudgetStatusReport {
    let totals = spending_by_category(transactions);

    let rows: Vec<BudgetStatusRow> = budgets
        .iter()
        .map(|(category, budget)| {
            let total = totals.get(category).copied().unwrap_or_default();
            let spent = if total.is_negative() { -total } else { Money::zero() };
            BudgetStatusRow {
                category: category.to_string(),
                spent,
                budget,
                status: BudgetStatus::classify(spent, budget, warning_threshold),
            }
        })
        .collect();

    BudgetStatusReport {
        all_within_budget: rows.iter().all(|r| !r.status.is_exceeded()),
        rows,
        monthly_income: None,
    }
}

impl BudgetStatusReport {
    pub fn with_income(mut self, income: Option<Money>) -> Self {
        self.monthly_income = income;
        self
    }

    /// category -> (actual, budget), the series for the comparison chart
    pub fn comparison(&self) -> BTreeMap<String, (Money, Money)> {
        self.rows
            .iter()
            .map(|r| (r.category.clone(), (r.spent, r.budget)))
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Budget Status\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if let Some(income) = self.monthly_income {
            output.push_str(&format!("Monthly Income: {}\n", income));
        }

        if self.rows.is_empty() {
            output.push_str("No budgets set. Use 'Set Category Budget' first.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<24} {:>12} {:>12} {:>12}  {}\n",
            "Category", "Spent", "Budget", "Remaining", "Status"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<24} {:>12} {:>12} {:>12}  {}\n",
                row.category,
                row.spent.to_string(),
                row.budget.to_string(),
                row.remaining().to_string(),
                row.status
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        if self.all_within_budget {
            output.push_str("All categories are within budget.\n");
        } else {
            let over: Vec<&str> = self
                .rows
                .iter()
                .filter(|r| r.status.is_exceeded())
                .map(|r| r.category.as_str())
                .collect();
            output.push_str(&format!("Over budget: {}\n", over.join(", ")));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

        out.write_record(["Category", "Spent", "Budget", "Remaining", "Status"])
            .map_err(export_err)?;
        for row in &self.rows {
            out.write_record([
                row.category.clone(),
                row.spent.to_decimal_string(),
                row.budget.to_decimal_string(),
                row.remaining().to_decimal_string(),
                row.status.to_string(),
            ])
            .map_err(export_err)?;
        }

        out.flush().map_err(|e| LedgerError::Export(e.to_string()))
    }
}

//! Spending Report
//!
//! Totals per category and the top spending category.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction};

/// Sum of amounts per category
///
/// Only categories that appear in `transactions` are present.
pub fn spending_by_category(transactions: &[Transaction]) -> BTreeMap<String, Money> {
    let mut totals: BTreeMap<String, Money> = BTreeMap::new();
    for txn in transactions {
        *totals.entry(txn.category.clone()).or_default() += txn.amount;
    }
    totals
}

/// The category with the largest spending and its total
///
/// Expenses are negative amounts, so the top category is the one with the most
/// negative total; income categories never outrank spending. When no category
/// has a negative total, the largest total is returned instead. Ties go to the
/// lexicographically smallest category name. Returns `None` for an empty table.
pub fn top_spending_category(transactions: &[Transaction]) -> Option<(String, Money)> {
    let totals = spending_by_category(transactions);

    // min_by_key keeps the first minimum, which is the first name in BTreeMap order
    let spending = totals
        .iter()
        .filter(|(_, total)| total.is_negative())
        .min_by_key(|(_, total)| **total)
        .map(|(category, total)| (category.clone(), *total));

    // max_by_key keeps the last maximum, so iterate in reverse for the first name
    spending.or_else(|| totals.into_iter().rev().max_by_key(|(_, total)| *total))
}

/// One category's line in the spending report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySpending {
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Categories in name order
    pub categories: Vec<CategorySpending>,
    /// Sum over every row
    pub total: Money,
    pub total_transactions: usize,
}

impl SpendingReport {
    pub fn generate(transactions: &[Transaction]) -> Self {
        let mut by_category: BTreeMap<&str, (Money, usize)> = BTreeMap::new();
        for txn in transactions {
            let entry = by_category.entry(txn.category.as_str()).or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let categories = by_category
            .into_iter()
            .map(|(category, (total, transaction_count))| CategorySpending {
                category: category.to_string(),
                total,
                transaction_count,
            })
            .collect();

        Self {
            categories,
            total: transactions.iter().map(|t| t.amount).sum(),
            total_transactions: transactions.len(),
        }
    }

    /// Category totals keyed by name
    pub fn totals(&self) -> BTreeMap<String, Money> {
        self.categories
            .iter()
            .map(|c| (c.category.clone(), c.total))
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Total Spending by Category\n");
        output.push_str(&"=".repeat(60));
        output.push('\n');

        if self.categories.is_empty() {
            output.push_str("No transactions found.\n");
            return output;
        }

        output.push_str(&format!("{:<35} {:>14} {:>8}\n", "Category", "Amount", "Count"));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        for category in &self.categories {
            output.push_str(&format!(
                "{:<35} {:>14} {:>8}\n",
                category.category,
                category.total.to_string(),
                category.transaction_count
            ));
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "{:<35} {:>14} {:>8}\n",
            "TOTAL",
            self.total.to_string(),
            self.total_transactions
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

        out.write_record(["Category", "Amount", "Transaction Count"])
            .map_err(export_err)?;
        for category in &self.categories {
            let amount = category.total.to_decimal_string();
            let count = category.transaction_count.to_string();
            out.write_record([category.category.as_str(), amount.as_str(), count.as_str()])
                .map_err(export_err)?;
        }

        out.flush().map_err(|e| LedgerError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(day: (i32, u32, u32), category: &str, cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(day.0, day.1, day.2).unwrap(),
            category,
            "",
            Money::from_cents(cents),
        )
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            txn((2024, 1, 5), "Food", -2000),
            txn((2024, 1, 20), "Food", -3000),
            txn((2024, 2, 1), "Rent", -50000),
        ]
    }

    #[test]
    fn test_spending_by_category() {
        let totals = spending_by_category(&scenario());

        assert_eq!(totals.len(), 2);
        assert_eq!(totals["Food"], Money::from_cents(-5000));
        assert_eq!(totals["Rent"], Money::from_cents(-50000));
        assert!(!totals.contains_key("Travel"));
    }

    #[test]
    fn test_category_totals_sum_to_table_total() {
        let mut txns = scenario();
        txns.push(txn((2024, 2, 2), "Salary", 250000));
        txns.push(txn((2024, 2, 3), "Food", -1234));

        let by_category: Money = spending_by_category(&txns).values().sum();
        let table: Money = txns.iter().map(|t| t.amount).sum();
        assert_eq!(by_category, table);
    }

    #[test]
    fn test_top_spending_category() {
        assert_eq!(
            top_spending_category(&scenario()),
            Some(("Rent".to_string(), Money::from_cents(-50000)))
        );
        assert_eq!(top_spending_category(&[]), None);
    }

    #[test]
    fn test_top_spending_tie_breaks_by_name() {
        let txns = vec![
            txn((2024, 1, 1), "Zoo", -1000),
            txn((2024, 1, 2), "Books", -1000),
            txn((2024, 1, 3), "Movies", -1000),
        ];
        assert_eq!(top_spending_category(&txns).unwrap().0, "Books");
    }

    #[test]
    fn test_totals_at_the_amount_cap_do_not_overflow() {
        let txns: Vec<_> = (0..10_000)
            .map(|_| txn((2024, 1, 1), "Big", Money::MAX_ABS_CENTS))
            .collect();

        let totals = spending_by_category(&txns);
        assert_eq!(totals["Big"], Money::from_cents(i64::MAX));
        assert_eq!(SpendingReport::generate(&txns).total, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_top_spending_ignores_income() {
        let txns = vec![
            txn((2024, 1, 1), "Salary", 300000),
            txn((2024, 1, 2), "Rent", -50000),
            txn((2024, 1, 3), "Food", -2000),
        ];
        assert_eq!(
            top_spending_category(&txns),
            Some(("Rent".to_string(), Money::from_cents(-50000)))
        );
    }

    #[test]
    fn test_top_spending_without_expenses_falls_back_to_largest() {
        let txns = vec![
            txn((2024, 1, 1), "Salary", 300000),
            txn((2024, 1, 2), "Bonus", 300000),
            txn((2024, 1, 3), "Refunds", 1500),
        ];
        assert_eq!(
            top_spending_category(&txns),
            Some(("Bonus".to_string(), Money::from_cents(300000)))
        );
    }

    #[test]
    fn test_report_lines() {
        let report = SpendingReport::generate(&scenario());

        assert_eq!(report.total, Money::from_cents(-55000));
        assert_eq!(report.categories[0].category, "Food");
        assert_eq!(report.categories[0].transaction_count, 2);
        assert_eq!(report.totals(), spending_by_category(&scenario()));

        let text = report.format_terminal();
        assert!(text.contains("Food"));
        assert!(text.contains("-$500.00"));
    }

    #[test]
    fn test_export_csv() {
        let mut out = Vec::new();
        SpendingReport::generate(&scenario()).export_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Category,Amount,Transaction Count\nFood,-50.00,2\nRent,-500.00,1\n"
        );
    }
}

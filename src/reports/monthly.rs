//! Monthly Spending Report
//!
//! Per-month totals and averages, and the time-ordered trend series handed to
//! the trend chart.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction, YearMonth};

/// Mean amount per calendar month
///
/// Rows with a bad date never reach the table (load skips them), so every
/// stored row contributes. Means are rounded to the cent, half away from zero.
pub fn average_monthly_spending(transactions: &[Transaction]) -> BTreeMap<YearMonth, Money> {
    group_by_month(transactions)
        .into_iter()
        .filter_map(|(month, (total, count))| Money::mean(total, count).map(|avg| (month, avg)))
        .collect()
}

/// Monthly totals in chronological order
pub fn monthly_trend(transactions: &[Transaction]) -> Vec<(YearMonth, Money)> {
    group_by_month(transactions)
        .into_iter()
        .map(|(month, (total, _))| (month, total))
        .collect()
}

fn group_by_month(transactions: &[Transaction]) -> BTreeMap<YearMonth, (Money, usize)> {
    let mut months: BTreeMap<YearMonth, (Money, usize)> = BTreeMap::new();
    for txn in transactions {
        let entry = months.entry(YearMonth::from_date(txn.date)).or_default();
        entry.0 += txn.amount;
        entry.1 += 1;
    }
    months
}

/// One month's line in the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlySpending {
    pub month: YearMonth,
    pub total: Money,
    pub average: Money,
    pub transaction_count: usize,
}

/// Monthly Spending Report
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    /// Months in chronological order
    pub months: Vec<MonthlySpending>,
}

impl MonthlyReport {
    pub fn generate(transactions: &[Transaction]) -> Self {
        let months = group_by_month(transactions)
            .into_iter()
            .filter_map(|(month, (total, count))| {
                Money::mean(total, count).map(|average| MonthlySpending {
                    month,
                    total,
                    average,
                    transaction_count: count,
                })
            })
            .collect();

        Self { months }
    }

    /// `(month label, total)` pairs for the trend chart
    pub fn trend_points(&self) -> Vec<(String, Money)> {
        self.months
            .iter()
            .map(|m| (m.month.to_string(), m.total))
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Average Monthly Spending\n");
        output.push_str(&"=".repeat(52));
        output.push('\n');

        if self.months.is_empty() {
            output.push_str("No transactions found.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<10} {:>14} {:>14} {:>10}\n",
            "Month", "Average", "Total", "Count"
        ));
        output.push_str(&"-".repeat(52));
        output.push('\n');

        for m in &self.months {
            output.push_str(&format!(
                "{:<10} {:>14} {:>14} {:>10}\n",
                m.month.to_string(),
                m.average.to_string(),
                m.total.to_string(),
                m.transaction_count
            ));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut out = csv::Writer::from_writer(writer);
        let export_err = |e: csv::Error| LedgerError::Export(e.to_string());

        out.write_record(["Month", "Average", "Total", "Transaction Count"])
            .map_err(export_err)?;
        for m in &self.months {
            out.write_record([
                m.month.to_string(),
                m.average.to_decimal_string(),
                m.total.to_decimal_string(),
                m.transaction_count.to_string(),
            ])
            .map_err(export_err)?;
        }

        out.flush().map_err(|e| LedgerError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(y: i32, m: u32, d: u32, cents: i64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            "Any",
            "",
            Money::from_cents(cents),
        )
    }

    fn month(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn scenario() -> Vec<Transaction> {
        vec![
            txn(2024, 1, 5, -2000),
            txn(2024, 1, 20, -3000),
            txn(2024, 2, 1, -50000),
        ]
    }

    #[test]
    fn test_average_monthly_spending() {
        let averages = average_monthly_spending(&scenario());

        assert_eq!(averages.len(), 2);
        assert_eq!(averages[&month(2024, 1)], Money::from_cents(-2500));
        assert_eq!(averages[&month(2024, 2)], Money::from_cents(-50000));
    }

    #[test]
    fn test_trend_is_chronological_across_years() {
        let txns = vec![
            txn(2024, 1, 3, -100),
            txn(2023, 12, 30, -200),
            txn(2023, 12, 1, -300),
        ];

        assert_eq!(
            monthly_trend(&txns),
            vec![
                (month(2023, 12), Money::from_cents(-500)),
                (month(2024, 1), Money::from_cents(-100)),
            ]
        );
    }

    #[test]
    fn test_empty_table() {
        assert!(average_monthly_spending(&[]).is_empty());
        let report = MonthlyReport::generate(&[]);
        assert!(report.format_terminal().contains("No transactions found"));
    }

    #[test]
    fn test_report_and_trend_points() {
        let report = MonthlyReport::generate(&scenario());

        assert_eq!(report.months[0].transaction_count, 2);
        assert_eq!(
            report.trend_points(),
            vec![
                ("2024-01".to_string(), Money::from_cents(-5000)),
                ("2024-02".to_string(), Money::from_cents(-50000)),
            ]
        );

        let text = report.format_terminal();
        assert!(text.contains("2024-01"));
        assert!(text.contains("-$25.00"));
    }

    #[test]
    fn test_export_csv() {
        let mut out = Vec::new();
        MonthlyReport::generate(&scenario()).export_csv(&mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Month,Average,Total,Transaction Count\n"));
        assert!(text.contains("2024-01,-25.00,-50.00,2\n"));
    }
}

//! Terminal bar charts
//!
//! Horizontal bar renderings of the monthly trend series and of budget vs actual
//! spending. Bars are scaled by magnitude, so a month of expenses recorded as
//! negative amounts still draws a bar; the signed value is printed beside it.

use std::collections::BTreeMap;

use super::report::{format_bar, format_header, format_percentage, separator, truncate};
use crate::models::Money;

const LABEL_WIDTH: usize = 16;

/// Render the `(month label, total)` series as one bar per month
pub fn format_trend_chart(points: &[(String, Money)], width: usize) -> String {
    let mut output = String::new();
    let line_width = LABEL_WIDTH + width + 16;

    output.push_str(&format_header("Monthly Spending Trend", line_width));
    output.push('\n');
    output.push_str(&separator(line_width));
    output.push('\n');

    if points.is_empty() {
        output.push_str("No transactions to chart.\n");
        return output;
    }

    let max = points
        .iter()
        .map(|(_, total)| total.abs().as_f64())
        .fold(0.0, f64::max);

    for (label, total) in points {
        output.push_str(&format!(
            "{:<label_width$} {} {:>13}\n",
            truncate(label, LABEL_WIDTH),
            format_bar(total.abs().as_f64(), max, width),
            total.to_string(),
            label_width = LABEL_WIDTH,
        ));
    }

    output
}

/// Render category -> (actual, budget) as paired bars on a shared scale
pub fn format_budget_chart(comparison: &BTreeMap<String, (Money, Money)>, width: usize) -> String {
    let mut output = String::new();
    let line_width = LABEL_WIDTH + width + 24;

    output.push_str(&format_header("Budget vs Actual", line_width));
    output.push('\n');
    output.push_str(&separator(line_width));
    output.push('\n');

    if comparison.is_empty() {
        output.push_str("No budgets to chart.\n");
        return output;
    }

    let max = comparison
        .values()
        .flat_map(|(actual, budget)| [actual.abs().as_f64(), budget.abs().as_f64()])
        .fold(0.0, f64::max);

    for (category, (actual, budget)) in comparison {
        let used = if budget.is_zero() {
            String::new()
        } else {
            format!(" ({})", format_percentage(actual.as_f64() / budget.as_f64() * 100.0))
        };

        output.push_str(&format!(
            "{:<label_width$} actual {} {:>12}{}\n",
            truncate(category, LABEL_WIDTH),
            format_bar(actual.abs().as_f64(), max, width),
            actual.to_string(),
            used,
            label_width = LABEL_WIDTH,
        ));
        output.push_str(&format!(
            "{:<label_width$} budget {} {:>12}\n",
            "",
            format_bar(budget.abs().as_f64(), max, width),
            budget.to_string(),
            label_width = LABEL_WIDTH,
        ));
    }

    output
}

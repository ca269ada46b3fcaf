//! Reports over a ledger's transaction table
//!
//! Category totals, the top spending category, monthly averages and trend, and
//! budget status. Each report can be printed to the terminal or exported as CSV.

pub mod budget_status;
pub mod monthly;
pub mod spending;

pub use budget_status::{
    budget_status, BudgetStatusReport, BudgetStatusRow, DEFAULT_WARNING_THRESHOLD,
};
pub use monthly::{average_monthly_spending, monthly_trend, MonthlyReport, MonthlySpending};
pub use spending::{spending_by_category, top_spending_category, CategorySpending, SpendingReport};

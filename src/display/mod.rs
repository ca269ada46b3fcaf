//! Display formatting for terminal output
//!
//! Transaction tables, bar charts, and the small text helpers they share.

pub mod chart;
pub mod report;
pub mod transaction;

pub use chart::{format_budget_chart, format_trend_chart};
pub use transaction::{
    format_ledger, format_transaction_details, format_transaction_table, TableFormat,
};

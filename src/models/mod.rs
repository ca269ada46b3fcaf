//! Core data models for the ledger
//!
//! This module contains the data structures that represent the ledger domain:
//! transactions, money amounts, months and budgets.

pub mod budget;
pub mod money;
pub mod period;
pub mod transaction;

pub use budget::{BudgetStatus, BudgetStore};
pub use money::Money;
pub use period::YearMonth;
pub use transaction::{Transaction, TransactionEdit};

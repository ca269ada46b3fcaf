//! ledger-cli - Terminal personal finance ledger
//!
//! This library provides the core of the `ledger` application: a table of
//! transactions loaded from CSV, the operations a user performs on it, and the
//! spending reports computed over it.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions, budgets, months)
//! - `storage`: CSV file storage layer
//! - `services`: The ledger session and its operations
//! - `reports`: Category, monthly and budget reports
//! - `audit`: Audit logging of ledger mutations
//! - `display`: Terminal tables and charts
//! - `cli`: Interactive menu and one-shot report commands
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_cli::reports::spending_by_category;
//! use ledger_cli::services::Ledger;
//!
//! let mut ledger = Ledger::load("transactions.csv")?;
//! ledger.add("2024-03-01", "Food", "Lunch", "-12.50")?;
//! let totals = spending_by_category(ledger.view_all());
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};

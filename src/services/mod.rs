//! Business logic layer
//!
//! The [`Ledger`] session and the operations a user performs on it.

pub mod budget;
pub mod ledger;

pub use ledger::{EditOutcome, Ledger};

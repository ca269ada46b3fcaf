//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diff::describe_changes;
use crate::models::Transaction;

/// Types of ledger mutations that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Row appended
    Add,
    /// Row edited in place
    Edit,
    /// Row removed
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Add => write!(f, "ADD"),
            Operation::Edit => write!(f, "EDIT"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// A single audit log entry
///
/// Records one mutation of one ledger row with the row as it was before and
/// after the operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Row index at the time of the operation
    pub row: usize,

    /// Ledger file the session was loaded from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ledger: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Transaction>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Transaction>,

    /// Human-readable diff summary (edits only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, row: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            row,
            ledger: None,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn add(row: usize, txn: &Transaction) -> Self {
        Self {
            after: Some(txn.clone()),
            ..Self::new(Operation::Add, row)
        }
    }

    pub fn edit(row: usize, before: &Transaction, after: &Transaction) -> Self {
        Self {
            before: Some(before.clone()),
            after: Some(after.clone()),
            diff_summary: describe_changes(before, after),
            ..Self::new(Operation::Edit, row)
        }
    }

    pub fn delete(row: usize, txn: &Transaction) -> Self {
        Self {
            before: Some(txn.clone()),
            ..Self::new(Operation::Delete, row)
        }
    }

    /// Tag the entry with the ledger file it applies to
    pub fn with_ledger(mut self, ledger: Option<String>) -> Self {
        self.ledger = ledger;
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} row {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.row
        );

        if let Some(ledger) = &self.ledger {
            output.push_str(&format!(" ({})", ledger));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

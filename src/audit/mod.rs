//! Audit logging for ledger mutations
//!
//! Every add, edit and delete is recorded with the affected row before and
//! after the operation in an append-only audit log.
//!
//! - `AuditEntry`: one mutation with timestamp, operation, row index, and the
//!   row's before/after values.
//! - `AuditLogger`: appends entries to a line-delimited JSON (JSONL) file.
//! - `describe_changes`: one-line summary of the fields an edit changed.
//!
//! # Example
//!
//! ```rust,ignore
//! use ledger_cli::audit::{AuditEntry, AuditLogger};
//!
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::edit(index, &before, &after))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::describe_changes;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;

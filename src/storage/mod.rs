//! Storage layer for the ledger
//!
//! Ledger files are plain CSV; saves go through a temp file and a rename so a
//! failed write never clobbers the previous file.

pub mod file_io;

pub use file_io::{
    read_ledger_csv, read_transactions, write_ledger_csv_atomic, write_transactions,
    ColumnMapping, LedgerImport, SkippedRow, LEDGER_HEADER,
};

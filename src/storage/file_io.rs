//! Ledger CSV reading and atomic writing
//!
//! Ledger files have a header row naming `Date`, `Category`, `Description` and
//! `Amount`. Header names are matched case-insensitively and `Description` may be
//! missing; any other columns are ignored.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::Serialize;
use tracing::warn;

use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::{parse_amount, parse_date};
use crate::models::Transaction;

/// Header written to every saved ledger file
pub const LEDGER_HEADER: [&str; 4] = ["Date", "Category", "Description", "Amount"];

/// Positions of the ledger columns within a file's header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date_column: usize,
    pub category_column: usize,
    pub description_column: Option<usize>,
    pub amount_column: usize,
}

impl ColumnMapping {
    /// Locate the ledger columns in a header row
    ///
    /// Fails with a load error naming every required column that is missing.
    pub fn from_headers(headers: &StringRecord) -> LedgerResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let date = find("date");
        let category = find("category");
        let amount = find("amount");

        match (date, category, amount) {
            (Some(date_column), Some(category_column), Some(amount_column)) => Ok(Self {
                date_column,
                category_column,
                description_column: find("description"),
                amount_column,
            }),
            _ => {
                let missing: Vec<&str> = [("Date", date), ("Category", category), ("Amount", amount)]
                    .iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| *name)
                    .collect();
                Err(LedgerError::Load(format!(
                    "Missing required column(s): {}",
                    missing.join(", ")
                )))
            }
        }
    }

    fn parse_record(&self, record: &StringRecord) -> LedgerResult<Transaction> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .ok_or_else(|| LedgerError::Validation(format!("Missing {} value", name)))
        };

        let date = parse_date(field(self.date_column, "date")?)?;
        let category = field(self.category_column, "category")?;
        let description = self
            .description_column
            .and_then(|idx| record.get(idx))
            .unwrap_or_default();
        let amount = parse_amount(field(self.amount_column, "amount")?)?;

        Ok(Transaction::new(date, category, description, amount))
    }
}

/// One row as written to a ledger file
#[derive(Debug, Serialize)]
struct LedgerRecord<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Description")]
    description: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
}

impl<'a> From<&'a Transaction> for LedgerRecord<'a> {
    fn from(txn: &'a Transaction) -> Self {
        Self {
            date: txn.date.format("%Y-%m-%d").to_string(),
            category: &txn.category,
            description: &txn.description,
            amount: txn.amount.to_decimal_string(),
        }
    }
}

/// A data row left out of a load because its date or amount did not parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (the header is not counted)
    pub row: usize,
    pub reason: String,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skipped row {}: {}", self.row, self.reason)
    }
}

/// Rows read from a ledger file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LedgerImport {
    pub transactions: Vec<Transaction>,
    pub skipped: Vec<SkippedRow>,
}

/// Parse ledger rows from any CSV source
///
/// A row whose date or amount does not parse is skipped and listed in
/// [`LedgerImport::skipped`]. The read fails only on header problems or
/// malformed CSV.
pub fn read_transactions<R: Read>(source: R) -> LedgerResult<LedgerImport> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(source);

    let headers = reader
        .headers()
        .map_err(|e| LedgerError::Load(format!("Failed to read header row: {}", e)))?
        .clone();
    let mapping = ColumnMapping::from_headers(&headers)?;

    let mut import = LedgerImport::default();
    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record =
            result.map_err(|e| LedgerError::Load(format!("Row {}: malformed CSV: {}", row, e)))?;

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        match mapping.parse_record(&record) {
            Ok(txn) => import.transactions.push(txn),
            Err(e) => {
                warn!(row, "Skipping row: {}", e);
                import.skipped.push(SkippedRow {
                    row,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(import)
}

/// Read a ledger file from disk
pub fn read_ledger_csv<P: AsRef<Path>>(path: P) -> LedgerResult<LedgerImport> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerError::Load(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let file = File::open(path)
        .map_err(|e| LedgerError::Load(format!("Failed to open {}: {}", path.display(), e)))?;

    read_transactions(file).map_err(|e| match e {
        LedgerError::Load(msg) => LedgerError::Load(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Write ledger rows, with header, to any sink
pub fn write_transactions<W: Write>(sink: W, transactions: &[Transaction]) -> LedgerResult<()> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(sink);

    writer
        .write_record(LEDGER_HEADER)
        .map_err(|e| LedgerError::Save(format!("Failed to write header: {}", e)))?;

    for txn in transactions {
        writer
            .serialize(LedgerRecord::from(txn))
            .map_err(|e| LedgerError::Save(format!("Failed to write row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| LedgerError::Save(format!("Failed to flush data: {}", e)))?;

    Ok(())
}

/// Write a ledger file atomically (write to temp, then rename)
///
/// An existing file at `path` is replaced only once the new contents are fully
/// written, so a failed save leaves it intact.
pub fn write_ledger_csv_atomic<P: AsRef<Path>>(
    path: P,
    transactions: &[Transaction],
) -> LedgerResult<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            LedgerError::Save(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = temp_path_for(path);

    let result = File::create(&temp_path)
        .map_err(|e| LedgerError::Save(format!("Failed to create temp file: {}", e)))
        .and_then(|file| {
            write_transactions(&file, transactions)?;
            file.sync_all()
                .map_err(|e| LedgerError::Save(format!("Failed to sync data: {}", e)))
        })
        .and_then(|_| {
            fs::rename(&temp_path, path)
                .map_err(|e| LedgerError::Save(format!("Failed to rename temp file: {}", e)))
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "ledger.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

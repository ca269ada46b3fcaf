//! Ledger session
//!
//! Owns the transaction table, the budget store and the monthly income for one
//! session, and implements the row operations: view, filter by date, add, edit,
//! delete, load and save.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::audit::{AuditEntry, AuditLogger};
use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::parse_date;
use crate::models::{BudgetStore, Money, Transaction, TransactionEdit};
use crate::storage::{self, SkippedRow};

/// Result of an edit: the row before and after, plus any skipped overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub index: usize,
    pub before: Transaction,
    pub after: Transaction,
    /// One message per override that failed validation and was skipped
    pub warnings: Vec<String>,
}

impl EditOutcome {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// A single ledger session
#[derive(Debug, Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    pub(super) budgets: BudgetStore,
    pub(super) monthly_income: Option<Money>,
    source: Option<PathBuf>,
    skipped: Vec<SkippedRow>,
    audit: Option<AuditLogger>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger over an existing table
    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Self::default()
        }
    }

    /// Load a ledger from a CSV file
    ///
    /// The budget store and monthly income start empty. Rows with a bad date or
    /// amount are left out and listed by [`Ledger::skipped_rows`].
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        let import = storage::read_ledger_csv(path)?;
        info!(
            path = %path.display(),
            rows = import.transactions.len(),
            skipped = import.skipped.len(),
            "Loaded ledger"
        );

        Ok(Self {
            source: Some(path.to_path_buf()),
            skipped: import.skipped,
            ..Self::from_transactions(import.transactions)
        })
    }

    /// Record every successful mutation in `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// File this ledger was loaded from or last saved to
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Rows of the source file that were left out at load
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// The full table in insertion order
    pub fn view_all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get the row at `index`
    pub fn get(&self, index: usize) -> LedgerResult<&Transaction> {
        self.transactions
            .get(index)
            .ok_or_else(|| LedgerError::index_out_of_range(index, self.len()))
    }

    /// Rows dated within `[start, end]` (inclusive), with their table indices
    ///
    /// Both bounds are `YYYY-MM-DD` dates. An empty result is not an error.
    pub fn view_by_date_range(
        &self,
        start: &str,
        end: &str,
    ) -> LedgerResult<Vec<(usize, &Transaction)>> {
        let start = parse_date(start)
            .map_err(|e| LedgerError::Validation(format!("Start date: {}", e)))?;
        let end =
            parse_date(end).map_err(|e| LedgerError::Validation(format!("End date: {}", e)))?;

        let matches: Vec<_> = self
            .transactions
            .iter()
            .enumerate()
            .filter(|(_, txn)| txn.date >= start && txn.date <= end)
            .collect();

        debug!(%start, %end, matches = matches.len(), "Filtered by date range");
        Ok(matches)
    }

    /// Validate and append a new row, returning its index
    ///
    /// On failure the table is unchanged.
    pub fn add(
        &mut self,
        date: &str,
        category: &str,
        description: &str,
        amount: &str,
    ) -> LedgerResult<usize> {
        let txn = Transaction::parse(date, category, description, amount)?;
        Ok(self.push(txn))
    }

    /// Append an already-validated row, returning its index
    pub fn push(&mut self, txn: Transaction) -> usize {
        let index = self.transactions.len();
        self.record(AuditEntry::add(index, &txn));
        info!(index, category = %txn.category, amount = %txn.amount, "Added transaction");
        self.transactions.push(txn);
        index
    }

    /// Apply the present overrides in `edit` to the row at `index`
    ///
    /// Fails without touching the table only when `index` is out of range. A date
    /// or amount override that does not parse is skipped and reported in
    /// [`EditOutcome::warnings`]; the remaining overrides are still applied.
    pub fn edit(&mut self, index: usize, edit: &TransactionEdit) -> LedgerResult<EditOutcome> {
        let len = self.len();
        let row = self
            .transactions
            .get_mut(index)
            .ok_or_else(|| LedgerError::index_out_of_range(index, len))?;

        let before = row.clone();
        let warnings = edit.apply_to(row);
        let after = row.clone();

        for warning in &warnings {
            warn!(index, "{}", warning);
        }

        if before != after {
            self.record(AuditEntry::edit(index, &before, &after));
            info!(index, "Edited transaction");
        }

        Ok(EditOutcome {
            index,
            before,
            after,
            warnings,
        })
    }

    /// Remove and return the row at `index`; later rows shift down by one
    pub fn delete(&mut self, index: usize) -> LedgerResult<Transaction> {
        if index >= self.len() {
            return Err(LedgerError::index_out_of_range(index, self.len()));
        }

        let removed = self.transactions.remove(index);
        self.record(AuditEntry::delete(index, &removed));
        info!(index, remaining = self.len(), "Deleted transaction");
        Ok(removed)
    }

    /// Write the table to `destination`, replacing any existing file
    pub fn save<P: AsRef<Path>>(&mut self, destination: P) -> LedgerResult<()> {
        let destination = destination.as_ref();
        storage::write_ledger_csv_atomic(destination, &self.transactions)?;
        info!(path = %destination.display(), rows = self.len(), "Saved ledger");
        self.source = Some(destination.to_path_buf());
        Ok(())
    }

    /// Distinct categories present in the table, sorted by name
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .transactions
            .iter()
            .map(|t| t.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    fn record(&self, entry: AuditEntry) {
        let Some(logger) = &self.audit else {
            return;
        };

        let ledger = self.source.as_ref().map(|p| p.display().to_string());
        if let Err(e) = logger.log(&entry.with_ledger(ledger)) {
            warn!("Failed to write audit entry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add("2024-01-05", "Food", "Groceries", "-20").unwrap();
        ledger.add("2024-01-20", "Food", "Market", "-30").unwrap();
        ledger.add("2024-02-01", "Rent", "", "-500").unwrap();
        ledger
    }

    #[test]
    fn test_add_appends_last_row() {
        let mut ledger = sample_ledger();
        let index = ledger.add("2024-03-01", "Travel", "Train", "-42.10").unwrap();

        assert_eq!(index, 3);
        assert_eq!(ledger.len(), 4);
        assert_eq!(
            ledger.view_all().last().unwrap(),
            &Transaction::new(date(2024, 3, 1), "Travel", "Train", Money::from_cents(-4210))
        );
    }

    #[test]
    fn test_invalid_add_leaves_table_unchanged() {
        let mut ledger = sample_ledger();
        let snapshot = ledger.view_all().to_vec();

        assert!(ledger.add("2024-13-01", "Food", "", "-1").unwrap_err().is_validation());
        assert!(ledger.add("2024-01-01", "Food", "", "ten").unwrap_err().is_validation());
        assert!(ledger
            .add("2024-01-01", "Food", "", "90000000000000000")
            .unwrap_err()
            .is_validation());
        assert_eq!(ledger.view_all(), snapshot.as_slice());
    }

    #[test]
    fn test_view_by_date_range_is_inclusive() {
        let ledger = sample_ledger();

        let rows = ledger.view_by_date_range("2024-01-05", "2024-01-20").unwrap();
        let indices: Vec<_> = rows.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1]);

        assert!(ledger
            .view_by_date_range("2025-01-01", "2025-12-31")
            .unwrap()
            .is_empty());
        assert!(ledger
            .view_by_date_range("2024-02-01", "2024-01-01")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_view_by_date_range_rejects_bad_bounds() {
        let ledger = sample_ledger();
        let err = ledger.view_by_date_range("soon", "2024-01-01").unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("Start date"));
    }

    #[test]
    fn test_edit_partial_failure() {
        let mut ledger = sample_ledger();
        let edit = TransactionEdit::new()
            .date("not-a-date")
            .category("Dining")
            .amount("-25");

        let outcome = ledger.edit(1, &edit).unwrap();

        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.changed());
        let row = ledger.get(1).unwrap();
        assert_eq!(row.date, date(2024, 1, 20));
        assert_eq!(row.category, "Dining");
        assert_eq!(row.description, "Market");
        assert_eq!(row.amount.cents(), -2500);
    }

    #[test]
    fn test_out_of_range_edit_and_delete_leave_table_unchanged() {
        let mut ledger = sample_ledger();
        let snapshot = ledger.view_all().to_vec();

        let err = ledger.edit(3, &TransactionEdit::new().category("X")).unwrap_err();
        assert!(err.is_index());
        let err = ledger.delete(99).unwrap_err();
        assert!(err.is_index());

        assert_eq!(ledger.view_all(), snapshot.as_slice());
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut ledger = sample_ledger();
        let removed = ledger.delete(1).unwrap();

        assert_eq!(removed.description, "Market");
        assert_eq!(ledger.len(), 2);
        let descriptions: Vec<_> = ledger.view_all().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Groceries", ""]);
    }

    #[test]
    fn test_categories_are_distinct_and_sorted() {
        let mut ledger = sample_ledger();
        ledger.add("2024-02-02", "Coffee", "", "-3").unwrap();
        assert_eq!(ledger.categories(), vec!["Coffee", "Food", "Rent"]);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.csv");

        let mut ledger = sample_ledger();
        ledger.save(&path).unwrap();
        assert_eq!(ledger.source(), Some(path.as_path()));

        let loaded = Ledger::load(&path).unwrap();
        assert_eq!(loaded.view_all(), ledger.view_all());
        assert!(loaded.budgets().is_empty());
        assert!(loaded.skipped_rows().is_empty());
    }

    #[test]
    fn test_load_skips_bad_dates_and_keeps_averaging() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ledger.csv");
        std::fs::write(
            &path,
            "Date,Category,Amount\n2024-01-05,Food,-20\nnot-a-date,Food,-30\n2024-02-01,Rent,-500\n",
        )
        .unwrap();

        let ledger = Ledger::load(&path).unwrap();
        assert_eq!(ledger.len(), 2);
        let skipped: Vec<_> = ledger.skipped_rows().iter().map(|s| s.row).collect();
        assert_eq!(skipped, vec![2]);

        let averages = crate::reports::average_monthly_spending(ledger.view_all());
        let averages: Vec<_> = averages
            .iter()
            .map(|(month, avg)| (month.to_string(), avg.cents()))
            .collect();
        assert_eq!(
            averages,
            vec![("2024-01".to_string(), -2000), ("2024-02".to_string(), -50000)]
        );
    }

    #[test]
    fn test_mutations_are_audited() {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));

        let mut ledger = Ledger::new().with_audit(logger.clone());
        ledger.add("2024-01-05", "Food", "", "-20").unwrap();
        ledger.edit(0, &TransactionEdit::new().amount("-21")).unwrap();
        ledger.edit(0, &TransactionEdit::new()).unwrap();
        ledger.delete(0).unwrap();
        let _ = ledger.delete(0);

        let ops: Vec<_> = logger.read_all().unwrap().iter().map(|e| e.operation).collect();
        assert_eq!(ops, vec![Operation::Add, Operation::Edit, Operation::Delete]);
    }
}

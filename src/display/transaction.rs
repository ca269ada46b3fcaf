//! Transaction display formatting
//!
//! Tables of ledger rows with their positional index, and a detail view of a
//! single row.

use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::models::Transaction;

/// Display settings applied to every transaction table
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub currency_symbol: String,
    pub date_format: String,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl TransactionRow {
    fn new(index: usize, txn: &Transaction, format: &TableFormat) -> Self {
        Self {
            index,
            date: txn.date.format(&format.date_format).to_string(),
            category: txn.category.clone(),
            description: txn.description.clone(),
            amount: txn.amount.format_with_symbol(&format.currency_symbol),
        }
    }
}

/// Format `(index, transaction)` pairs as a table
///
/// The index column shows each row's position in the full ledger, which is what
/// edit and delete take.
pub fn format_transaction_table<'a, I>(rows: I, format: &TableFormat) -> String
where
    I: IntoIterator<Item = (usize, &'a Transaction)>,
{
    let rows: Vec<TransactionRow> = rows
        .into_iter()
        .map(|(index, txn)| TransactionRow::new(index, txn, format))
        .collect();

    if rows.is_empty() {
        return "No transactions found.".to_string();
    }

    Table::new(rows)
        .with(Style::psql())
        .with(Modify::new(Columns::single(4)).with(Alignment::right()))
        .to_string()
}

/// Format every row of a ledger as a table
pub fn format_ledger(transactions: &[Transaction], format: &TableFormat) -> String {
    format_transaction_table(transactions.iter().enumerate(), format)
}

/// Format one row for display
pub fn format_transaction_details(index: usize, txn: &Transaction, format: &TableFormat) -> String {
    let mut output = String::new();

    output.push_str(&format!("Index:       {}\n", index));
    output.push_str(&format!("Date:        {}\n", txn.date.format(&format.date_format)));
    output.push_str(&format!("Category:    {}\n", txn.category));
    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.format_with_symbol(&format.currency_symbol)
    ));

    output
}

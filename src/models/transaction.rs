//! Transaction model
//!
//! A single ledger row plus the optional-field update used to edit one in place.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::money::Money;
use crate::error::{LedgerError, LedgerResult};

/// Date layouts accepted on input. Ledger files always write the first one.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Timestamp layouts accepted on input; the time of day is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse a calendar date from user or file input
///
/// Accepts ISO `YYYY-MM-DD` as well as `YYYY/MM/DD` and full timestamps such as
/// `2024-01-05 00:00:00`.
pub fn parse_date(input: &str) -> LedgerResult<NaiveDate> {
    let input = input.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
                .map(|dt| dt.date())
        })
        .ok_or_else(|| {
            LedgerError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", input))
        })
}

/// Parse a signed amount from user or file input
pub fn parse_amount(input: &str) -> LedgerResult<Money> {
    Money::parse(input).map_err(|e| LedgerError::Validation(e.to_string()))
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction date
    pub date: NaiveDate,

    /// Free-text label used for grouping and budgeting
    pub category: String,

    /// Free-text description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Amount (positive for inflow, negative for outflow)
    pub amount: Money,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            description: description.into(),
            amount,
        }
    }

    /// Build a transaction from raw text fields, validating date and amount
    pub fn parse(date: &str, category: &str, description: &str, amount: &str) -> LedgerResult<Self> {
        let date = parse_date(date)?;
        let amount = parse_amount(amount)?;
        Ok(Self::new(date, category.trim(), description.trim(), amount))
    }
}

/// Optional per-column overrides applied by an edit
///
/// `date` and `amount` stay as raw text so each one can be validated on its own
/// when the edit is applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionEdit {
    pub date: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
}

impl TransactionEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// True when no override carries a non-blank value
    pub fn is_empty(&self) -> bool {
        [&self.date, &self.category, &self.description, &self.amount]
            .iter()
            .all(|field| non_blank(field).is_none())
    }

    /// Apply the overrides to `txn`, skipping any date or amount that fails to parse
    ///
    /// Blank overrides count as absent. Returns a warning per skipped field.
    pub fn apply_to(&self, txn: &mut Transaction) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(date) = non_blank(&self.date) {
            match parse_date(date) {
                Ok(date) => txn.date = date,
                Err(e) => warnings.push(format!("{}. Keeping the current date.", e)),
            }
        }

        if let Some(category) = non_blank(&self.category) {
            txn.category = category.to_string();
        }

        if let Some(description) = non_blank(&self.description) {
            txn.description = description.to_string();
        }

        if let Some(amount) = non_blank(&self.amount) {
            match parse_amount(amount) {
                Ok(amount) => txn.amount = amount,
                Err(e) => warnings.push(format!("{}. Keeping the current amount.", e)),
            }
        }

        warnings
    }
}

fn non_blank(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

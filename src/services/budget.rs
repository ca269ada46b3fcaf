//! Budget and income operations on a ledger session
//!
//! Budgets live only for the session; they are never written to the ledger file.

use tracing::info;

use super::ledger::Ledger;
use crate::error::{LedgerError, LedgerResult};
use crate::models::budget::parse_non_negative;
use crate::models::{BudgetStore, Money};

impl Ledger {
    pub fn budgets(&self) -> &BudgetStore {
        &self.budgets
    }

    /// Set the limit for one category from user input
    ///
    /// The limit must be a non-negative amount; on failure the store is unchanged.
    pub fn set_budget(&mut self, category: &str, limit: &str) -> LedgerResult<Money> {
        let limit = parse_non_negative(limit, "budget limit")?;
        self.budgets.set(category, limit)?;
        info!(category, %limit, "Set budget");
        Ok(limit)
    }

    /// Walk every category present in the table, asking `limit_for` for its limit
    ///
    /// `limit_for` returns `None` to leave a category's current entry alone.
    /// Limits that fail validation are collected as `(category, error)` pairs and
    /// skipped; the other categories are still set.
    pub fn set_budgets<F>(&mut self, mut limit_for: F) -> Vec<(String, LedgerError)>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut failures = Vec::new();

        for category in self.categories() {
            let Some(input) = limit_for(&category) else {
                continue;
            };
            if let Err(e) = self.set_budget(&category, &input) {
                failures.push((category, e));
            }
        }

        failures
    }

    pub fn monthly_income(&self) -> Option<Money> {
        self.monthly_income
    }

    /// Record the user's monthly income; it must be non-negative
    pub fn set_monthly_income(&mut self, income: &str) -> LedgerResult<Money> {
        let income = parse_non_negative(income, "monthly income")?;
        self.monthly_income = Some(income);
        info!(%income, "Set monthly income");
        Ok(income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add("2024-01-05", "Food", "", "-20").unwrap();
        ledger.add("2024-02-01", "Rent", "", "-500").unwrap();
        ledger.add("2024-02-03", "Food", "", "-30").unwrap();
        ledger
    }

    #[test]
    fn test_set_budget() {
        let mut ledger = sample_ledger();
        assert_eq!(ledger.set_budget("Food", "100").unwrap().cents(), 10000);
        assert_eq!(ledger.budgets().get("Food"), Some(Money::from_cents(10000)));

        assert!(ledger.set_budget("Food", "-1").unwrap_err().is_validation());
        assert_eq!(ledger.budgets().get("Food"), Some(Money::from_cents(10000)));
    }

    #[test]
    fn test_set_budgets_visits_each_category_once() {
        let mut ledger = sample_ledger();
        let mut asked = Vec::new();

        let failures = ledger.set_budgets(|category| {
            asked.push(category.to_string());
            Some(match category {
                "Food" => "150".to_string(),
                _ => "oops".to_string(),
            })
        });

        assert_eq!(asked, vec!["Food", "Rent"]);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "Rent");
        assert_eq!(ledger.budgets().len(), 1);
    }

    #[test]
    fn test_set_budgets_skip_keeps_existing() {
        let mut ledger = sample_ledger();
        ledger.set_budget("Rent", "600").unwrap();

        let failures = ledger.set_budgets(|category| (category == "Food").then(|| "80".to_string()));

        assert!(failures.is_empty());
        assert_eq!(ledger.budgets().get("Rent"), Some(Money::from_cents(60000)));
        assert_eq!(ledger.budgets().get("Food"), Some(Money::from_cents(8000)));
    }

    #[test]
    fn test_monthly_income() {
        let mut ledger = sample_ledger();
        assert_eq!(ledger.monthly_income(), None);

        ledger.set_monthly_income("3,000").unwrap();
        assert_eq!(ledger.monthly_income(), Some(Money::from_cents(300000)));

        assert!(ledger.set_monthly_income("-10").unwrap_err().is_validation());
        assert_eq!(ledger.monthly_income(), Some(Money::from_cents(300000)));
    }
}

//! Interactive numbered menu
//!
//! Reads choices and field values line by line from any `BufRead` and writes
//! prompts and results to any `Write`, so the whole session can be driven from
//! a script or a test as well as a terminal.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::audit::AuditLogger;
use crate::config::settings::Settings;
use crate::display::{
    format_budget_chart, format_ledger, format_transaction_details, format_transaction_table,
    format_trend_chart, TableFormat,
};
use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionEdit;
use crate::reports::{budget_status, top_spending_category, MonthlyReport, SpendingReport};
use crate::services::Ledger;

const MENU_OPTIONS: [&str; 15] = [
    "Import a CSV File",
    "View All Transactions",
    "View Transactions by Date Range",
    "Add a Transaction",
    "Edit a Transaction",
    "Delete a Transaction",
    "Analyze Spending by Category",
    "Calculate Average Monthly Spending",
    "Show Top Spending Category",
    "Set Monthly Income",
    "Set Category Budget",
    "Check Budget Status",
    "Visualize Monthly Spending Trend",
    "Save Transactions to CSV",
    "Exit",
];

const NO_LEDGER: &str = "Please import a CSV file first.";

/// One entry of the numbered menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Import,
    ViewAll,
    ViewByDateRange,
    Add,
    Edit,
    Delete,
    CategorySpending,
    AverageMonthly,
    TopCategory,
    SetIncome,
    SetBudgets,
    BudgetStatus,
    Trend,
    Save,
    Exit,
}

impl MenuChoice {
    /// Parse the number the user typed
    pub fn parse(input: &str) -> Option<Self> {
        let choice = match input.trim().parse::<u8>().ok()? {
            0 => Self::Import,
            1 => Self::ViewAll,
            2 => Self::ViewByDateRange,
            3 => Self::Add,
            4 => Self::Edit,
            5 => Self::Delete,
            6 => Self::CategorySpending,
            7 => Self::AverageMonthly,
            8 => Self::TopCategory,
            9 => Self::SetIncome,
            10 => Self::SetBudgets,
            11 => Self::BudgetStatus,
            12 => Self::Trend,
            13 => Self::Save,
            14 => Self::Exit,
            _ => return None,
        };
        Some(choice)
    }

    /// Whether the choice works on a loaded ledger
    pub fn needs_ledger(&self) -> bool {
        !matches!(self, Self::Import | Self::Exit)
    }
}

/// Prompt on `output` and read one trimmed line from `input`
///
/// Returns `None` at end of input.
fn ask<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> LedgerResult<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_index(input: &str) -> LedgerResult<usize> {
    input
        .trim()
        .parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid index: '{}'", input.trim())))
}

/// An interactive session over a single optional ledger
pub struct Menu<R, W> {
    input: R,
    output: W,
    ledger: Option<Ledger>,
    settings: Settings,
    audit: Option<AuditLogger>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, settings: Settings) -> Self {
        Self {
            input,
            output,
            ledger: None,
            settings,
            audit: None,
        }
    }

    /// Attach an audit logger to every ledger this session loads
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    /// Start with `path` already imported
    pub fn open(&mut self, path: PathBuf) -> LedgerResult<()> {
        let mut ledger = Ledger::load(&path)?;
        if let Some(logger) = &self.audit {
            ledger = ledger.with_audit(logger.clone());
        }
        for skipped in ledger.skipped_rows() {
            writeln!(self.output, "{}", skipped)?;
        }
        self.ledger = Some(ledger);
        writeln!(self.output, "File imported successfully!")?;
        Ok(())
    }

    pub fn ledger(&self) -> Option<&Ledger> {
        self.ledger.as_ref()
    }

    /// Run until the user exits or input ends
    pub fn run(&mut self) -> LedgerResult<()> {
        writeln!(self.output, "=== Personal Finance Tracker ===")?;

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("Choose an option (0-14): ")? else {
                debug!("Input closed, leaving menu");
                break;
            };

            let Some(choice) = MenuChoice::parse(&line) else {
                writeln!(self.output, "Invalid choice. Please choose a valid option.")?;
                continue;
            };

            if choice == MenuChoice::Exit {
                writeln!(self.output, "Exiting program. Goodbye!")?;
                break;
            }

            if choice.needs_ledger() && self.ledger.is_none() {
                writeln!(self.output, "{}", NO_LEDGER)?;
                continue;
            }

            debug!(?choice, "Menu choice");
            if let Err(e) = self.dispatch(choice) {
                // I/O failures on the session's own streams end the session
                if let LedgerError::Io(_) = e {
                    return Err(e);
                }
                warn!(?choice, error = %e, "Menu operation failed");
                writeln!(self.output, "Error: {}", e)?;
            }
        }

        Ok(())
    }

    fn print_menu(&mut self) -> LedgerResult<()> {
        writeln!(self.output)?;
        for (number, label) in MENU_OPTIONS.iter().enumerate() {
            writeln!(self.output, "{}. {}", number, label)?;
        }
        Ok(())
    }

    fn prompt(&mut self, prompt: &str) -> LedgerResult<Option<String>> {
        ask(&mut self.input, &mut self.output, prompt)
    }

    /// Prompt for a value, treating end of input as a blank answer
    fn prompt_value(&mut self, prompt: &str) -> LedgerResult<String> {
        Ok(self.prompt(prompt)?.unwrap_or_default())
    }

    fn table_format(&self) -> TableFormat {
        TableFormat {
            currency_symbol: self.settings.currency_symbol.clone(),
            date_format: self.settings.date_format.clone(),
        }
    }

    fn loaded(&self) -> LedgerResult<&Ledger> {
        self.ledger
            .as_ref()
            .ok_or_else(|| LedgerError::Validation(NO_LEDGER.to_string()))
    }

    fn loaded_mut(&mut self) -> LedgerResult<&mut Ledger> {
        self.ledger
            .as_mut()
            .ok_or_else(|| LedgerError::Validation(NO_LEDGER.to_string()))
    }

    fn dispatch(&mut self, choice: MenuChoice) -> LedgerResult<()> {
        match choice {
            MenuChoice::Import => self.import(),
            MenuChoice::ViewAll => self.view_all(),
            MenuChoice::ViewByDateRange => self.view_by_date_range(),
            MenuChoice::Add => self.add(),
            MenuChoice::Edit => self.edit(),
            MenuChoice::Delete => self.delete(),
            MenuChoice::CategorySpending => self.category_spending(),
            MenuChoice::AverageMonthly => self.average_monthly(),
            MenuChoice::TopCategory => self.top_category(),
            MenuChoice::SetIncome => self.set_income(),
            MenuChoice::SetBudgets => self.set_budgets(),
            MenuChoice::BudgetStatus => self.budget_status(),
            MenuChoice::Trend => self.trend(),
            MenuChoice::Save => self.save(),
            MenuChoice::Exit => Ok(()),
        }
    }

    fn import(&mut self) -> LedgerResult<()> {
        let path = self.prompt_value("Enter the path to the CSV file: ")?;
        if path.is_empty() {
            writeln!(self.output, "No file given.")?;
            return Ok(());
        }

        // A failed import leaves the current ledger in place
        match self.open(PathBuf::from(&path)) {
            Ok(()) => Ok(()),
            Err(e @ LedgerError::Io(_)) => Err(e),
            Err(e) => {
                writeln!(self.output, "An error occurred while importing CSV: {}", e)?;
                Ok(())
            }
        }
    }

    fn view_all(&mut self) -> LedgerResult<()> {
        let table = format_ledger(self.loaded()?.view_all(), &self.table_format());
        writeln!(self.output, "--- All Transactions ---")?;
        writeln!(self.output, "{}", table)?;
        Ok(())
    }

    fn view_by_date_range(&mut self) -> LedgerResult<()> {
        let start = self.prompt_value("Enter start date (YYYY-MM-DD): ")?;
        let end = self.prompt_value("Enter end date (YYYY-MM-DD): ")?;

        let format = self.table_format();
        let matches = self.loaded()?.view_by_date_range(&start, &end)?;
        let table = if matches.is_empty() {
            None
        } else {
            Some(format_transaction_table(matches, &format))
        };

        match table {
            Some(table) => {
                writeln!(self.output, "--- Transactions from {} to {} ---", start, end)?;
                writeln!(self.output, "{}", table)?;
            }
            None => writeln!(self.output, "No transactions found in this date range.")?,
        }
        Ok(())
    }

    fn add(&mut self) -> LedgerResult<()> {
        let date = self.prompt_value("Enter the date (YYYY-MM-DD): ")?;
        let category = self.prompt_value("Enter the category (e.g., Food, Rent): ")?;
        let description = self.prompt_value("Enter a description: ")?;
        let amount = self.prompt_value("Enter the amount: ")?;

        let index = self
            .loaded_mut()?
            .add(&date, &category, &description, &amount)?;
        writeln!(self.output, "Transaction added successfully at index {}!", index)?;
        Ok(())
    }

    fn edit(&mut self) -> LedgerResult<()> {
        let index = parse_index(&self.prompt_value("Enter the index of the transaction to edit: ")?)?;

        let format = self.table_format();
        let current = format_transaction_details(index, self.loaded()?.get(index)?, &format);
        writeln!(self.output, "Current Transaction Details:")?;
        write!(self.output, "{}", current)?;

        let mut edit = TransactionEdit::new();
        if let Some(date) = non_empty(
            self.prompt_value("Enter new date (YYYY-MM-DD) or press Enter to keep current: ")?,
        ) {
            edit = edit.date(date);
        }
        if let Some(category) =
            non_empty(self.prompt_value("Enter new category or press Enter to keep current: ")?)
        {
            edit = edit.category(category);
        }
        if let Some(description) =
            non_empty(self.prompt_value("Enter new description or press Enter to keep current: ")?)
        {
            edit = edit.description(description);
        }
        if let Some(amount) =
            non_empty(self.prompt_value("Enter new amount or press Enter to keep current: ")?)
        {
            edit = edit.amount(amount);
        }

        let outcome = self.loaded_mut()?.edit(index, &edit)?;
        for warning in &outcome.warnings {
            writeln!(self.output, "{}", warning)?;
        }

        if outcome.changed() {
            writeln!(self.output, "\nTransaction updated successfully!")?;
        } else {
            writeln!(self.output, "\nNo changes made.")?;
        }
        write!(
            self.output,
            "{}",
            format_transaction_details(index, &outcome.after, &format)
        )?;
        Ok(())
    }

    fn delete(&mut self) -> LedgerResult<()> {
        let index =
            parse_index(&self.prompt_value("Enter the index of the transaction to delete: ")?)?;

        let removed = self.loaded_mut()?.delete(index)?;
        writeln!(
            self.output,
            "Transaction deleted successfully! ({} {} {})",
            removed.date, removed.category, removed.amount
        )?;
        Ok(())
    }

    fn category_spending(&mut self) -> LedgerResult<()> {
        let report = SpendingReport::generate(self.loaded()?.view_all());
        write!(self.output, "{}", report.format_terminal())?;
        Ok(())
    }

    fn average_monthly(&mut self) -> LedgerResult<()> {
        let report = MonthlyReport::generate(self.loaded()?.view_all());
        write!(self.output, "{}", report.format_terminal())?;
        Ok(())
    }

    fn top_category(&mut self) -> LedgerResult<()> {
        let top = top_spending_category(self.loaded()?.view_all());

        writeln!(self.output, "--- Top Spending Category ---")?;
        match top {
            Some((category, total)) => writeln!(
                self.output,
                "{} with a total spending of {}.",
                category, total
            )?,
            None => writeln!(self.output, "No transactions found.")?,
        }
        Ok(())
    }

    fn set_income(&mut self) -> LedgerResult<()> {
        let input = self.prompt_value("Enter your monthly income: ")?;
        let income = self.loaded_mut()?.set_monthly_income(&input)?;
        writeln!(self.output, "Monthly income set to {}.", income)?;
        Ok(())
    }

    fn set_budgets(&mut self) -> LedgerResult<()> {
        let Self {
            input,
            output,
            ledger,
            ..
        } = self;
        let ledger = ledger
            .as_mut()
            .ok_or_else(|| LedgerError::Validation(NO_LEDGER.to_string()))?;

        if ledger.is_empty() {
            writeln!(output, "No categories found. Add a transaction first.")?;
            return Ok(());
        }

        let mut io_error = None;
        let failures = ledger.set_budgets(|category| {
            if io_error.is_some() {
                return None;
            }
            let prompt = format!("Enter budget for {} (press Enter to skip): ", category);
            match ask(&mut *input, &mut *output, &prompt) {
                Ok(answer) => answer.and_then(non_empty),
                Err(e) => {
                    io_error = Some(e);
                    None
                }
            }
        });

        if let Some(e) = io_error {
            return Err(e);
        }

        for (category, error) in &failures {
            writeln!(output, "Skipped {}: {}", category, error)?;
        }
        writeln!(output, "{} budget(s) set.", ledger.budgets().len())?;
        Ok(())
    }

    fn budget_status(&mut self) -> LedgerResult<()> {
        let ledger = self.loaded()?;
        let report = budget_status(
            ledger.view_all(),
            ledger.budgets(),
            self.settings.warning_threshold,
        )
        .with_income(ledger.monthly_income());

        let text = report.format_terminal();
        let chart = if report.rows.is_empty() {
            None
        } else {
            Some(format_budget_chart(&report.comparison(), self.settings.chart_width))
        };

        write!(self.output, "{}", text)?;
        if let Some(chart) = chart {
            writeln!(self.output)?;
            write!(self.output, "{}", chart)?;
        }
        Ok(())
    }

    fn trend(&mut self) -> LedgerResult<()> {
        let report = MonthlyReport::generate(self.loaded()?.view_all());
        let chart = format_trend_chart(&report.trend_points(), self.settings.chart_width);
        write!(self.output, "{}", chart)?;
        Ok(())
    }

    fn save(&mut self) -> LedgerResult<()> {
        let current = self
            .loaded()?
            .source()
            .map(|p| p.display().to_string());

        let prompt = match &current {
            Some(path) => format!("Enter file name to save (press Enter for {}): ", path),
            None => "Enter file name to save (e.g., 'transactions.csv'): ".to_string(),
        };
        let answer = self.prompt_value(&prompt)?;

        let Some(destination) = non_empty(answer).or(current) else {
            writeln!(self.output, "No file name given.")?;
            return Ok(());
        };

        self.loaded_mut()?.save(&destination)?;
        writeln!(self.output, "Transactions saved to {} successfully!", destination)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    const SCENARIO: &str = "Date,Category,Description,Amount\n\
                            2024-01-05,Food,Groceries,-20\n\
                            2024-01-20,Food,Dinner,-30\n\
                            2024-02-01,Rent,February,-500\n";

    fn ledger_file(dir: &TempDir) -> PathBuf {
        let path = dir.path().join("ledger.csv");
        std::fs::write(&path, SCENARIO).unwrap();
        path
    }

    /// Run a session over `script` and return everything it printed
    fn run_script(script: &str, open: Option<PathBuf>) -> (String, Option<usize>) {
        let mut output = Vec::new();
        let len = {
            let mut menu = Menu::new(Cursor::new(script.to_string()), &mut output, Settings::default());
            if let Some(path) = open {
                menu.open(path).unwrap();
            }
            menu.run().unwrap();
            menu.ledger().map(|l| l.len())
        };
        (String::from_utf8(output).unwrap(), len)
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(MenuChoice::parse("0"), Some(MenuChoice::Import));
        assert_eq!(MenuChoice::parse(" 14 "), Some(MenuChoice::Exit));
        assert_eq!(MenuChoice::parse("15"), None);
        assert_eq!(MenuChoice::parse("-1"), None);
        assert_eq!(MenuChoice::parse("abc"), None);
        assert!(!MenuChoice::Import.needs_ledger());
        assert!(MenuChoice::Save.needs_ledger());
    }

    #[test]
    fn test_requires_import_first() {
        let (out, len) = run_script("1\n6\n14\n", None);

        assert_eq!(out.matches(NO_LEDGER).count(), 2);
        assert!(out.contains("Exiting program. Goodbye!"));
        assert_eq!(len, None);
    }

    #[test]
    fn test_invalid_choice() {
        let (out, _) = run_script("42\n14\n", None);
        assert!(out.contains("Invalid choice. Please choose a valid option."));
    }

    #[test]
    fn test_end_of_input_exits() {
        let (out, _) = run_script("", None);
        assert!(out.contains("=== Personal Finance Tracker ==="));
    }

    #[test]
    fn test_import_then_reports() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);
        let script = format!("0\n{}\n6\n7\n8\n14\n", path.display());

        let (out, len) = run_script(&script, None);

        assert!(out.contains("File imported successfully!"));
        assert!(out.contains("Total Spending by Category"));
        assert!(out.contains("-$50.00"));
        assert!(out.contains("Average Monthly Spending"));
        assert!(out.contains("-$25.00"));
        assert!(out.contains("Rent with a total spending of -$500.00."));
        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_import_lists_skipped_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.csv");
        std::fs::write(
            &path,
            "Date,Category,Amount\n2024-01-05,Food,-20\nnot-a-date,Food,-30\n2024-02-01,Rent,-500\n",
        )
        .unwrap();
        let script = format!("0\n{}\n7\n14\n", path.display());

        let (out, len) = run_script(&script, None);

        assert!(out.contains("Skipped row 2: "));
        assert!(out.contains("File imported successfully!"));
        assert!(out.contains("-$20.00"));
        assert!(out.contains("-$500.00"));
        assert_eq!(len, Some(2));
    }

    #[test]
    fn test_failed_import_keeps_ledger() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);
        let script = "0\nmissing.csv\n14\n";

        let (out, len) = run_script(script, Some(path));

        assert!(out.contains("An error occurred while importing CSV"));
        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_add_edit_delete() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);
        let script = "3\n2024-03-01\nFun\nMovies\n-12.50\n\
                      4\n3\nnot-a-date\nLeisure\n\n\n\
                      5\n0\n\
                      1\n14\n";

        let (out, len) = run_script(script, Some(path));

        assert!(out.contains("Transaction added successfully at index 3!"));
        assert!(out.contains("Keeping the current date."));
        assert!(out.contains("Transaction updated successfully!"));
        assert!(out.contains("Category:    Leisure"));
        assert!(out.contains("Transaction deleted successfully!"));
        assert!(!out.contains("Groceries"));
        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_bad_index_reports_error() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);

        let (out, len) = run_script("5\n9\n4\nabc\n14\n", Some(path));

        assert!(out.contains("Invalid index 9"));
        assert!(out.contains("Invalid index: 'abc'"));
        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_invalid_add_leaves_table() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);

        let (out, len) = run_script("3\n2024-13-45\nFood\n\n-1\n14\n", Some(path));

        assert!(out.contains("Error:"));
        assert_eq!(len, Some(3));
    }

    #[test]
    fn test_date_range() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);

        let (out, _) = run_script(
            "2\n2024-01-01\n2024-01-31\n2\n2030-01-01\n2030-12-31\n14\n",
            Some(path),
        );

        assert!(out.contains("--- Transactions from 2024-01-01 to 2024-01-31 ---"));
        assert!(out.contains("Dinner"));
        assert!(out.contains("No transactions found in this date range."));
    }

    #[test]
    fn test_budgets_and_status() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);
        let script = "9\n3000\n10\n50\n400\n11\n14\n";

        let (out, _) = run_script(script, Some(path));

        assert!(out.contains("Monthly income set to $3000.00."));
        assert!(out.contains("Enter budget for Food"));
        assert!(out.contains("Enter budget for Rent"));
        assert!(out.contains("2 budget(s) set."));
        assert!(out.contains("Monthly Income: $3000.00"));
        assert!(out.contains("Warning"));
        assert!(out.contains("Exceeded"));
        assert!(out.contains("Over budget: Rent"));
        assert!(out.contains("Budget vs Actual"));
    }

    #[test]
    fn test_trend_chart() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);

        let (out, _) = run_script("12\n14\n", Some(path));

        assert!(out.contains("Monthly Spending Trend"));
        assert!(out.contains("2024-02"));
    }

    #[test]
    fn test_save_to_new_file() {
        let dir = TempDir::new().unwrap();
        let path = ledger_file(&dir);
        let copy = dir.path().join("copy.csv");
        let script = format!("5\n2\n13\n{}\n14\n", copy.display());

        let (out, _) = run_script(&script, Some(path.clone()));

        assert!(out.contains("successfully!"));
        let saved = std::fs::read_to_string(&copy).unwrap();
        assert_eq!(
            saved,
            "Date,Category,Description,Amount\n\
             2024-01-05,Food,Groceries,-20.00\n\
             2024-01-20,Food,Dinner,-30.00\n"
        );
        // Source file is untouched
        assert_eq!(std::fs::read_to_string(&path).unwrap(), SCENARIO);
    }
}

//! CLI commands for reports
//!
//! One-shot reports over a ledger file, printed to the terminal or exported to
//! CSV.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_budget_chart, format_trend_chart};
use crate::error::{LedgerError, LedgerResult};
use crate::models::transaction::parse_date;
use crate::models::Transaction;
use crate::reports::{budget_status, top_spending_category, MonthlyReport, SpendingReport};
use crate::services::Ledger;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Total spending by category
    #[command(alias = "spending")]
    Category {
        /// Ledger CSV file
        file: PathBuf,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Average spending per month
    #[command(alias = "average")]
    Monthly {
        /// Ledger CSV file
        file: PathBuf,

        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// The category with the largest spending
    Top {
        /// Ledger CSV file
        file: PathBuf,
    },

    /// Chart of monthly totals
    Trend {
        /// Ledger CSV file
        file: PathBuf,
    },

    /// Budget status for the given limits
    Budget {
        /// Ledger CSV file
        file: PathBuf,

        /// Category limit, repeatable (e.g. --limit Food=300)
        #[arg(short, long = "limit", value_name = "CATEGORY=AMOUNT")]
        limits: Vec<String>,

        /// Monthly income shown in the report header
        #[arg(short, long)]
        income: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(settings: &Settings, cmd: ReportCommands) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Category {
            file,
            start,
            end,
            output,
        } => handle_category_report(&file, start, end, output),
        ReportCommands::Monthly {
            file,
            start,
            end,
            output,
        } => handle_monthly_report(&file, start, end, output),
        ReportCommands::Top { file } => handle_top_report(&file),
        ReportCommands::Trend { file } => handle_trend_report(settings, &file),
        ReportCommands::Budget {
            file,
            limits,
            income,
            output,
        } => handle_budget_report(settings, &file, &limits, income, output),
    }
}

/// Load the ledger at `file`, reporting any rows left out on stderr
fn load_ledger(file: &Path) -> LedgerResult<Ledger> {
    let ledger = Ledger::load(file)?;
    for skipped in ledger.skipped_rows() {
        eprintln!("{}", skipped);
    }
    Ok(ledger)
}

/// Rows of the ledger at `file`, optionally limited to a date range
///
/// A missing bound leaves that side of the range open.
fn load_rows(file: &Path, start: Option<String>, end: Option<String>) -> LedgerResult<Vec<Transaction>> {
    let ledger = load_ledger(file)?;
    if start.is_none() && end.is_none() {
        return Ok(ledger.view_all().to_vec());
    }

    let start = match start {
        Some(s) => parse_date(&s)
            .map_err(|e| LedgerError::Validation(format!("Start date: {}", e)))?,
        None => NaiveDate::MIN,
    };
    let end = match end {
        Some(e) => {
            parse_date(&e).map_err(|err| LedgerError::Validation(format!("End date: {}", err)))?
        }
        None => NaiveDate::MAX,
    };

    Ok(ledger
        .view_all()
        .iter()
        .filter(|t| t.date >= start && t.date <= end)
        .cloned()
        .collect())
}

fn create_export_file(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

fn handle_category_report(
    file: &Path,
    start: Option<String>,
    end: Option<String>,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let rows = load_rows(file, start, end)?;
    let report = SpendingReport::generate(&rows);

    if let Some(path) = output {
        report.export_csv(create_export_file(&path)?)?;
        println!("Spending report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

fn handle_monthly_report(
    file: &Path,
    start: Option<String>,
    end: Option<String>,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let rows = load_rows(file, start, end)?;
    let report = MonthlyReport::generate(&rows);

    if let Some(path) = output {
        report.export_csv(create_export_file(&path)?)?;
        println!("Monthly report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

fn handle_top_report(file: &Path) -> LedgerResult<()> {
    let ledger = load_ledger(file)?;

    match top_spending_category(ledger.view_all()) {
        Some((category, total)) => {
            println!("{} with a total spending of {}.", category, total);
        }
        None => println!("No transactions found."),
    }

    Ok(())
}

fn handle_trend_report(settings: &Settings, file: &Path) -> LedgerResult<()> {
    let ledger = load_ledger(file)?;
    let report = MonthlyReport::generate(ledger.view_all());

    print!("{}", format_trend_chart(&report.trend_points(), settings.chart_width));
    Ok(())
}

/// Split `Food=300` into its category and amount
fn parse_limit(spec: &str) -> LedgerResult<(&str, &str)> {
    match spec.split_once('=') {
        Some((category, amount)) if !category.trim().is_empty() => {
            Ok((category.trim(), amount.trim()))
        }
        _ => Err(LedgerError::Validation(format!(
            "Invalid budget limit '{}'. Use CATEGORY=AMOUNT",
            spec
        ))),
    }
}

fn handle_budget_report(
    settings: &Settings,
    file: &Path,
    limits: &[String],
    income: Option<String>,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let mut ledger = load_ledger(file)?;
    for spec in limits {
        let (category, amount) = parse_limit(spec)?;
        ledger.set_budget(category, amount)?;
    }
    if let Some(income) = income {
        ledger.set_monthly_income(&income)?;
    }

    let report = budget_status(ledger.view_all(), ledger.budgets(), settings.warning_threshold)
        .with_income(ledger.monthly_income());

    if let Some(path) = output {
        report.export_csv(create_export_file(&path)?)?;
        println!("Budget report exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal());
        if !report.rows.is_empty() {
            println!();
            print!(
                "{}",
                format_budget_chart(&report.comparison(), settings.chart_width)
            );
        }
    }

    Ok(())
}

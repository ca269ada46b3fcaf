use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use ledger_cli::audit::AuditLogger;
use ledger_cli::cli::{handle_report_command, Menu, ReportCommands};
use ledger_cli::config::{paths::LedgerPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "ledger",
    author = "Kaylee Beyene",
    version,
    about = "Terminal personal finance ledger",
    long_about = "ledger imports transactions from a CSV file, lets you view, add, \
                  edit and delete them, and reports spending by category, by month \
                  and against per-category budgets."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive menu
    Menu {
        /// Ledger CSV file to import on start
        file: Option<PathBuf>,
    },

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Show recent ledger changes from the audit log
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show current configuration and paths
    Config {
        /// Write the current settings to the settings file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(match cli.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    });

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "Resolved paths");

    match cli.command {
        None => run_menu(&paths, settings, None)?,
        Some(Commands::Menu { file }) => run_menu(&paths, settings, file)?,
        Some(Commands::Report(cmd)) => handle_report_command(&settings, cmd)?,
        Some(Commands::History { limit }) => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            if entries.is_empty() {
                println!("No changes recorded.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Config { init }) => {
            if init {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
                println!();
            }
            println!("ledger Configuration");
            println!("====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Date format:       {}", settings.date_format);
            println!("  Warning threshold: {}", settings.warning_threshold);
            println!("  Audit enabled:     {}", settings.audit_enabled);
            println!("  Chart width:       {}", settings.chart_width);
        }
    }

    Ok(())
}

fn run_menu(paths: &LedgerPaths, settings: Settings, file: Option<PathBuf>) -> Result<()> {
    let audit_enabled = settings.audit_enabled;
    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), settings);
    if audit_enabled {
        menu = menu.with_audit(AuditLogger::new(paths.audit_log()));
    }

    if let Some(file) = file {
        if let Err(e) = menu.open(file) {
            eprintln!("An error occurred while importing CSV: {}", e);
        }
    }

    menu.run()?;
    Ok(())
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("ledger_cli={},ledger={}", level, level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

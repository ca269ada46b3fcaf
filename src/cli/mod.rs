//! CLI command handlers
//!
//! The interactive menu and the one-shot report commands, bridging user input
//! with the service and report layers.

pub mod menu;
pub mod report;

pub use menu::{Menu, MenuChoice};
pub use report::{handle_report_command, ReportCommands};

//! Terminal front end for the expense ledger.
//!
//! Runs as an interactive line editor, or reads commands from stdin when
//! `EXPENSE_CORE_CLI_SCRIPT` is set.

mod commands;
pub mod core;
pub mod output;
pub mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;

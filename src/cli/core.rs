use std::io;

use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    classifier::ModelStore,
    config::{Config, ConfigManager},
    errors::{ClassifierError, LedgerError},
    ledger::ExpenseLedger,
    receipts::ReceiptStore,
};

use super::output;

/// Top-level failures that stop the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Failures of a single command; reported and then the shell carries on.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// A shell command: its name, usage line, and one-line summary.
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

pub const COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "user",
        usage: "user [name | -]",
        summary: "Show, set, or clear (`-`) the active user",
    },
    CommandSpec {
        name: "add",
        usage: "add <description> <amount> [--date YYYY-MM-DD] [--currency CODE] [--category NAME] [--custom LABEL] [--receipt PATH]",
        summary: "Log a new expense; the category is suggested when omitted",
    },
    CommandSpec {
        name: "list",
        usage: "list [YYYY-MM]",
        summary: "Show expenses for the active user, optionally for one month",
    },
    CommandSpec {
        name: "months",
        usage: "months",
        summary: "List the months that have expenses",
    },
    CommandSpec {
        name: "summary",
        usage: "summary [YYYY-MM]",
        summary: "Entry counts and totals per category for a month",
    },
    CommandSpec {
        name: "trend",
        usage: "trend",
        summary: "Monthly totals per category",
    },
    CommandSpec {
        name: "receipts",
        usage: "receipts",
        summary: "List stored receipt files",
    },
    CommandSpec {
        name: "export",
        usage: "export <path>",
        summary: "Write the filtered expenses to a CSV file",
    },
    CommandSpec {
        name: "clear",
        usage: "clear",
        summary: "Delete every stored expense",
    },
    CommandSpec {
        name: "train",
        usage: "train",
        summary: "Train the category classifier on the built-in examples",
    },
    CommandSpec {
        name: "suggest",
        usage: "suggest <description>",
        summary: "Suggest a category for a description",
    },
    CommandSpec {
        name: "help",
        usage: "help [command]",
        summary: "Show available commands",
    },
    CommandSpec {
        name: "exit",
        usage: "exit",
        summary: "Leave the shell",
    },
];

/// State shared by every command in one shell session.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    pub(crate) config: Config,
    pub(crate) ledger: ExpenseLedger,
    pub(crate) receipts: ReceiptStore,
    pub(crate) models: ModelStore,
    pub(crate) user: Option<String>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_manager(mode, ConfigManager::new()?)
    }

    pub fn with_manager(mode: CliMode, manager: ConfigManager) -> Result<Self, CliError> {
        let config = manager.load()?;
        let ledger = ExpenseLedger::open(Box::new(manager.ledger_storage(&config)))?;
        tracing::debug!(base = %manager.base_dir().display(), "shell context ready");
        Ok(Self {
            mode,
            running: true,
            receipts: manager.receipt_store(&config),
            models: manager.model_store(&config),
            user: config.default_user.clone(),
            config,
            ledger,
        })
    }

    pub fn prompt(&self) -> String {
        match &self.user {
            Some(user) => format!("expense[{user}]> "),
            None => "expense> ".to_string(),
        }
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|spec| spec.name).collect()
    }

    /// The active user, or an empty string meaning "everyone".
    pub(crate) fn user_filter(&self) -> &str {
        self.user.as_deref().unwrap_or("")
    }

    pub(crate) fn dispatch(&mut self, command: &str, raw: &str, args: &[&str]) -> Result<LoopControl, CommandError> {
        let result = match command {
            "user" => self.cmd_user(args),
            "add" => self.cmd_add(args),
            "list" | "ls" => self.cmd_list(args),
            "months" => self.cmd_months(args),
            "summary" => self.cmd_summary(args),
            "trend" => self.cmd_trend(args),
            "receipts" => self.cmd_receipts(args),
            "export" => self.cmd_export(args),
            "clear" => self.cmd_clear(args),
            "train" => self.cmd_train(args),
            "suggest" => self.cmd_suggest(args),
            "help" => self.cmd_help(args),
            "exit" | "quit" => Err(CommandError::ExitRequested),
            _ => {
                self.suggest_command(raw);
                Ok(())
            }
        };
        match result {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let lowered = input.to_lowercase();
        let best = COMMANDS
            .iter()
            .map(|spec| (levenshtein(spec.name, &lowered), spec.name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Classifier(ClassifierError::ModelUnavailable(message)) => {
                output::error(format!("Model not trained or not found: {message}"));
                output::hint("Run `train` first.");
            }
            other => output::error(other),
        }
    }
}

//! Handlers for the expense shell commands.

use std::{collections::BTreeMap, fs::File, io::BufWriter, path::Path};

use chrono::{Local, NaiveDate};
use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::{
    classifier::default_examples,
    currency::Currency,
    errors::ClassifierError,
    ledger::{
        category_counts, category_totals, filter_by_user, list_receipts, monthly_trend, months,
        records_in_month, Category, ExpenseRecord, KnownCategory,
    },
    storage::export_csv,
};

use super::core::{CliMode, CommandError, CommandResult, ShellContext, COMMANDS};
use super::output;

const VALUE_FLAGS: [&str; 5] = ["--date", "--currency", "--category", "--custom", "--receipt"];

/// Positional arguments and `--flag value` pairs of a command line.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    pub flags: BTreeMap<&'a str, &'a str>,
}

pub(crate) fn parse_args<'a>(args: &[&'a str]) -> Result<ParsedArgs<'a>, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        if arg.starts_with("--") {
            if !VALUE_FLAGS.contains(&arg) {
                return Err(CommandError::InvalidArguments(format!("unknown option `{arg}`")));
            }
            let value = iter
                .next()
                .ok_or_else(|| CommandError::InvalidArguments(format!("`{arg}` needs a value")))?;
            parsed.flags.insert(arg, value);
        } else {
            parsed.positional.push(arg);
        }
    }
    Ok(parsed)
}

fn invalid(message: impl Into<String>) -> CommandError {
    CommandError::InvalidArguments(message.into())
}

impl ShellContext {
    pub(crate) fn cmd_user(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [] => match &self.user {
                Some(user) => output::info(format!("Active user: {user}")),
                None => output::info("No active user; showing everyone's expenses."),
            },
            ["-"] => {
                self.user = None;
                output::success("Active user cleared.");
            }
            [name] if !name.trim().is_empty() => {
                self.user = Some(name.trim().to_string());
                output::success(format!("Welcome, {}!", name.trim()));
            }
            _ => return Err(invalid("usage: user [name | -]")),
        }
        Ok(())
    }

    pub(crate) fn cmd_add(&mut self, args: &[&str]) -> CommandResult {
        let parsed = parse_args(args)?;
        let (description, amount) = match parsed.positional.as_slice() {
            [description, amount] => (*description, *amount),
            _ => return Err(invalid("usage: add <description> <amount> [options]")),
        };
        let amount: f64 = amount
            .parse()
            .map_err(|_| invalid(format!("`{amount}` is not a number")))?;
        let date = match parsed.flags.get("--date") {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| invalid(format!("`{raw}` is not a YYYY-MM-DD date")))?,
            None => Local::now().date_naive(),
        };
        let currency = match parsed.flags.get("--currency") {
            Some(raw) => raw
                .parse::<Currency>()
                .map_err(|err| invalid(err.to_string()))?,
            None => self.config.default_currency,
        };
        let category = self.pick_category(
            description,
            parsed.flags.get("--category").copied(),
            parsed.flags.get("--custom").copied(),
        )?;

        let user = self.user_filter().to_string();
        let mut record = ExpenseRecord::new(&user, date, description, amount, currency, category);
        record.validate().map_err(crate::errors::LedgerError::from)?;

        // A receipt copied in for this expense only, removed again if the insert fails.
        let mut fresh_receipt = None;
        if let Some(source) = parsed.flags.get("--receipt") {
            let source = Path::new(source);
            let name = source.file_name().and_then(|name| name.to_str()).unwrap_or("");
            let existed = self.receipts.target(&user, name)?.exists();
            let stored = self.receipts.import(&user, source)?;
            record = record.with_receipt(stored.display().to_string());
            if !existed {
                fresh_receipt = Some(stored);
            }
        }

        let summary = format!(
            "{} {} [{}]",
            record.description,
            record.currency.format_amount(record.amount),
            record.category
        );
        if let Err(err) = self.ledger.insert(record) {
            if let Some(stored) = fresh_receipt {
                if let Err(cleanup) = self.receipts.discard(&stored) {
                    tracing::warn!(
                        path = %stored.display(),
                        error = %cleanup,
                        "could not remove orphaned receipt"
                    );
                }
            }
            return Err(err.into());
        }
        output::success(format!("Expense added: {summary}"));
        Ok(())
    }

    /// Uses the category given on the command line, or asks the classifier.
    ///
    /// A missing or broken model never blocks the insert; it falls back to `Others`.
    fn pick_category(
        &self,
        description: &str,
        selected: Option<&str>,
        custom: Option<&str>,
    ) -> Result<Category, CommandError> {
        let selected = match selected {
            Some(raw) => Some(
                raw.parse::<KnownCategory>()
                    .map_err(|err| invalid(format!("{err}; use --custom for your own label")))?,
            ),
            None if custom.is_some() => Some(KnownCategory::Others),
            None => None,
        };
        if let Some(selected) = selected {
            return Ok(Category::resolve(selected, custom));
        }

        match self.models.predict(description) {
            Ok(suggested) => {
                output::info(format!("Suggested category: {suggested}"));
                Ok(suggested.into())
            }
            Err(err) => {
                tracing::warn!(error = %err, "no category suggestion");
                output::warning("No category suggestion available; filing under Others.");
                Ok(KnownCategory::Others.into())
            }
        }
    }

    fn visible_records(&self) -> Vec<ExpenseRecord> {
        filter_by_user(self.ledger.records(), self.user_filter())
    }

    pub(crate) fn cmd_list(&mut self, args: &[&str]) -> CommandResult {
        let records = match args {
            [] => self.visible_records(),
            [month] => records_in_month(&self.visible_records(), month),
            _ => return Err(invalid("usage: list [YYYY-MM]")),
        };
        if records.is_empty() {
            output::info("No expenses recorded.");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                vec![
                    record.date.to_string(),
                    record.user.clone(),
                    record.description.clone(),
                    record.currency.format_amount(record.amount),
                    record.category.to_string(),
                    record.receipt_path.clone().unwrap_or_default(),
                ]
            })
            .collect();
        output::print_table(
            &["Date", "User", "Description", "Amount", "Category", "Receipt"],
            &rows,
        );
        Ok(())
    }

    pub(crate) fn cmd_months(&mut self, _args: &[&str]) -> CommandResult {
        let found = months(&self.visible_records());
        if found.is_empty() {
            output::info("No expenses recorded.");
        } else {
            for month in found {
                println!("{month}");
            }
        }
        Ok(())
    }

    pub(crate) fn cmd_summary(&mut self, args: &[&str]) -> CommandResult {
        let records = self.visible_records();
        let month = match args {
            [] => match months(&records).into_iter().next() {
                Some(month) => month,
                None => {
                    output::info("No expenses recorded.");
                    return Ok(());
                }
            },
            [month] => month.to_string(),
            _ => return Err(invalid("usage: summary [YYYY-MM]")),
        };

        let counts = category_counts(&records, &month);
        if counts.is_empty() {
            output::info(format!("No expenses in {month}."));
            return Ok(());
        }
        let totals = category_totals(&records, &month);
        let grand_total: f64 = totals.values().sum();

        output::section(format!("Expense Breakdown for {month}"));
        let rows: Vec<Vec<String>> = counts
            .iter()
            .map(|(category, count)| {
                let total = totals.get(category).copied().unwrap_or_default();
                let share = if grand_total > 0.0 {
                    total / grand_total * 100.0
                } else {
                    0.0
                };
                vec![
                    category.to_string(),
                    count.to_string(),
                    format!("{total:.2}"),
                    format!("{share:.1}%"),
                ]
            })
            .collect();
        output::print_table(&["Category", "Entries", "Total", "Share"], &rows);
        Ok(())
    }

    pub(crate) fn cmd_trend(&mut self, _args: &[&str]) -> CommandResult {
        let trend = monthly_trend(&self.visible_records());
        if trend.is_empty() {
            output::info("No expenses recorded.");
            return Ok(());
        }
        output::section("Monthly Expense Trend");
        for (category, points) in trend {
            let line = points
                .iter()
                .map(|(month, total)| format!("{month} {total:.2}"))
                .collect::<Vec<_>>()
                .join(", ");
            println!("{category}: {line}");
        }
        Ok(())
    }

    pub(crate) fn cmd_receipts(&mut self, _args: &[&str]) -> CommandResult {
        let receipts = list_receipts(&self.visible_records());
        if receipts.is_empty() {
            output::info("No receipts uploaded.");
        } else {
            for path in receipts {
                println!("{path}");
            }
        }
        Ok(())
    }

    pub(crate) fn cmd_export(&mut self, args: &[&str]) -> CommandResult {
        let [path] = args else {
            return Err(invalid("usage: export <path>"));
        };
        let records = self.visible_records();
        let file = File::create(path)?;
        export_csv(&records, BufWriter::new(file))?;
        output::success(format!("Exported {} expenses to {path}", records.len()));
        Ok(())
    }

    pub(crate) fn cmd_clear(&mut self, _args: &[&str]) -> CommandResult {
        if self.mode == CliMode::Interactive {
            let confirmed = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt("Delete all expenses permanently?")
                .default(false)
                .interact()?;
            if !confirmed {
                output::info("Nothing deleted.");
                return Ok(());
            }
        }
        self.ledger.clear()?;
        output::success("All expenses deleted permanently!");
        Ok(())
    }

    pub(crate) fn cmd_train(&mut self, _args: &[&str]) -> CommandResult {
        let examples = default_examples();
        let pipeline = self.models.train(&examples)?;
        output::success(format!(
            "Classifier trained on {} examples across {} categories.",
            examples.len(),
            pipeline.classes().len()
        ));
        Ok(())
    }

    pub(crate) fn cmd_suggest(&mut self, args: &[&str]) -> CommandResult {
        if args.is_empty() {
            return Err(invalid("usage: suggest <description>"));
        }
        let description = args.join(" ");
        let ranked = self.models.rank(&description)?;
        let (best, probability) = ranked
            .first()
            .copied()
            .ok_or_else(|| ClassifierError::ModelUnavailable("model has no categories".into()))?;
        output::success(format!(
            "Suggested category: {best} ({:.0}% confidence)",
            probability * 100.0
        ));
        Ok(())
    }

    pub(crate) fn cmd_help(&mut self, args: &[&str]) -> CommandResult {
        match args {
            [] => {
                output::section("Commands");
                let rows: Vec<Vec<String>> = COMMANDS
                    .iter()
                    .map(|spec| vec![spec.name.to_string(), spec.summary.to_string()])
                    .collect();
                output::print_table(&["Command", "Description"], &rows);
            }
            [name] => {
                let spec = COMMANDS
                    .iter()
                    .find(|spec| spec.name.eq_ignore_ascii_case(name))
                    .ok_or_else(|| invalid(format!("no command named `{name}`")))?;
                println!("{}", spec.usage);
                println!("  {}", spec.summary);
            }
            _ => return Err(invalid("usage: help [command]")),
        }
        Ok(())
    }
}

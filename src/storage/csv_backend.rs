use std::{
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Writer};

use crate::{
    currency::Currency,
    errors::LedgerError,
    ledger::{Category, ExpenseRecord},
    utils::persistence::{remove_if_exists, write_atomic},
};

use super::{LedgerStorage, Result};

/// Column names of the ledger file, in order.
pub const LEDGER_HEADER: [&str; 7] = [
    "User",
    "Date",
    "Description",
    "Amount",
    "Currency",
    "Category",
    "Receipt",
];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Flat-file CSV persistence for the expense ledger.
#[derive(Debug, Clone)]
pub struct CsvLedgerStorage {
    path: PathBuf,
}

impl CsvLedgerStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LedgerStorage for CsvLedgerStorage {
    fn load(&self) -> Result<Vec<ExpenseRecord>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no ledger file yet");
            return Ok(Vec::new());
        }
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if headers.is_empty() {
            return Ok(Vec::new());
        }
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let line = row.position().map(|pos| pos.line()).unwrap_or_default();
            records.push(columns.parse_row(&row, line)?);
        }
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "ledger loaded"
        );
        Ok(records)
    }

    fn save(&self, records: &[ExpenseRecord]) -> Result<()> {
        let mut buffer = Vec::new();
        export_csv(records, &mut buffer)?;
        write_atomic(&self.path, &buffer)?;
        tracing::debug!(
            path = %self.path.display(),
            count = records.len(),
            "ledger written"
        );
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let removed = remove_if_exists(&self.path)?;
        tracing::debug!(path = %self.path.display(), removed, "ledger file cleared");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Writes `records` in the ledger file format, header included.
pub fn export_csv<W: Write>(records: &[ExpenseRecord], writer: W) -> Result<()> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(LEDGER_HEADER)?;
    for record in records {
        let date = record.date.format(DATE_FORMAT).to_string();
        let amount = record.amount.to_string();
        csv.write_record([
            record.user.as_str(),
            date.as_str(),
            record.description.as_str(),
            amount.as_str(),
            record.currency.code(),
            record.category.label(),
            record.receipt_path.as_deref().unwrap_or(""),
        ])?;
    }
    csv.flush()?;
    Ok(())
}

/// Positions of the ledger columns in a file header.
struct ColumnIndex {
    positions: [usize; 7],
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let mut positions = [0usize; 7];
        for (slot, name) in positions.iter_mut().zip(LEDGER_HEADER) {
            *slot = headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| LedgerError::InvalidRecord {
                    line: 1,
                    message: format!("missing `{name}` column"),
                })?;
        }
        Ok(Self { positions })
    }

    /// Raw cell contents; text columns keep their whitespace.
    fn field<'r>(&self, row: &'r StringRecord, column: usize) -> &'r str {
        row.get(self.positions[column]).unwrap_or("")
    }

    fn value<'r>(&self, row: &'r StringRecord, column: usize) -> &'r str {
        self.field(row, column).trim()
    }

    fn parse_row(&self, row: &StringRecord, line: u64) -> Result<ExpenseRecord> {
        let invalid = |message: String| LedgerError::InvalidRecord { line, message };

        let date = parse_date(self.value(row, 1))
            .ok_or_else(|| invalid(format!("bad date `{}`", self.value(row, 1))))?;
        let amount: f64 = self
            .value(row, 3)
            .parse()
            .map_err(|_| invalid(format!("bad amount `{}`", self.value(row, 3))))?;
        let currency: Currency = self
            .value(row, 4)
            .parse()
            .map_err(|err| invalid(format!("{err}")))?;

        let record = ExpenseRecord::new(
            self.field(row, 0),
            date,
            self.field(row, 2),
            amount,
            currency,
            Category::from_label(self.field(row, 5)),
        )
        .with_receipt(self.field(row, 6));
        Ok(record)
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
                .ok()
                .map(|stamp| stamp.date())
        })
}

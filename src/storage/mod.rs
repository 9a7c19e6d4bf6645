pub mod csv_backend;

use crate::{errors::LedgerError, ledger::ExpenseRecord};

pub use csv_backend::{export_csv, CsvLedgerStorage, LEDGER_HEADER};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over the persisted form of the expense ledger.
///
/// Every save replaces the whole stored sequence.
pub trait LedgerStorage: Send + Sync {
    /// Reads all stored records; a store that does not exist yet yields an empty list.
    fn load(&self) -> Result<Vec<ExpenseRecord>>;
    fn save(&self, records: &[ExpenseRecord]) -> Result<()>;
    /// Removes the stored ledger. Succeeds when nothing is stored.
    fn clear(&self) -> Result<()>;
    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

use crate::errors::LedgerError;
use crate::storage::LedgerStorage;

use super::record::ExpenseRecord;

/// The expense ledger: records held in memory and mirrored to a storage backend.
///
/// Callers sharing one ledger between threads must serialise access themselves;
/// every mutation is a read-modify-write of the whole store.
pub struct ExpenseLedger {
    records: Vec<ExpenseRecord>,
    storage: Box<dyn LedgerStorage>,
}

impl ExpenseLedger {
    /// Opens the ledger, reading whatever the backend currently holds.
    pub fn open(storage: Box<dyn LedgerStorage>) -> Result<Self, LedgerError> {
        let records = storage.load()?;
        tracing::debug!(
            location = %storage.describe(),
            count = records.len(),
            "ledger opened"
        );
        Ok(Self { records, storage })
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Re-reads the backend, replacing the in-memory records.
    pub fn load(&mut self) -> Result<&[ExpenseRecord], LedgerError> {
        self.records = self.storage.load()?;
        Ok(&self.records)
    }

    /// Validates `record`, appends it, and rewrites the store.
    ///
    /// A rejected record leaves both memory and disk untouched. If the rewrite
    /// fails the record is dropped again so memory keeps matching the store.
    pub fn insert(&mut self, record: ExpenseRecord) -> Result<(), LedgerError> {
        if let Err(err) = record.validate() {
            tracing::warn!(fields = ?err.fields(), "expense rejected");
            return Err(err.into());
        }

        self.records.push(record);
        if let Err(err) = self.storage.save(&self.records) {
            self.records.pop();
            return Err(err);
        }

        if let Some(added) = self.records.last() {
            tracing::info!(
                user = %added.user,
                category = %added.category,
                amount = added.amount,
                currency = %added.currency,
                "expense added"
            );
        }
        Ok(())
    }

    /// Deletes the stored ledger and forgets every record.
    pub fn clear(&mut self) -> Result<(), LedgerError> {
        self.storage.clear()?;
        let dropped = self.records.len();
        self.records.clear();
        tracing::info!(dropped, location = %self.storage.describe(), "ledger cleared");
        Ok(())
    }
}

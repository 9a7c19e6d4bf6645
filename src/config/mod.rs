use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    classifier::ModelStore,
    currency::Currency,
    errors::LedgerError,
    receipts::ReceiptStore,
    storage::CsvLedgerStorage,
    utils::{
        paths::{app_data_dir, config_file_in},
        persistence::{ensure_dir, write_atomic},
    },
};

/// Where the ledger, receipts, and model live, plus input defaults.
///
/// Relative paths are resolved against the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_ledger_file")]
    pub ledger_file: PathBuf,
    #[serde(default = "Config::default_receipts_dir")]
    pub receipts_dir: PathBuf,
    #[serde(default = "Config::default_model_file")]
    pub model_file: PathBuf,
    #[serde(default)]
    pub default_currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_user: Option<String>,
}

impl Config {
    fn default_ledger_file() -> PathBuf {
        PathBuf::from("expenses.csv")
    }

    fn default_receipts_dir() -> PathBuf {
        PathBuf::from("receipts")
    }

    fn default_model_file() -> PathBuf {
        PathBuf::from("expense_classifier.json")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: Self::default_ledger_file(),
            receipts_dir: Self::default_receipts_dir(),
            model_file: Self::default_model_file(),
            default_currency: Currency::default(),
            default_user: None,
        }
    }
}

/// Loads and saves [`Config`] inside a data directory.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `EXPENSE_CORE_HOME`, falling back to `~/.expense_core`.
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the config file, or returns defaults when there is none.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, json.as_bytes())?;
        Ok(())
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    pub fn ledger_storage(&self, config: &Config) -> CsvLedgerStorage {
        CsvLedgerStorage::new(self.resolve(&config.ledger_file))
    }

    pub fn receipt_store(&self, config: &Config) -> ReceiptStore {
        ReceiptStore::new(self.resolve(&config.receipts_dir))
    }

    pub fn model_store(&self, config: &Config) -> ModelStore {
        ModelStore::new(self.resolve(&config.model_file))
    }
}

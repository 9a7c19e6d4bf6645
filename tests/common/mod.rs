#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::NaiveDate;
use expense_core::{
    currency::Currency,
    ledger::{Category, ExpenseRecord},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated data directory for one test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn expense(
    user: &str,
    date: &str,
    description: &str,
    amount: f64,
    category: impl Into<Category>,
) -> ExpenseRecord {
    ExpenseRecord::new(
        user,
        NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date"),
        description,
        amount,
        Currency::Usd,
        category,
    )
}

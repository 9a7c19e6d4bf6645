#![doc(test(attr(deny(warnings))))]

//! Expense Core keeps a personal expense ledger in a flat CSV file, derives
//! monthly and per-category summaries from it, and suggests a spending
//! category for new expenses with a small text classifier.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod receipts;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense Core tracing initialized.");
    });
}

//! Expense records, the persisted ledger, and the summaries derived from it.

pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod record;
pub mod views;

pub use category::{Category, KnownCategory, UnknownCategory};
pub use ledger::ExpenseLedger;
pub use record::ExpenseRecord;
pub use views::{
    aggregate_by_month_category, category_counts, category_totals, derive_month,
    filter_by_user, list_receipts, monthly_trend, months, records_in_month, MonthCategory,
};

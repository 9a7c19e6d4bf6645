use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::currency::Currency;
use crate::errors::ValidationError;

use super::category::Category;

/// One logged expense.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub user: String,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub currency: Currency,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_path: Option<String>,
}

impl ExpenseRecord {
    pub fn new(
        user: impl Into<String>,
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        currency: Currency,
        category: impl Into<Category>,
    ) -> Self {
        Self {
            user: user.into(),
            date,
            description: description.into(),
            amount,
            currency,
            category: category.into(),
            receipt_path: None,
        }
    }

    pub fn with_receipt(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.receipt_path = if path.trim().is_empty() {
            None
        } else {
            Some(path)
        };
        self
    }

    /// Year and month of the expense, formatted as `YYYY-MM`.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    /// Checks the fields every stored record must carry.
    ///
    /// All problems are collected so the caller can report them together.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::default();
        if self.user.trim().is_empty() {
            err.push("user", "is required");
        }
        if self.description.trim().is_empty() {
            err.push("description", "is required");
        }
        if !self.amount.is_finite() || self.amount <= 0.0 {
            err.push("amount", "must be a positive number");
        }
        if self.category.is_blank() {
            err.push("category", "is required");
        }
        if err.is_empty() {
            Ok(())
        } else {
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::KnownCategory;

    fn sample() -> ExpenseRecord {
        ExpenseRecord::new(
            "alice",
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            "Lunch",
            12.0,
            Currency::Usd,
            KnownCategory::Food,
        )
    }

    #[test]
    fn month_is_year_and_month() {
        assert_eq!(sample().month(), "2024-03");
    }

    #[test]
    fn valid_record_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validation_reports_each_missing_field() {
        let mut record = sample();
        record.user = " ".into();
        record.description.clear();
        record.amount = 0.0;
        let err = record.validate().expect_err("record should be rejected");
        assert_eq!(err.fields(), vec!["user", "description", "amount"]);
    }

    #[test]
    fn rejects_non_finite_and_negative_amounts() {
        let mut record = sample();
        record.amount = f64::NAN;
        assert!(record.validate().unwrap_err().has_field("amount"));
        record.amount = -3.0;
        assert!(record.validate().unwrap_err().has_field("amount"));
    }

    #[test]
    fn blank_receipt_is_treated_as_absent() {
        let record = sample().with_receipt("  ");
        assert_eq!(record.receipt_path, None);
        let record = sample().with_receipt("receipts/alice/r.png");
        assert_eq!(record.receipt_path.as_deref(), Some("receipts/alice/r.png"));
    }
}

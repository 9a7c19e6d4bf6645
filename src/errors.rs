use std::fmt;

use thiserror::Error;

/// Error type that captures ledger, storage, and receipt failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Invalid record on line {line}: {message}")]
    InvalidRecord { line: u64, message: String },
    #[error("Unsupported receipt file: {0}")]
    UnsupportedReceipt(String),
}

/// Failures raised while training or loading the category classifier.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Model not trained or not found: {0}")]
    ModelUnavailable(String),
    #[error("Training set is empty")]
    EmptyTrainingSet,
    #[error("Training needs at least two distinct categories, found {0}")]
    InsufficientClasses(usize),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: &'static str,
    pub problem: &'static str,
}

/// Every field problem found on a rejected record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn push(&mut self, field: &'static str, problem: &'static str) {
        self.issues.push(FieldIssue { field, problem });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed: ")?;
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {}", issue.field, issue.problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_lists_every_field() {
        let mut err = ValidationError::default();
        err.push("user", "is required");
        err.push("amount", "must be positive");
        assert_eq!(
            err.to_string(),
            "Validation failed: user is required, amount must be positive"
        );
        assert_eq!(err.fields(), vec!["user", "amount"]);
    }
}

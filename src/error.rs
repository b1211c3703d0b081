// ❗ Engine Errors - Validation, reference, and computation failures
// Every error is fatal to the current derivation pass; there are no retries

use thiserror::Error;

/// Errors surfaced by record construction and the derivation engines
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    /// A malformed record was rejected at construction time.
    /// These never enter a stored snapshot.
    #[error("invalid {record} record: {field}: {message}")]
    Validation {
        record: &'static str,
        field: &'static str,
        message: String,
    },

    /// An expense references a category missing from the snapshot
    #[error("expense {expense_id} references unknown category {category_id}")]
    CategoryNotFound {
        expense_id: String,
        category_id: String,
    },

    /// An expense payer or category split references a person missing
    /// from the snapshot
    #[error("{context} references unknown person {person_id}")]
    PersonNotFound { context: String, person_id: String },

    /// Arithmetic on a non-finite value during derivation
    #[error("computation failed: {0}")]
    Computation(String),

    /// A snapshot source failed to load or decode
    #[error("snapshot source error: {0}")]
    Source(String),
}

impl EngineError {
    pub fn validation(record: &'static str, field: &'static str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            record,
            field,
            message: message.into(),
        }
    }

    pub fn source(message: impl Into<String>) -> Self {
        EngineError::Source(message.into())
    }

    /// Whether this is a data-integrity (dangling reference) error
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            EngineError::CategoryNotFound { .. } | EngineError::PersonNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::CategoryNotFound {
            expense_id: "e-1".to_string(),
            category_id: "c-404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expense e-1 references unknown category c-404"
        );
        assert!(err.is_reference());
    }

    #[test]
    fn test_validation_helper() {
        let err = EngineError::validation("Person", "email", "required field is empty");
        assert_eq!(
            err.to_string(),
            "invalid Person record: email: required field is empty"
        );
        assert!(!err.is_reference());
    }
}

// 🧾 Expense Record - A single payment made by one person
// Amounts are normalized to the nearest cent at construction time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::money::to_nearest_cent;

/// A logged expense: who paid, how much, and which category's split
/// decides everyone's share of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Generated at construction (uuid v4)
    pub id: String,

    /// When the expense happened, as epoch milliseconds
    pub date: i64,

    /// Free-text vendor ("Delta Airlines", "Bondi Cafe", ...)
    pub vendor: String,

    /// Dollar amount, always at 2 decimal-place precision
    pub amount: f64,

    /// Category whose split applies to this expense
    pub category_id: String,

    /// The payer
    pub person_id: String,
}

impl Expense {
    /// Validate and construct an expense. The amount is rounded half-up
    /// to the nearest cent (19.995 becomes 20.00).
    pub fn new(
        date: i64,
        vendor: impl Into<String>,
        amount: f64,
        category_id: impl Into<String>,
        person_id: impl Into<String>,
    ) -> Result<Self> {
        let vendor = vendor.into();
        let category_id = category_id.into();
        let person_id = person_id.into();

        if !amount.is_finite() {
            return Err(EngineError::validation(
                "Expense",
                "amount",
                format!("not a finite number: {amount}"),
            ));
        }
        if amount < 0.0 {
            return Err(EngineError::validation(
                "Expense",
                "amount",
                format!("must not be negative, got {amount}"),
            ));
        }
        if category_id.is_empty() {
            return Err(EngineError::validation(
                "Expense",
                "category_id",
                "required field is empty",
            ));
        }
        if person_id.is_empty() {
            return Err(EngineError::validation(
                "Expense",
                "person_id",
                "required field is empty",
            ));
        }

        Ok(Expense {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            vendor,
            amount: to_nearest_cent(amount),
            category_id,
            person_id,
        })
    }

    /// The expense date as a UTC timestamp (None for out-of-range millis)
    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.date)
    }
}

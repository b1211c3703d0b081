// 🏷️ Category Record - Expense category with a per-person percentage split
//
// The split declares how any expense tagged with this category is shared:
// each entry assigns a person a percent in [0, 100]. Entries are NOT
// required to sum to 100 - when they don't, expected totals diverge from
// actual totals and the Spending Calculator reports exactly that.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

// ============================================================================
// SPLIT ENTRY
// ============================================================================

/// One person's declared share of a category's expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitEntry {
    pub person_id: String,

    /// Share of any expense in this category, as a percentage (0-100)
    pub percent: f64,
}

impl SplitEntry {
    pub fn new(person_id: impl Into<String>, percent: f64) -> Result<Self> {
        let person_id = person_id.into();

        if person_id.is_empty() {
            return Err(EngineError::validation(
                "SplitEntry",
                "person_id",
                "required field is empty",
            ));
        }
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(EngineError::validation(
                "SplitEntry",
                "percent",
                format!("must be between 0 and 100, got {percent}"),
            ));
        }

        Ok(SplitEntry { person_id, percent })
    }
}

// ============================================================================
// CATEGORY RECORD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,

    /// Group this category belongs to
    pub group_id: String,

    pub name: String,

    /// Icon hint for a presentation layer (e.g. "plane", "cutlery")
    pub icon: String,

    /// Ordered per-person percentage split
    pub split: Vec<SplitEntry>,
}

impl Category {
    pub fn new(
        id: impl Into<String>,
        group_id: impl Into<String>,
        name: impl Into<String>,
        icon: impl Into<String>,
        split: Vec<SplitEntry>,
    ) -> Result<Self> {
        let id = id.into();
        let group_id = group_id.into();
        let name = name.into();

        if id.is_empty() {
            return Err(EngineError::validation("Category", "id", "required field is empty"));
        }
        if name.is_empty() {
            return Err(EngineError::validation("Category", "name", "required field is empty"));
        }

        Ok(Category {
            id,
            group_id,
            name,
            icon: icon.into(),
            split,
        })
    }

    /// This person's declared share of the category, as a percentage.
    /// Returns 0 when the split has no entry for them.
    pub fn share_for(&self, person_id: &str) -> f64 {
        self.split
            .iter()
            .filter(|entry| entry.person_id == person_id)
            .map(|entry| entry.percent)
            .sum()
    }

    /// Sum of all declared percentages (100.0 for a well-formed split)
    pub fn split_total(&self) -> f64 {
        self.split.iter().map(|entry| entry.percent).sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================

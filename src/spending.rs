// 📊 Spending Calculator - Expected vs. actual spend per person
// Pure derivation: (expenses, categories, people) in, SpendingSet out
//
// Expected spend is each person's percentage share of every expense,
// taken from the expense's category split. Actual spend is the sum of
// what they personally paid. Both are recomputed in full on every call;
// nothing is memoized or updated incrementally.

use std::collections::HashMap;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::entities::{Category, Expense, Person};
use crate::error::{EngineError, Result};
use crate::money::to_nearest_cent;

// ============================================================================
// SPENDING RECORD (derived)
// ============================================================================

/// Derived per-person spending totals. Never user-editable; replaced
/// wholesale on every recomputation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spending {
    /// Synthetic identity, minted per derivation pass (uuid v4)
    pub id: String,

    pub person_id: String,

    /// This person's share of all expenses per the category splits
    pub expected: f64,

    /// What this person actually paid
    pub actual: f64,
}

impl Spending {
    /// Actual minus expected, rounded to the nearest cent.
    /// Positive means overpaid (owed money), negative means underpaid.
    pub fn balance(&self) -> f64 {
        to_nearest_cent(self.actual - self.expected)
    }
}

// Equality by payload: the id is regenerated on every pass, so two
// derivations of the same snapshot must still compare equal
impl PartialEq for Spending {
    fn eq(&self, other: &Self) -> bool {
        self.person_id == other.person_id
            && self.expected == other.expected
            && self.actual == other.actual
    }
}

// ============================================================================
// SPENDING SET
// ============================================================================

/// One Spending record per person, in the order the people snapshot
/// listed them. That order is what keeps debt resolution deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendingSet {
    entries: Vec<Spending>,
}

impl SpendingSet {
    pub fn get(&self, person_id: &str) -> Option<&Spending> {
        self.entries.iter().find(|s| s.person_id == person_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Spending> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_expected(&self) -> f64 {
        self.entries.iter().map(|s| s.expected).sum()
    }

    pub fn total_actual(&self) -> f64 {
        self.entries.iter().map(|s| s.actual).sum()
    }
}

// ============================================================================
// SPENDING CALCULATOR
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct SpendingCalculator;

impl SpendingCalculator {
    pub fn new() -> Self {
        SpendingCalculator
    }

    /// Derive every person's expected and actual spend.
    ///
    /// Fails with `CategoryNotFound` when an expense references a category
    /// missing from the snapshot, and with `PersonNotFound` when an expense
    /// payer or a referenced category's split names an unknown person.
    /// A dangling reference must surface as an error here - it never
    /// degrades into NaN or a silent zero.
    pub fn compute(
        &self,
        expenses: &[Expense],
        categories: &[Category],
        people: &[Person],
    ) -> Result<SpendingSet> {
        debug!(target: "spending", "compute() over {} expenses, {} people", expenses.len(), people.len());

        let category_index: HashMap<&str, &Category> =
            categories.iter().map(|c| (c.id.as_str(), c)).collect();
        let person_index: HashMap<&str, usize> = people
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.as_str(), i))
            .collect();

        let mut expected = vec![0.0_f64; people.len()];
        let mut actual = vec![0.0_f64; people.len()];

        for expense in expenses {
            if !expense.amount.is_finite() {
                return Err(EngineError::Computation(format!(
                    "expense {} has non-finite amount {}",
                    expense.id, expense.amount
                )));
            }

            let category = category_index.get(expense.category_id.as_str()).ok_or_else(|| {
                EngineError::CategoryNotFound {
                    expense_id: expense.id.clone(),
                    category_id: expense.category_id.clone(),
                }
            })?;

            let payer = *person_index.get(expense.person_id.as_str()).ok_or_else(|| {
                EngineError::PersonNotFound {
                    context: format!("expense {}", expense.id),
                    person_id: expense.person_id.clone(),
                }
            })?;
            actual[payer] += expense.amount;

            // Grab the split data and multiply the amount accordingly
            for entry in &category.split {
                let member = *person_index.get(entry.person_id.as_str()).ok_or_else(|| {
                    EngineError::PersonNotFound {
                        context: format!("category {} split", category.id),
                        person_id: entry.person_id.clone(),
                    }
                })?;

                if !entry.percent.is_finite() {
                    return Err(EngineError::Computation(format!(
                        "category {} split has non-finite percent for person {}",
                        category.id, entry.person_id
                    )));
                }

                let share = expense.amount * entry.percent / 100.0;
                expected[member] += share;
                trace!(target: "spending", "expense {} => {} expects {:.4}", expense.id, entry.person_id, share);
            }
        }

        let entries = people
            .iter()
            .enumerate()
            .map(|(i, person)| {
                debug!(
                    target: "spending",
                    "person {} => expected {:.2}, actual {:.2}",
                    person.id, expected[i], actual[i]
                );
                Spending {
                    id: uuid::Uuid::new_v4().to_string(),
                    person_id: person.id.clone(),
                    expected: expected[i],
                    actual: actual[i],
                }
            })
            .collect();

        Ok(SpendingSet { entries })
    }
}

// ============================================================================
// TESTS
// ============================================================================

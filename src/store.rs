// 🗂️ Aggregate Store - Orchestrates snapshots and recomputation order
//
// Holds the current raw snapshots (groups, people, categories, expenses)
// and the derived ones (spending, debts). Any change to raw data re-runs
// the pipeline in topological order:
//
//   expenses + categories + people -> spending -> debts
//
// The pipeline is synchronous and atomic: derived snapshots are swapped
// in only after both stages succeed, so a reader never sees spending from
// one pass next to debts from another. On failure the previous snapshots
// stay published and the triggering mutation is rolled back.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::debts::{Debt, DebtResolver};
use crate::entities::{Category, Expense, Group, Person};
use crate::error::Result;
use crate::source::SnapshotSource;
use crate::spending::{SpendingCalculator, SpendingSet};

// ============================================================================
// CHANGE EVENTS
// ============================================================================

/// The orchestrator's sole inbound trigger vocabulary
#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// Recompute from the current raw snapshots as-is
    Initialize,

    ExpenseAdded(Expense),

    /// Replace the expense with the same id (insert when absent)
    ExpenseUpdated(Expense),

    /// Remove by expense id
    ExpenseRemoved(String),

    /// Insert or replace by id
    CategoryUpserted(Category),
    PersonUpserted(Person),
    GroupUpserted(Group),
}

impl ChangeEvent {
    fn name(&self) -> &'static str {
        match self {
            ChangeEvent::Initialize => "initialize",
            ChangeEvent::ExpenseAdded(_) => "expense/create",
            ChangeEvent::ExpenseUpdated(_) => "expense/update",
            ChangeEvent::ExpenseRemoved(_) => "expense/delete",
            ChangeEvent::CategoryUpserted(_) => "category/upsert",
            ChangeEvent::PersonUpserted(_) => "person/upsert",
            ChangeEvent::GroupUpserted(_) => "group/upsert",
        }
    }
}

// ============================================================================
// RECOMPUTE PHASE
// ============================================================================

/// Where the pipeline currently is. Always back to `Idle` before
/// `on_data_changed` returns, success or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    ComputingSpending,
    ComputingDebts,
}

// ============================================================================
// OBSERVERS
// ============================================================================

/// Outbound notifications, fired after every successful publication
pub trait LedgerObserver {
    fn spending_updated(&self, _spending: &SpendingSet) {}
    fn debts_updated(&self, _debts: &[Debt]) {}
}

/// A successfully published pair of derived snapshots
#[derive(Debug, Clone)]
pub struct Publication {
    pub spending: Arc<SpendingSet>,
    pub debts: Arc<Vec<Debt>>,
}

// ============================================================================
// LEDGER
// ============================================================================

pub struct Ledger {
    calculator: SpendingCalculator,
    resolver: DebtResolver,

    groups: Vec<Group>,
    people: Vec<Person>,
    categories: Vec<Category>,
    expenses: Vec<Expense>,

    spending: Arc<SpendingSet>,
    debts: Arc<Vec<Debt>>,

    phase: Phase,
    observers: Vec<Box<dyn LedgerObserver>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::with_resolver(DebtResolver::new())
    }

    pub fn with_resolver(resolver: DebtResolver) -> Self {
        Ledger {
            calculator: SpendingCalculator::new(),
            resolver,
            groups: Vec::new(),
            people: Vec::new(),
            categories: Vec::new(),
            expenses: Vec::new(),
            spending: Arc::new(SpendingSet::default()),
            debts: Arc::new(Vec::new()),
            phase: Phase::Idle,
            observers: Vec::new(),
        }
    }

    /// Pull a full snapshot from the source and recompute
    pub fn load_from(&mut self, source: &dyn SnapshotSource) -> Result<Publication> {
        let groups = source.list_groups()?;
        let people = source.list_people()?;
        let categories = source.list_categories()?;
        let expenses = source.list_expenses()?;

        info!(
            target: "ledger",
            "loaded snapshot: {} groups, {} people, {} categories, {} expenses",
            groups.len(),
            people.len(),
            categories.len(),
            expenses.len()
        );

        // Stage the new raw data; a failed recompute rolls all of it back
        let staged = (
            std::mem::replace(&mut self.groups, groups),
            std::mem::replace(&mut self.people, people),
            std::mem::replace(&mut self.categories, categories),
            std::mem::replace(&mut self.expenses, expenses),
        );
        self.sort_expenses();

        match self.recompute() {
            Ok(publication) => Ok(publication),
            Err(err) => {
                warn!(target: "ledger", "snapshot load failed, restoring previous data: {err}");
                self.groups = staged.0;
                self.people = staged.1;
                self.categories = staged.2;
                self.expenses = staged.3;
                Err(err)
            }
        }
    }

    /// Apply one change event and re-derive spending and debts.
    ///
    /// On error the raw mutation is rolled back and the previously
    /// published derived snapshots remain in place unchanged. No retries:
    /// the computation is pure, so retrying without new input cannot
    /// succeed differently.
    pub fn on_data_changed(&mut self, event: ChangeEvent) -> Result<Publication> {
        debug!(target: "ledger", "event {}", event.name());

        let backup = self.backup_for(&event);
        self.apply(event);

        match self.recompute() {
            Ok(publication) => Ok(publication),
            Err(err) => {
                warn!(target: "ledger", "recompute failed, rolling back: {err}");
                self.restore(backup);
                Err(err)
            }
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn LedgerObserver>) {
        self.observers.push(observer);
    }

    // ------------------------------------------------------------------
    // accessors (published snapshots are immutable once returned)
    // ------------------------------------------------------------------

    pub fn spending(&self) -> Arc<SpendingSet> {
        Arc::clone(&self.spending)
    }

    pub fn debts(&self) -> Arc<Vec<Debt>> {
        Arc::clone(&self.debts)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Current expenses, reverse-chronological
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    // ------------------------------------------------------------------
    // internals
    // ------------------------------------------------------------------

    fn backup_for(&self, event: &ChangeEvent) -> RawBackup {
        match event {
            ChangeEvent::Initialize => RawBackup::None,
            ChangeEvent::ExpenseAdded(_)
            | ChangeEvent::ExpenseUpdated(_)
            | ChangeEvent::ExpenseRemoved(_) => RawBackup::Expenses(self.expenses.clone()),
            ChangeEvent::CategoryUpserted(_) => RawBackup::Categories(self.categories.clone()),
            ChangeEvent::PersonUpserted(_) => RawBackup::People(self.people.clone()),
            ChangeEvent::GroupUpserted(_) => RawBackup::Groups(self.groups.clone()),
        }
    }

    fn restore(&mut self, backup: RawBackup) {
        match backup {
            RawBackup::None => {}
            RawBackup::Expenses(expenses) => self.expenses = expenses,
            RawBackup::Categories(categories) => self.categories = categories,
            RawBackup::People(people) => self.people = people,
            RawBackup::Groups(groups) => self.groups = groups,
        }
    }

    fn apply(&mut self, event: ChangeEvent) {
        match event {
            ChangeEvent::Initialize => {}
            ChangeEvent::ExpenseAdded(expense) => {
                self.expenses.push(expense);
                self.sort_expenses();
            }
            ChangeEvent::ExpenseUpdated(expense) => {
                match self.expenses.iter_mut().find(|e| e.id == expense.id) {
                    Some(slot) => *slot = expense,
                    None => self.expenses.push(expense),
                }
                self.sort_expenses();
            }
            ChangeEvent::ExpenseRemoved(id) => {
                self.expenses.retain(|e| e.id != id);
            }
            ChangeEvent::CategoryUpserted(category) => {
                upsert_by_id(&mut self.categories, category, |c| &c.id);
            }
            ChangeEvent::PersonUpserted(person) => {
                upsert_by_id(&mut self.people, person, |p| &p.id);
            }
            ChangeEvent::GroupUpserted(group) => {
                upsert_by_id(&mut self.groups, group, |g| &g.id);
            }
        }
    }

    /// Keep expenses in reverse chronological order after every change
    fn sort_expenses(&mut self) {
        self.expenses.sort_by(|a, b| b.date.cmp(&a.date));
    }

    /// Run the two derivation stages in dependency order and publish
    fn recompute(&mut self) -> Result<Publication> {
        self.phase = Phase::ComputingSpending;
        let spending = match self
            .calculator
            .compute(&self.expenses, &self.categories, &self.people)
        {
            Ok(spending) => spending,
            Err(err) => {
                self.phase = Phase::Idle;
                return Err(err);
            }
        };

        self.phase = Phase::ComputingDebts;
        let debts = self.resolver.resolve(&spending);
        self.phase = Phase::Idle;

        // Publish: wholly new snapshots, never mutated in place
        self.spending = Arc::new(spending);
        self.debts = Arc::new(debts);

        info!(
            target: "ledger",
            "published {} spending records, {} debts",
            self.spending.len(),
            self.debts.len()
        );

        for observer in &self.observers {
            observer.spending_updated(&self.spending);
            observer.debts_updated(&self.debts);
        }

        Ok(Publication {
            spending: Arc::clone(&self.spending),
            debts: Arc::clone(&self.debts),
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

enum RawBackup {
    None,
    Expenses(Vec<Expense>),
    Categories(Vec<Category>),
    People(Vec<Person>),
    Groups(Vec<Group>),
}

fn upsert_by_id<T, F: Fn(&T) -> &String>(items: &mut Vec<T>, item: T, id_of: F) {
    match items.iter().position(|existing| id_of(existing) == id_of(&item)) {
        Some(i) => items[i] = item,
        None => items.push(item),
    }
}

// ============================================================================
// TESTS
// ============================================================================

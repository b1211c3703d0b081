// 🗃️ Snapshot Sources - Where raw domain data comes from
//
// The engines never do I/O themselves; a SnapshotSource hands the ledger
// a full snapshot at call time. Three implementations:
//   FixtureSource    - built-in sample data (two people on a trip)
//   JsonSource       - full snapshot from a JSON file
//   load_expenses_csv - expense rows from a CSV export
//
// Every record still goes through its validated constructor on the way
// in, so a malformed file cannot smuggle bad data into a snapshot.

use std::path::{Path, PathBuf};

use chrono::DateTime;
use log::{debug, info};
use serde::Deserialize;

use crate::entities::{Category, Expense, Group, Person, SplitEntry};
use crate::error::{EngineError, Result};

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// Supplies snapshots of the raw domain collections. Each call returns
/// the state at call time; the ledger owns its copy afterwards.
pub trait SnapshotSource {
    fn list_groups(&self) -> Result<Vec<Group>>;
    fn list_people(&self) -> Result<Vec<Person>>;
    fn list_categories(&self) -> Result<Vec<Category>>;
    fn list_expenses(&self) -> Result<Vec<Expense>>;
}

// ============================================================================
// FIXTURE SOURCE
// ============================================================================

/// Built-in sample data: Jason and Marisa's trip. Two groups, four
/// categories (one belonging to a foreign group), four expenses
/// totalling 1908.00. Useful for demos and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureSource;

const JASON: &str = "0ba081f6-9261-4c16-8476-9049165a7f04";
const MARISA: &str = "6db0719a-603d-4986-8366-5bb6824ef9c2";
const GROUP_TRIP: &str = "1636969f-58a9-4210-915b-74999150ecbf";
const GROUP_FOREIGN: &str = "4566969f-58a9-4a10-915b-74999150e123";
const CAT_TRANSPORT: &str = "95c1b56d-c585-4f24-ad4c-f3310a3eca2a";
const CAT_FOOD: &str = "5601dfda-610a-4762-85de-e51e1b9d5a10";
const CAT_LODGING: &str = "782eade6-0386-42ba-b910-de4bd209ed90";
const CAT_FOREIGN: &str = "123eade6-0386-42ba-b910-de4bd209e456";

impl FixtureSource {
    pub fn new() -> Self {
        FixtureSource
    }
}

impl SnapshotSource for FixtureSource {
    fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(vec![
            Group::new(
                GROUP_TRIP,
                "J+M Worldwide",
                JASON,
                vec![JASON.to_string(), MARISA.to_string()],
            )?,
            Group::new(
                GROUP_FOREIGN,
                "Things That Are Not Mine",
                "0ba081f6-9261-4c16-8476-9049165a7123",
                vec![
                    "0ba081f6-9261-4c16-8476-9049165a7123".to_string(),
                    "6db0719a-603d-4986-8366-5bb6824ef456".to_string(),
                ],
            )?,
        ])
    }

    fn list_people(&self) -> Result<Vec<Person>> {
        Ok(vec![
            Person::new(JASON, "Jason", "Lengstorf", "jason@jmworldwide.example")?,
            Person::new(MARISA, "Marisa", "Morby", "marisa@jmworldwide.example")?,
        ])
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        Ok(vec![
            Category::new(
                CAT_TRANSPORT,
                GROUP_TRIP,
                "Transportation",
                "plane",
                vec![SplitEntry::new(JASON, 50.0)?, SplitEntry::new(MARISA, 50.0)?],
            )?,
            Category::new(
                CAT_FOOD,
                GROUP_TRIP,
                "Food",
                "cutlery",
                vec![SplitEntry::new(JASON, 70.0)?, SplitEntry::new(MARISA, 30.0)?],
            )?,
            Category::new(
                CAT_LODGING,
                GROUP_TRIP,
                "Lodging",
                "home",
                vec![SplitEntry::new(JASON, 70.0)?, SplitEntry::new(MARISA, 30.0)?],
            )?,
            // belongs to the foreign group; referenced by none of the
            // fixture expenses
            Category::new(
                CAT_FOREIGN,
                GROUP_FOREIGN,
                "Not My Data",
                "cog",
                vec![
                    SplitEntry::new("0ba081f6-9261-4c16-8476-9049165a7123", 70.0)?,
                    SplitEntry::new("6db0719a-603d-4986-8366-5bb6824ef456", 30.0)?,
                ],
            )?,
        ])
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        Ok(vec![
            Expense::new(
                parse_date("2015-10-25T11:10:31+07:00")?,
                "Delta Airlines",
                800.00,
                CAT_TRANSPORT,
                MARISA,
            )?,
            Expense::new(
                parse_date("2015-10-25T08:02:17+07:00")?,
                "Bondi Cafe",
                8.00,
                CAT_FOOD,
                JASON,
            )?,
            Expense::new(
                parse_date("2015-10-25T07:57:59+07:00")?,
                "Coconut Beach",
                700.00,
                CAT_LODGING,
                JASON,
            )?,
            Expense::new(
                parse_date("2015-10-24T21:42:13+07:00")?,
                "Buri Resort",
                400.00,
                CAT_LODGING,
                JASON,
            )?,
        ])
    }
}

// ============================================================================
// JSON SOURCE
// ============================================================================

/// Full snapshot from one JSON file:
///
/// ```json
/// {
///   "groups": [{"id": "...", "name": "...", "owner": "...", "members": []}],
///   "people": [{"id": "...", "first_name": "...", "last_name": "...", "email": "..."}],
///   "categories": [{"id": "...", "group_id": "...", "name": "...", "icon": "...",
///                   "split": [{"person_id": "...", "percent": 50.0}]}],
///   "expenses": [{"date": "2015-10-25T11:10:31+07:00", "vendor": "...",
///                 "amount": 800.0, "category_id": "...", "person_id": "..."}]
/// }
/// ```
///
/// Expense dates may be RFC 3339 strings or epoch milliseconds.
#[derive(Debug, Clone)]
pub struct JsonSource {
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    groups: Vec<GroupRow>,
    #[serde(default)]
    people: Vec<PersonRow>,
    #[serde(default)]
    categories: Vec<CategoryRow>,
    #[serde(default)]
    expenses: Vec<ExpenseRow>,
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    id: String,
    name: String,
    owner: String,
    #[serde(default)]
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PersonRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct CategoryRow {
    id: String,
    group_id: String,
    name: String,
    #[serde(default)]
    icon: String,
    #[serde(default)]
    split: Vec<SplitRow>,
}

#[derive(Debug, Deserialize)]
struct SplitRow {
    person_id: String,
    percent: f64,
}

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    date: DateField,
    vendor: String,
    amount: f64,
    category_id: String,
    person_id: String,
}

/// Epoch milliseconds or an RFC 3339 string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DateField {
    Millis(i64),
    Rfc3339(String),
}

impl DateField {
    fn millis(&self) -> Result<i64> {
        match self {
            DateField::Millis(ms) => Ok(*ms),
            DateField::Rfc3339(s) => parse_date(s),
        }
    }
}

impl JsonSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonSource { path: path.into() }
    }

    fn read(&self) -> Result<SnapshotFile> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| EngineError::source(format!("{}: {e}", self.path.display())))?;
        let file: SnapshotFile = serde_json::from_str(&raw)
            .map_err(|e| EngineError::source(format!("{}: {e}", self.path.display())))?;

        debug!(
            target: "source",
            "{}: {} people, {} categories, {} expenses",
            self.path.display(),
            file.people.len(),
            file.categories.len(),
            file.expenses.len()
        );

        Ok(file)
    }
}

impl SnapshotSource for JsonSource {
    fn list_groups(&self) -> Result<Vec<Group>> {
        self.read()?
            .groups
            .into_iter()
            .map(|row| Group::new(row.id, row.name, row.owner, row.members))
            .collect()
    }

    fn list_people(&self) -> Result<Vec<Person>> {
        self.read()?
            .people
            .into_iter()
            .map(|row| Person::new(row.id, row.first_name, row.last_name, row.email))
            .collect()
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        self.read()?
            .categories
            .into_iter()
            .map(|row| {
                let split = row
                    .split
                    .into_iter()
                    .map(|s| SplitEntry::new(s.person_id, s.percent))
                    .collect::<Result<Vec<_>>>()?;
                Category::new(row.id, row.group_id, row.name, row.icon, split)
            })
            .collect()
    }

    fn list_expenses(&self) -> Result<Vec<Expense>> {
        self.read()?
            .expenses
            .into_iter()
            .map(|row| {
                Expense::new(
                    row.date.millis()?,
                    row.vendor,
                    row.amount,
                    row.category_id,
                    row.person_id,
                )
            })
            .collect()
    }
}

// ============================================================================
// CSV EXPENSE LOADER
// ============================================================================

/// Load expense rows from a CSV file with the header
/// `date,vendor,amount,category_id,person_id`.
///
/// Dates may be epoch milliseconds or RFC 3339 strings.
pub fn load_expenses_csv(path: &Path) -> Result<Vec<Expense>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EngineError::source(format!("{}: {e}", path.display())))?;

    let mut expenses = Vec::new();
    for (line, row) in reader.deserialize::<ExpenseRow>().enumerate() {
        let row = row.map_err(|e| {
            EngineError::source(format!("{} line {}: {e}", path.display(), line + 2))
        })?;
        expenses.push(Expense::new(
            row.date.millis()?,
            row.vendor,
            row.amount,
            row.category_id,
            row.person_id,
        )?);
    }

    info!(target: "source", "loaded {} expenses from {}", expenses.len(), path.display());

    Ok(expenses)
}

fn parse_date(value: &str) -> Result<i64> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.timestamp_millis())
        .map_err(|e| EngineError::source(format!("bad date {value:?}: {e}")))
}

// ============================================================================
// TESTS
// ============================================================================

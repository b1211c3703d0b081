// Split Ledger - Shared-Expense Settlement Engine
// Pure, deterministic derivation: expenses + categories + people in,
// per-person spending and pairwise debts out

pub mod debts;
pub mod entities;
pub mod error;
pub mod money;
pub mod source;
pub mod spending;
pub mod store;

// Re-export commonly used types
pub use debts::{Debt, DebtResolver, ResolveStrategy};
pub use entities::{Category, Expense, Group, Person, SplitEntry};
pub use error::{EngineError, Result};
pub use money::to_nearest_cent;
pub use source::{load_expenses_csv, FixtureSource, JsonSource, SnapshotSource};
pub use spending::{Spending, SpendingCalculator, SpendingSet};
pub use store::{ChangeEvent, Ledger, LedgerObserver, Phase, Publication};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

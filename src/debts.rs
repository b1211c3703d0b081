// ⚖️ Debt Resolver - Turn per-person balances into pairwise transfers
//
// Two strategies:
//   Greedy       - the faithful balance-matching pass. A lender's claim is
//                  consumed only when it fits inside the debtor's remaining
//                  outstanding amount, claims are never decremented across
//                  debtors, and an oversized claim is skipped entirely. When
//                  amounts don't divide evenly among lenders in iteration
//                  order, some balances are left unsettled. That limitation
//                  is kept on purpose and pinned by tests.
//   LargestFirst - deterministic alternative that always settles: match the
//                  largest remaining deficit against the largest remaining
//                  surplus until everything is within half a cent of zero.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::money::{to_nearest_cent, CENT_EPSILON};
use crate::spending::SpendingSet;

// ============================================================================
// DEBT RECORD (derived)
// ============================================================================

/// "debtor owes lender amount". Replaced wholesale on every pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    /// Synthetic identity, minted per derivation pass (uuid v4)
    pub id: String,

    pub debtor_id: String,
    pub lender_id: String,

    /// Dollars, rounded to the nearest cent
    pub amount: f64,
}

impl Debt {
    fn new(debtor_id: &str, lender_id: &str, amount: f64) -> Self {
        Debt {
            id: uuid::Uuid::new_v4().to_string(),
            debtor_id: debtor_id.to_string(),
            lender_id: lender_id.to_string(),
            amount: to_nearest_cent(amount),
        }
    }
}

// Payload equality; ids are per-pass
impl PartialEq for Debt {
    fn eq(&self, other: &Self) -> bool {
        self.debtor_id == other.debtor_id
            && self.lender_id == other.lender_id
            && self.amount == other.amount
    }
}

// ============================================================================
// RESOLVE STRATEGY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveStrategy {
    /// Faithful greedy matching; may leave balances unsettled
    Greedy,

    /// Largest-remaining-balance matching; always settles. Offered as an
    /// explicit alternative, never switched to silently.
    LargestFirst,
}

// ============================================================================
// DEBT RESOLVER
// ============================================================================

pub struct DebtResolver {
    pub strategy: ResolveStrategy,

    /// Balances below this are treated as owing money; everyone else is
    /// owed. 0.0 partitions strictly by sign (the intended semantic).
    /// Setting 1.0 reproduces a dollar-scale cutoff where sub-dollar
    /// surpluses are ignored - kept reachable so the behavior difference
    /// stays visible in tests.
    pub owes_threshold: f64,
}

impl DebtResolver {
    pub fn new() -> Self {
        DebtResolver {
            strategy: ResolveStrategy::Greedy,
            owes_threshold: 0.0,
        }
    }

    pub fn with_strategy(strategy: ResolveStrategy) -> Self {
        DebtResolver {
            strategy,
            owes_threshold: 0.0,
        }
    }

    /// Resolve the spending snapshot into a sequence of debts.
    ///
    /// Deterministic for a fixed SpendingSet: people are visited in
    /// snapshot order (Greedy) or by descending balance magnitude with id
    /// tie-breaks (LargestFirst). Running it twice on the same snapshot
    /// yields payload-identical debts.
    pub fn resolve(&self, spending: &SpendingSet) -> Vec<Debt> {
        let (owes, owed) = self.balances(spending);

        debug!(target: "debts", "{} debtors, {} lenders", owes.len(), owed.len());

        let debts = match self.strategy {
            ResolveStrategy::Greedy => resolve_greedy(&owes, &owed),
            ResolveStrategy::LargestFirst => resolve_largest_first(&owes, &owed),
        };

        let settled: f64 = debts.iter().map(|d| d.amount).sum();
        let deficit: f64 = owes.iter().map(|(_, b)| -b).sum();
        if deficit - settled > CENT_EPSILON {
            warn!(
                target: "debts",
                "pass left {:.2} of {:.2} unsettled",
                deficit - settled,
                deficit
            );
        }

        debts
    }

    /// Partition people into (owes, owed) with cent-rounded balances,
    /// preserving snapshot order
    fn balances(&self, spending: &SpendingSet) -> (Vec<(String, f64)>, Vec<(String, f64)>) {
        let mut owes = Vec::new();
        let mut owed = Vec::new();

        for entry in spending.iter() {
            let balance = entry.balance();

            if balance < self.owes_threshold {
                owes.push((entry.person_id.clone(), balance));
            } else {
                owed.push((entry.person_id.clone(), balance));
            }
        }

        (owes, owed)
    }
}

impl Default for DebtResolver {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// STRATEGIES
// ============================================================================

/// One pass per debtor over the lenders, in snapshot order. A lender's
/// claim is only consumed when it fits entirely inside the debtor's
/// outstanding amount; nothing is split. Claims larger than the
/// outstanding amount fall through unmatched, which is why this strategy
/// cannot guarantee full settlement.
fn resolve_greedy(owes: &[(String, f64)], owed: &[(String, f64)]) -> Vec<Debt> {
    let mut debts = Vec::new();

    for (debtor_id, balance) in owes {
        let mut outstanding = -balance;
        debug!(target: "debts", "debtor {} outstanding {:.2}", debtor_id, outstanding);

        if outstanding <= CENT_EPSILON {
            continue;
        }

        for (lender_id, claim) in owed {
            if *claim <= CENT_EPSILON {
                continue;
            }

            if *claim <= outstanding {
                debts.push(Debt::new(debtor_id, lender_id, *claim));
                outstanding -= claim;
                debug!(target: "debts", "{} -> {} {:.2}, outstanding now {:.2}", debtor_id, lender_id, claim, outstanding);
            }
        }
    }

    debts
}

/// Repeatedly match the largest remaining deficit with the largest
/// remaining surplus, transferring min(deficit, surplus). Ties break on
/// person id so the output is stable. Terminates once every remaining
/// balance is within half a cent of zero.
fn resolve_largest_first(owes: &[(String, f64)], owed: &[(String, f64)]) -> Vec<Debt> {
    // outstanding amounts, both kept positive
    let mut deficits: Vec<(String, f64)> = owes
        .iter()
        .filter(|(_, b)| -b > CENT_EPSILON)
        .map(|(id, b)| (id.clone(), -b))
        .collect();
    let mut surpluses: Vec<(String, f64)> = owed
        .iter()
        .filter(|(_, b)| *b > CENT_EPSILON)
        .map(|(id, b)| (id.clone(), *b))
        .collect();

    let mut debts = Vec::new();

    while !deficits.is_empty() && !surpluses.is_empty() {
        let debtor = largest(&deficits);
        let lender = largest(&surpluses);

        let amount = to_nearest_cent(deficits[debtor].1.min(surpluses[lender].1));
        debts.push(Debt::new(&deficits[debtor].0, &surpluses[lender].0, amount));

        deficits[debtor].1 -= amount;
        surpluses[lender].1 -= amount;

        deficits.retain(|(_, b)| *b > CENT_EPSILON);
        surpluses.retain(|(_, b)| *b > CENT_EPSILON);
    }

    debts
}

/// Index of the largest remaining amount, smallest id on ties
fn largest(entries: &[(String, f64)]) -> usize {
    let mut best = 0;
    for i in 1..entries.len() {
        let (best_id, best_amount) = &entries[best];
        let (id, amount) = &entries[i];
        if amount > best_amount || (amount == best_amount && id < best_id) {
            best = i;
        }
    }
    best
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Category, Expense, Person, SplitEntry};
    use crate::money::same_amount;
    use crate::spending::SpendingCalculator;

    /// Build a SpendingSet from (person, expected, actual) rows by routing
    /// them through the calculator: one shared category whose split mirrors
    /// the expected amounts, one expense per person for what they paid.
    /// Row totals must balance (sum expected == sum actual).
    fn spending_rows(rows: &[(&str, f64, f64)]) -> SpendingSet {
        let people: Vec<Person> = rows
            .iter()
            .map(|(id, _, _)| Person::new(*id, *id, "Tester", format!("{id}@example.com")).unwrap())
            .collect();

        let total_expected: f64 = rows.iter().map(|(_, e, _)| e).sum();
        let split = rows
            .iter()
            .map(|(id, expected, _)| {
                SplitEntry::new(*id, 100.0 * expected / total_expected).unwrap()
            })
            .collect();
        let categories =
            vec![Category::new("c-shared", "g-1", "Shared", "tag", split).unwrap()];

        // One expense per person for what they actually paid
        let expenses: Vec<Expense> = rows
            .iter()
            .filter(|(_, _, actual)| *actual > 0.0)
            .map(|(id, _, actual)| Expense::new(0, "paid", *actual, "c-shared", *id).unwrap())
            .collect();

        // Only valid when actual totals match expected totals
        assert!(same_amount(
            rows.iter().map(|(_, _, a)| a).sum::<f64>(),
            total_expected
        ));

        SpendingCalculator::new()
            .compute(&expenses, &categories, &people)
            .unwrap()
    }

    #[test]
    fn test_zero_debt_when_everyone_is_even() {
        let spending = spending_rows(&[("p-1", 50.0, 50.0), ("p-2", 50.0, 50.0)]);
        let debts = DebtResolver::new().resolve(&spending);
        assert!(debts.is_empty());
    }

    #[test]
    fn test_two_person_settlement() {
        // Exact-opposite balances: +184.00 and -184.00
        let spending = spending_rows(&[("p-a", 916.0, 1100.0), ("p-b", 992.0, 808.0)]);

        assert!(same_amount(spending.get("p-a").unwrap().balance(), 184.0));
        assert!(same_amount(spending.get("p-b").unwrap().balance(), -184.0));

        let debts = DebtResolver::new().resolve(&spending);
        assert_eq!(debts.len(), 1);
        assert_eq!(debts[0].debtor_id, "p-b");
        assert_eq!(debts[0].lender_id, "p-a");
        assert!(same_amount(debts[0].amount, 184.00));
    }

    #[test]
    fn test_greedy_skips_oversized_claims() {
        // One lender is owed 100; each debtor's outstanding (60, 40) is
        // smaller than the claim, so the greedy pass matches nothing.
        // This is the documented non-settlement limitation.
        let spending = spending_rows(&[
            ("p-lender", 0.0, 100.0),
            ("p-d1", 60.0, 0.0),
            ("p-d2", 40.0, 0.0),
        ]);

        let debts = DebtResolver::new().resolve(&spending);
        assert!(debts.is_empty());
    }

    #[test]
    fn test_largest_first_settles_what_greedy_cannot() {
        let spending = spending_rows(&[
            ("p-lender", 0.0, 100.0),
            ("p-d1", 60.0, 0.0),
            ("p-d2", 40.0, 0.0),
        ]);

        let debts = DebtResolver::with_strategy(ResolveStrategy::LargestFirst).resolve(&spending);

        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].debtor_id, "p-d1");
        assert!(same_amount(debts[0].amount, 60.0));
        assert_eq!(debts[1].debtor_id, "p-d2");
        assert!(same_amount(debts[1].amount, 40.0));
        assert!(debts.iter().all(|d| d.lender_id == "p-lender"));
    }

    #[test]
    fn test_greedy_does_not_decrement_claims_across_debtors() {
        // Two debtors can both fully "pay" the same claim; the claim is
        // never reduced between debtor passes. Preserved, not fixed.
        let spending = spending_rows(&[
            ("p-lender", 20.0, 100.0),
            ("p-d1", 60.0, 10.0),
            ("p-d2", 70.0, 40.0),
        ]);
        // balances: lender +80, d1 -50, d2 -30

        let debts = DebtResolver::new().resolve(&spending);

        // d1: outstanding 50, claim 80 too large => nothing
        // d2: outstanding 30, claim 80 too large => nothing
        assert!(debts.is_empty());

        // largest-first settles the same snapshot fully
        let settled =
            DebtResolver::with_strategy(ResolveStrategy::LargestFirst).resolve(&spending);
        let total: f64 = settled.iter().map(|d| d.amount).sum();
        assert!(same_amount(total, 80.0));
    }

    #[test]
    fn test_greedy_consumes_claims_in_order() {
        // Debtor owes 100 against claims of 60 and 40 => two debts,
        // one per matched pair, never merged
        let spending = spending_rows(&[
            ("p-l1", 0.0, 60.0),
            ("p-l2", 0.0, 40.0),
            ("p-debtor", 100.0, 0.0),
        ]);

        let debts = DebtResolver::new().resolve(&spending);

        assert_eq!(debts.len(), 2);
        assert_eq!(debts[0].lender_id, "p-l1");
        assert!(same_amount(debts[0].amount, 60.0));
        assert_eq!(debts[1].lender_id, "p-l2");
        assert!(same_amount(debts[1].amount, 40.0));
        assert!(debts.iter().all(|d| d.debtor_id == "p-debtor"));
    }

    #[test]
    fn test_owes_threshold_discrepancy_stays_visible() {
        // +0.50 / -0.50 balances. With the sign partition the 50-cent
        // surplus is a lender and the debt resolves; with the dollar-scale
        // cutoff both land in "owes" and nothing is produced.
        let spending = spending_rows(&[("p-up", 1.0, 1.5), ("p-down", 1.5, 1.0)]);

        let sign = DebtResolver::new().resolve(&spending);
        assert_eq!(sign.len(), 1);
        assert!(same_amount(sign[0].amount, 0.50));

        let mut legacy = DebtResolver::new();
        legacy.owes_threshold = 1.0;
        assert!(legacy.resolve(&spending).is_empty());
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let spending = spending_rows(&[("p-a", 916.0, 1100.0), ("p-b", 992.0, 808.0)]);
        let resolver = DebtResolver::new();

        let first = resolver.resolve(&spending);
        let second = resolver.resolve(&spending);

        assert_eq!(first, second);
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn test_largest_first_tie_break_is_stable() {
        let spending = spending_rows(&[
            ("p-a", 0.0, 50.0),
            ("p-b", 0.0, 50.0),
            ("p-debtor", 100.0, 0.0),
        ]);
        let resolver = DebtResolver::with_strategy(ResolveStrategy::LargestFirst);

        let debts = resolver.resolve(&spending);
        assert_eq!(debts.len(), 2);
        // equal claims: smallest id first
        assert_eq!(debts[0].lender_id, "p-a");
        assert_eq!(debts[1].lender_id, "p-b");
        assert_eq!(debts, resolver.resolve(&spending));
    }
}

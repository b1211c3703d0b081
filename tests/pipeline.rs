// End-to-end pipeline tests: snapshot source -> ledger -> spending -> debts

use std::io::Write;
use std::sync::Arc;

use split_ledger::money::same_amount;
use split_ledger::{
    ChangeEvent, DebtResolver, EngineError, Expense, FixtureSource, JsonSource, Ledger,
    ResolveStrategy,
};

const JASON: &str = "0ba081f6-9261-4c16-8476-9049165a7f04";
const MARISA: &str = "6db0719a-603d-4986-8366-5bb6824ef9c2";
const CAT_FOOD: &str = "5601dfda-610a-4762-85de-e51e1b9d5a10";

#[test]
fn fixture_snapshot_resolves_to_one_debt() {
    let mut ledger = Ledger::new();
    let publication = ledger.load_from(&FixtureSource::new()).unwrap();

    // 800*0.5 + (8+700+400)*0.7 = 1175.60 expected for Jason
    let jason = publication.spending.get(JASON).unwrap();
    assert!(same_amount(jason.expected, 1175.60));
    assert!(same_amount(jason.actual, 1108.00));

    let marisa = publication.spending.get(MARISA).unwrap();
    assert!(same_amount(marisa.expected, 732.40));
    assert!(same_amount(marisa.actual, 800.00));

    // splits all sum to 100, so the totals agree
    assert!(same_amount(
        publication.spending.total_expected(),
        publication.spending.total_actual()
    ));

    // Jason underpaid by 67.60, Marisa overpaid by the same
    assert_eq!(publication.debts.len(), 1);
    let debt = &publication.debts[0];
    assert_eq!(debt.debtor_id, JASON);
    assert_eq!(debt.lender_id, MARISA);
    assert!(same_amount(debt.amount, 67.60));
}

#[test]
fn both_strategies_agree_on_the_two_person_fixture() {
    let mut greedy = Ledger::new();
    let g = greedy.load_from(&FixtureSource::new()).unwrap();

    let mut largest = Ledger::with_resolver(DebtResolver::with_strategy(ResolveStrategy::LargestFirst));
    let l = largest.load_from(&FixtureSource::new()).unwrap();

    assert_eq!(*g.debts, *l.debts);
}

#[test]
fn adding_an_expense_rebalances_the_debts() {
    let mut ledger = Ledger::new();
    ledger.load_from(&FixtureSource::new()).unwrap();

    // Marisa pays 100 more into Food (70/30 split): Jason's deficit
    // grows by 70, Marisa's surplus by 70
    let expense = Expense::new(1_445_800_000_000, "Night Market", 100.0, CAT_FOOD, MARISA).unwrap();
    let publication = ledger
        .on_data_changed(ChangeEvent::ExpenseAdded(expense))
        .unwrap();

    assert_eq!(publication.debts.len(), 1);
    assert!(same_amount(publication.debts[0].amount, 137.60));
    assert_eq!(publication.debts[0].debtor_id, JASON);
}

#[test]
fn dangling_category_reference_fails_and_keeps_the_old_snapshot() {
    let mut ledger = Ledger::new();
    ledger.load_from(&FixtureSource::new()).unwrap();

    let spending_before = ledger.spending();
    let debts_before = ledger.debts();

    let bad = Expense::new(0, "Mystery", 10.0, "c-not-in-snapshot", JASON).unwrap();
    let err = ledger.on_data_changed(ChangeEvent::ExpenseAdded(bad)).unwrap_err();

    assert!(matches!(err, EngineError::CategoryNotFound { .. }));
    assert!(Arc::ptr_eq(&spending_before, &ledger.spending()));
    assert!(Arc::ptr_eq(&debts_before, &ledger.debts()));
    assert_eq!(ledger.expenses().len(), 4);
}

#[test]
fn repeated_initialize_is_structurally_stable() {
    let mut ledger = Ledger::new();
    ledger.load_from(&FixtureSource::new()).unwrap();

    let first = ledger.on_data_changed(ChangeEvent::Initialize).unwrap();
    let second = ledger.on_data_changed(ChangeEvent::Initialize).unwrap();

    assert_eq!(*first.spending, *second.spending);
    assert_eq!(*first.debts, *second.debts);
    assert!(!Arc::ptr_eq(&first.spending, &second.spending));
}

#[test]
fn json_snapshot_matches_fixture_behavior() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "groups": [
                {{"id": "g-1", "name": "Flat 12", "owner": "p-ann", "members": ["p-ann", "p-ben"]}}
            ],
            "people": [
                {{"id": "p-ann", "first_name": "Ann", "last_name": "Archer", "email": "ann@example.com"}},
                {{"id": "p-ben", "first_name": "Ben", "last_name": "Brand", "email": "ben@example.com"}}
            ],
            "categories": [
                {{"id": "c-rent", "group_id": "g-1", "name": "Rent", "icon": "home",
                  "split": [
                      {{"person_id": "p-ann", "percent": 60.0}},
                      {{"person_id": "p-ben", "percent": 40.0}}
                  ]}}
            ],
            "expenses": [
                {{"date": "2026-08-01T09:00:00+00:00", "vendor": "Landlord", "amount": 1000.0,
                  "category_id": "c-rent", "person_id": "p-ann"}}
            ]
        }}"#
    )
    .unwrap();

    let mut ledger = Ledger::new();
    let publication = ledger.load_from(&JsonSource::new(file.path())).unwrap();

    // Ann paid 1000, expected 600 => Ben owes her 400
    assert_eq!(publication.debts.len(), 1);
    assert_eq!(publication.debts[0].debtor_id, "p-ben");
    assert!(same_amount(publication.debts[0].amount, 400.0));

    assert_eq!(ledger.groups()[0].slug, "flat-12");
}

#[test]
fn broken_json_snapshot_leaves_the_ledger_untouched() {
    let mut ledger = Ledger::new();
    ledger.load_from(&FixtureSource::new()).unwrap();
    let spending_before = ledger.spending();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();

    assert!(ledger.load_from(&JsonSource::new(file.path())).is_err());
    assert!(Arc::ptr_eq(&spending_before, &ledger.spending()));
    assert_eq!(ledger.people().len(), 2);
}

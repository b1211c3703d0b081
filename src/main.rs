use std::env;

use anyhow::Result;

use split_ledger::{
    DebtResolver, FixtureSource, JsonSource, Ledger, Publication, ResolveStrategy,
};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    let settle_all = args.iter().any(|a| a == "--settle-all");
    let snapshot_path = args.iter().find(|a| !a.starts_with("--"));

    let resolver = if settle_all {
        DebtResolver::with_strategy(ResolveStrategy::LargestFirst)
    } else {
        DebtResolver::new()
    };

    let mut ledger = Ledger::with_resolver(resolver);
    let publication = match snapshot_path {
        Some(path) => {
            println!("📂 Loading snapshot from {path}...");
            ledger.load_from(&JsonSource::new(path.as_str()))?
        }
        None => {
            println!("📂 No snapshot given, using built-in sample data");
            ledger.load_from(&FixtureSource::new())?
        }
    };

    print_report(&ledger, &publication, settle_all);

    Ok(())
}

fn print_report(ledger: &Ledger, publication: &Publication, settle_all: bool) {
    if let Some(group) = ledger.groups().first() {
        println!("\n═══ {} ═══", group.name);
    }

    println!("\n💰 Spending");
    println!("{:<20} {:>12} {:>12} {:>12}", "Person", "Expected", "Actual", "Balance");
    for entry in publication.spending.iter() {
        let name = display_name(ledger, &entry.person_id);
        println!(
            "{:<20} {:>12.2} {:>12.2} {:>12.2}",
            name,
            entry.expected,
            entry.actual,
            entry.balance()
        );
    }
    println!(
        "{:<20} {:>12.2} {:>12.2}",
        "TOTAL",
        publication.spending.total_expected(),
        publication.spending.total_actual()
    );

    let strategy = if settle_all { "largest-first" } else { "greedy" };
    println!("\n🤝 Debts ({strategy})");
    if publication.debts.is_empty() {
        println!("Nobody owes anything.");
    } else {
        for debt in publication.debts.iter() {
            let debtor = display_name(ledger, &debt.debtor_id);
            let lender = display_name(ledger, &debt.lender_id);
            println!("{debtor} owes {lender} ${:.2}", debt.amount);
        }
    }
}

fn display_name<'a>(ledger: &'a Ledger, person_id: &'a str) -> &'a str {
    ledger
        .people()
        .iter()
        .find(|p| p.id == person_id)
        .map(|p| p.name.as_str())
        .unwrap_or(person_id)
}

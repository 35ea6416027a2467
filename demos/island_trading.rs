//! Island market example.
//!
//! Searches the built-in four-good market for the best way to grow a stack
//! of SeaShells in at most five trades, then prints the trade breakdown.

use conversion_engine::report::trade_report::TradeReport;
use conversion_engine::search::engine::PathSearchEngine;
use conversion_engine::simulation::scenarios::{island_config, island_exchange};

fn main() {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  conversion-engine: Island Trading            ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let table = match island_exchange() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("invalid market: {}", e);
            return;
        }
    };
    let config = island_config();

    println!("Rates (row converts into column):");
    print!("  {:<16}", "");
    for to in table.universe() {
        print!("{:>16}", to.as_str());
    }
    println!();
    for from in table.universe() {
        print!("  {:<16}", from.as_str());
        for to in table.universe() {
            print!("{:>16}", table.rate(from, to).to_string());
        }
        println!();
    }
    println!();

    let result = match PathSearchEngine::new().search(&table, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("search failed: {}", e);
            return;
        }
    };

    match TradeReport::from_result(&result, &table) {
        Ok(report) => println!("{}", report),
        Err(e) => eprintln!("replay failed: {}", e),
    }
}

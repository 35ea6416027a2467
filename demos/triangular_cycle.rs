//! Triangular cycle example.
//!
//! Three currencies quoted only around a ring. No two-trade round trip
//! exists, so the profit only appears once three trades are allowed.

use conversion_engine::core::currency::CurrencyCode;
use conversion_engine::core::rates::RateTable;
use conversion_engine::graph::rate_graph::RateGraph;
use conversion_engine::search::engine::{PathSearchEngine, SearchConfig};
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔═══════════════════════════════════════════════╗");
    println!("║  conversion-engine: Triangular Cycle          ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    let table = RateTable::with_currencies(["USD", "EUR", "GBP"])
        .with_rate("USD", "EUR", dec!(1.5))?
        .with_rate("EUR", "GBP", dec!(1.5))?
        .with_rate("GBP", "USD", dec!(1.5))?;
    let usd = CurrencyCode::new("USD");

    println!("Quotes:");
    println!("  USD → EUR: 1.5");
    println!("  EUR → GBP: 1.5");
    println!("  GBP → USD: 1.5\n");

    let graph = RateGraph::from_table(&table);
    println!("━━━ Reachability ━━━\n");
    let members: Vec<String> = graph
        .cycle_members(&usd)
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!("  On a cycle with USD: [{}]", members.join(", "));
    if let Some(trades) = graph.min_closing_trades(&usd) {
        println!("  Shortest round trip: {} trades\n", trades);
    }

    println!("━━━ Search by trade bound ━━━\n");
    let engine = PathSearchEngine::new();
    for max_trades in 1..=4 {
        let config = SearchConfig::new(usd.clone(), max_trades, dec!(100));
        let result = engine.search(&table, &config)?;
        println!(
            "  max {} trades: {} = {} USD",
            max_trades, result.best_path, result.best_value
        );
    }

    println!("\n━━━ Interpretation ━━━\n");
    println!("  With fewer than three trades nothing beats holding USD.");
    println!("  From three trades on, the ring multiplies 100 USD to 337.5.");
    Ok(())
}

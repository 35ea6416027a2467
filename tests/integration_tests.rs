use conversion_engine::core::currency::CurrencyCode;
use conversion_engine::core::rates::RateTable;
use conversion_engine::graph::rate_graph::RateGraph;
use conversion_engine::report::trade_report::TradeReport;
use conversion_engine::search::engine::{
    find_optimal_path, PathSearchEngine, SearchConfig, SearchStrategy,
};
use conversion_engine::simulation::scenarios::{island_config, island_exchange};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn code(s: &str) -> CurrencyCode {
    CurrencyCode::new(s)
}

/// Full pipeline on the island market: table → graph → search → report.
#[test]
fn island_market_full_pipeline() {
    let table = island_exchange().unwrap();
    let config = island_config();

    // Every island good can be traded back to SeaShells.
    let graph = RateGraph::from_table(&table);
    assert_eq!(graph.cycle_members(&config.home).len(), 4);
    assert_eq!(graph.min_closing_trades(&config.home), Some(2));

    let result = PathSearchEngine::new().search(&table, &config).unwrap();
    assert_eq!(
        result.best_path.currencies(),
        &[
            code("SeaShells"),
            code("Snowballs"),
            code("SiliconNuggets"),
            code("Pizzas"),
            code("Snowballs"),
            code("SeaShells"),
        ]
    );
    assert_eq!(result.best_value, dec!(544340.16));

    // Per-level winners.
    let level_values: Vec<Option<Decimal>> =
        result.levels.iter().map(|l| l.best_value).collect();
    assert_eq!(
        level_values,
        vec![
            None,
            Some(dec!(482400)),
            Some(dec!(519116)),
            Some(dec!(536936.4)),
            Some(dec!(544340.16)),
        ]
    );

    let report = TradeReport::from_result(&result, &table).unwrap();
    assert_eq!(report.steps.len(), 5);
    assert_eq!(report.replayed_amount(), result.best_value);
    assert_eq!(report.profit, dec!(44340.16));
    approx::assert_relative_eq!(report.profit_percent, 8.868032, epsilon = 1e-6);
}

/// Both strategies agree on the island market for every bound.
#[test]
fn island_strategies_agree() {
    let table = island_exchange().unwrap();
    for max_trades in 1..=6 {
        let mut config = island_config();
        config.max_trades = max_trades;

        let frontier = PathSearchEngine::new().search(&table, &config).unwrap();
        let memo = PathSearchEngine::new()
            .with_strategy(SearchStrategy::Memoized)
            .search(&table, &config)
            .unwrap();
        assert_eq!(frontier.best_path, memo.best_path);
        assert_eq!(frontier.best_value, memo.best_value);
        assert_eq!(frontier.levels, memo.levels);
    }
}

/// A currency that can be reached but never left does not change the answer.
#[test]
fn dead_end_currency_is_ignored() {
    let base = RateTable::with_currencies(["A", "B"])
        .with_rate("A", "B", dec!(1.2))
        .unwrap()
        .with_rate("B", "A", dec!(1.2))
        .unwrap();
    let with_sink = base.clone().with_rate("A", "SINK", dec!(100)).unwrap();

    let plain = find_optimal_path(&base, &code("A"), 4, dec!(10)).unwrap();
    let sunk = find_optimal_path(&with_sink, &code("A"), 4, dec!(10)).unwrap();
    assert_eq!(plain, sunk);
}

/// When home cannot trade out at all, the baseline is returned.
#[test]
fn home_without_departures_keeps_baseline() {
    let table = RateTable::with_currencies(["A", "B", "C"])
        .with_rate("B", "C", dec!(3))
        .unwrap()
        .with_rate("C", "B", dec!(3))
        .unwrap()
        .with_rate("B", "A", dec!(3))
        .unwrap();

    let (path, value) = find_optimal_path(&table, &code("A"), 5, dec!(100)).unwrap();
    assert_eq!(path.currencies(), &[code("A")]);
    assert_eq!(value, dec!(100));
}

/// Test JSON serialization of a search report.
#[test]
fn report_serializes() {
    let table = island_exchange().unwrap();
    let result = PathSearchEngine::new()
        .search(&table, &island_config())
        .unwrap();
    let report = TradeReport::from_result(&result, &table).unwrap();

    let json = serde_json::to_string_pretty(&report).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["home"], "SeaShells");
    let final_amount: Decimal = parsed["final_amount"].as_str().unwrap().parse().unwrap();
    assert_eq!(final_amount, dec!(544340.16));
    assert_eq!(parsed["path"][0], "SeaShells");
    assert_eq!(parsed["steps"].as_array().map(|s| s.len()), Some(5));
    assert_eq!(parsed["levels"].as_array().map(|l| l.len()), Some(5));
}

/// Search configuration deserializes from the same shape the CLI accepts.
#[test]
fn search_config_from_json() {
    let config: SearchConfig = serde_json::from_str(
        r#"{ "home": "SeaShells", "max_trades": 5, "initial_amount": "500000" }"#,
    )
    .unwrap();
    assert_eq!(config, island_config());
}

/// Running the same search twice gives identical results.
#[test]
fn search_is_deterministic() {
    let table = island_exchange().unwrap();
    let first = PathSearchEngine::new().search(&table, &island_config()).unwrap();
    let second = PathSearchEngine::new().search(&table, &island_config()).unwrap();
    assert_eq!(first, second);
}

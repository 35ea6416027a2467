//! # conversion-engine
//!
//! Exact search for the most profitable closed currency conversion path.
//!
//! Given a table of pairwise conversion rates, a home currency and a bound
//! on the number of trades, the engine enumerates every conversion path that
//! leaves and returns to the home currency and reports the one that ends with
//! the largest amount of home currency.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: currencies, rate tables, trade paths
//! - **graph** — Petgraph view of the rate table, reachability pruning
//! - **search** — Frontier and memoized path search, the engine itself
//! - **report** — Step-by-step breakdown of a search result
//! - **simulation** — Built-in scenarios and random market generation

pub mod core;
pub mod graph;
pub mod report;
pub mod search;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::currency::{CurrencyCode, CurrencyUniverse};
    pub use crate::core::path::{TradePath, TradeStep};
    pub use crate::core::rates::RateTable;
    pub use crate::report::trade_report::TradeReport;
    pub use crate::search::engine::{
        find_optimal_path, PathSearchEngine, SearchConfig, SearchError, SearchResult,
        SearchStrategy,
    };
}

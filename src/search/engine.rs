use crate::core::currency::CurrencyCode;
use crate::core::path::TradePath;
use crate::core::rates::RateTable;
use crate::graph::rate_graph::RateGraph;
use crate::search::frontier::{Expansion, Frontier};
use crate::search::memo::ClosingTable;
use log::{debug, info};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Invalid search parameters. Raised before any work is done.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("currency universe needs at least 2 currencies, got {count}")]
    TooFewCurrencies { count: usize },
    #[error("home currency {0} is not part of the currency universe")]
    UnknownHomeCurrency(CurrencyCode),
    #[error("max trades must be at least 1, got {0}")]
    InvalidMaxTrades(usize),
    #[error("initial amount must be positive, got {0}")]
    InvalidInitialAmount(Decimal),
}

/// Errors arising from a search.
#[derive(Debug, Error, PartialEq)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("frontier for {trades} trades grew to {size} entries, limit is {limit}")]
    FrontierLimitExceeded {
        trades: usize,
        size: usize,
        limit: usize,
    },
    #[error("rate product or final amount overflowed while searching {trades}-trade paths")]
    Overflow { trades: usize },
}

/// Parameters of one search.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
/// use conversion_engine::search::engine::SearchConfig;
/// use rust_decimal_macros::dec;
///
/// let config = SearchConfig::new(CurrencyCode::new("SeaShells"), 5, dec!(500000));
/// assert_eq!(config.max_trades, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Currency the search starts from, returns to, and measures profit in.
    pub home: CurrencyCode,
    /// Inclusive upper bound on the number of trades.
    pub max_trades: usize,
    /// Amount of home currency held before trading.
    pub initial_amount: Decimal,
}

impl SearchConfig {
    pub fn new(home: CurrencyCode, max_trades: usize, initial_amount: Decimal) -> Self {
        Self {
            home,
            max_trades,
            initial_amount,
        }
    }

    /// Check the parameters against the table they will be used with.
    pub fn validate(&self, table: &RateTable) -> Result<(), ConfigError> {
        let count = table.universe().len();
        if count < 2 {
            return Err(ConfigError::TooFewCurrencies { count });
        }
        if !table.universe().contains(&self.home) {
            return Err(ConfigError::UnknownHomeCurrency(self.home.clone()));
        }
        if self.max_trades < 1 {
            return Err(ConfigError::InvalidMaxTrades(self.max_trades));
        }
        if self.initial_amount <= Decimal::ZERO {
            return Err(ConfigError::InvalidInitialAmount(self.initial_amount));
        }
        Ok(())
    }
}

/// Which enumeration the engine runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Level-by-level frontier expansion with a forced close on the last trade.
    #[default]
    Frontier,
    /// Shared `(currency, trades remaining)` table with path reconstruction.
    ///
    /// Successors are compared on rate products built from the home end
    /// backwards. When a product needs more than 28 significant digits and
    /// `Decimal` rounds it, two near-equal paths can compare differently
    /// than they do under `Frontier`, so the chosen path may differ. With
    /// exactly representable products both strategies agree.
    Memoized,
}

impl FromStr for SearchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "frontier" => Ok(SearchStrategy::Frontier),
            "memo" | "memoized" => Ok(SearchStrategy::Memoized),
            other => Err(format!(
                "unknown strategy '{}', expected 'frontier' or 'memo'",
                other
            )),
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchStrategy::Frontier => write!(f, "frontier"),
            SearchStrategy::Memoized => write!(f, "memoized"),
        }
    }
}

/// Resource bounds. All disabled by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Fail instead of growing a frontier past this many entries.
    pub max_frontier: Option<usize>,
}

/// Best closed path of one exact trade count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelOutcome {
    pub trades: usize,
    pub best_path: Option<TradePath>,
    pub best_value: Option<Decimal>,
}

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best closed path, or `[home]` when no trading beats staying put.
    pub best_path: TradePath,
    /// Final amount of home currency produced by `best_path`.
    pub best_value: Decimal,
    pub initial_amount: Decimal,
    /// One entry per trade count in `1..=max_trades`.
    pub levels: Vec<LevelOutcome>,
}

impl SearchResult {
    fn baseline(config: &SearchConfig) -> Self {
        Self {
            best_path: TradePath::new(config.home.clone()),
            best_value: config.initial_amount,
            initial_amount: config.initial_amount,
            levels: Vec::new(),
        }
    }

    pub fn home(&self) -> &CurrencyCode {
        self.best_path.start()
    }

    /// True when no trade beats holding the initial amount.
    pub fn is_baseline(&self) -> bool {
        self.best_path.trade_count() == 0
    }

    pub fn profit(&self) -> Decimal {
        self.best_value - self.initial_amount
    }

    /// Profit relative to the initial amount, in percent.
    pub fn profit_percent(&self) -> f64 {
        if self.initial_amount == Decimal::ZERO {
            return 0.0;
        }
        let pct = self.profit() * Decimal::from(100) / self.initial_amount;
        pct.to_f64().unwrap_or(0.0)
    }
}

/// Exhaustive search for the most profitable closed conversion path.
///
/// Every trade count from 1 to `max_trades` is searched on its own: the
/// frontier starts at `[home]`, moves freely for `t - 1` trades and is then
/// forced back to home on trade `t`. A level's best path replaces the running
/// best only when strictly better, so among equal values the path found
/// first (fewer trades, then canonical currency order) wins.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
/// use conversion_engine::core::rates::RateTable;
/// use conversion_engine::search::engine::{PathSearchEngine, SearchConfig};
/// use rust_decimal_macros::dec;
///
/// let table = RateTable::with_currencies(["A", "B"])
///     .with_rate("A", "B", dec!(2)).unwrap()
///     .with_rate("B", "A", dec!(2)).unwrap();
/// let config = SearchConfig::new(CurrencyCode::new("A"), 2, dec!(100));
///
/// let result = PathSearchEngine::new().search(&table, &config).unwrap();
/// assert_eq!(result.best_path.to_string(), "A -> B -> A");
/// assert_eq!(result.best_value, dec!(400));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSearchEngine {
    strategy: SearchStrategy,
    limits: SearchLimits,
}

impl PathSearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Run the search. Never fails for lack of a profitable path: the
    /// untraded baseline is returned instead.
    pub fn search(
        &self,
        table: &RateTable,
        config: &SearchConfig,
    ) -> Result<SearchResult, SearchError> {
        config.validate(table)?;

        // Only currencies on a cycle through home can appear in a closed path.
        let graph = RateGraph::from_table(table);
        let members = graph.cycle_member_set(&config.home);
        if members.is_empty() {
            info!(
                "{} lies on no closed route, keeping the untraded baseline",
                config.home
            );
            let mut result = SearchResult::baseline(config);
            result.levels = (1..=config.max_trades)
                .map(|trades| LevelOutcome {
                    trades,
                    best_path: None,
                    best_value: None,
                })
                .collect();
            return Ok(result);
        }
        debug!(
            "searching {} of {} currencies, strategy {}, up to {} trades",
            members.len(),
            table.universe().len(),
            self.strategy,
            config.max_trades
        );

        let levels = match self.strategy {
            SearchStrategy::Frontier => self.frontier_levels(table, config, &members)?,
            SearchStrategy::Memoized => memoized_levels(table, config, &members)?,
        };

        let mut result = SearchResult::baseline(config);
        for level in &levels {
            if let (Some(path), Some(value)) = (&level.best_path, level.best_value) {
                if value > result.best_value {
                    info!("new best after {} trades: {} = {}", level.trades, path, value);
                    result.best_path = path.clone();
                    result.best_value = value;
                }
            }
        }
        result.levels = levels;
        Ok(result)
    }

    fn frontier_levels(
        &self,
        table: &RateTable,
        config: &SearchConfig,
        members: &HashSet<CurrencyCode>,
    ) -> Result<Vec<LevelOutcome>, SearchError> {
        let mut levels = Vec::with_capacity(config.max_trades);

        for trades in 1..=config.max_trades {
            let mut frontier = Frontier::seed(config.home.clone());

            for step in 0..trades {
                let expansion = if step == trades - 1 {
                    Expansion::CloseAt(&config.home)
                } else {
                    Expansion::Free
                };
                frontier = frontier
                    .expand(table, expansion, Some(members))
                    .map_err(|_| SearchError::Overflow { trades })?;

                if let Some(limit) = self.limits.max_frontier {
                    if frontier.len() > limit {
                        return Err(SearchError::FrontierLimitExceeded {
                            trades,
                            size: frontier.len(),
                            limit,
                        });
                    }
                }
                if frontier.is_empty() {
                    break;
                }
            }

            debug!("{} trades: {} closed paths", trades, frontier.len());
            let best = frontier
                .best(config.initial_amount)
                .map_err(|_| SearchError::Overflow { trades })?;
            levels.push(LevelOutcome {
                trades,
                best_path: best.map(|(entry, _)| entry.path.clone()),
                best_value: best.map(|(_, value)| value),
            });
        }

        Ok(levels)
    }
}

fn memoized_levels(
    table: &RateTable,
    config: &SearchConfig,
    members: &HashSet<CurrencyCode>,
) -> Result<Vec<LevelOutcome>, SearchError> {
    let closing = ClosingTable::build(table, &config.home, config.max_trades, members).ok_or(
        SearchError::Overflow {
            trades: config.max_trades,
        },
    )?;

    let mut levels = Vec::with_capacity(config.max_trades);
    for trades in 1..=config.max_trades {
        let best_path = closing.path(trades);
        // Valued in path order, the way the frontier values its entries.
        let best_value = match &best_path {
            Some(path) => Some(
                path.final_amount(table, config.initial_amount)
                    .map_err(|_| SearchError::Overflow { trades })?,
            ),
            None => None,
        };
        debug!("{} trades: best {:?}", trades, best_value);
        levels.push(LevelOutcome {
            trades,
            best_path,
            best_value,
        });
    }
    Ok(levels)
}

/// Search with the default engine and return `(best_path, best_value)`.
pub fn find_optimal_path(
    table: &RateTable,
    home: &CurrencyCode,
    max_trades: usize,
    initial_amount: Decimal,
) -> Result<(TradePath, Decimal), SearchError> {
    let config = SearchConfig::new(home.clone(), max_trades, initial_amount);
    let result = PathSearchEngine::new().search(table, &config)?;
    Ok((result.best_path, result.best_value))
}

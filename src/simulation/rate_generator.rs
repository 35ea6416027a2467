//! Random rate tables for stress testing and benchmarks.
//!
//! Generates markets of arbitrary size and density so the search can be
//! exercised well beyond the hand-written scenarios.

use crate::core::currency::CurrencyCode;
use crate::core::rates::{RateError, RateTable};
use log::debug;
use rand::Rng;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors arising when a market cannot be generated.
#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    #[error("pair density must be a number between 0 and 1, got {0}")]
    InvalidDensity(f64),
    #[error(transparent)]
    Rate(#[from] RateError),
}

/// Configuration for generating a random market.
#[derive(Debug, Clone)]
pub struct MarketConfig {
    /// Number of currencies in the universe.
    pub currency_count: usize,
    /// Probability that any ordered pair of distinct currencies is quoted.
    pub pair_density: f64,
    /// Smallest rate generated.
    pub min_rate: Decimal,
    /// Largest rate generated.
    pub max_rate: Decimal,
    /// Decimal places kept on each rate.
    pub rate_scale: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currency_count: 4,
            pair_density: 1.0,
            min_rate: Decimal::new(5, 1),
            max_rate: Decimal::from(2),
            rate_scale: 2,
        }
    }
}

/// Name of the `i`-th generated currency.
pub fn currency_name(i: usize) -> CurrencyCode {
    CurrencyCode::new(format!("CUR-{:02}", i))
}

/// Generate a random market using the thread-local RNG.
pub fn generate_random_market(config: &MarketConfig) -> Result<RateTable, MarketError> {
    generate_random_market_with(&mut rand::thread_rng(), config)
}

/// Generate a random market from a caller-supplied RNG (seed it for repeatable runs).
pub fn generate_random_market_with<R: Rng>(
    rng: &mut R,
    config: &MarketConfig,
) -> Result<RateTable, MarketError> {
    let density = config.pair_density;
    if !(0.0..=1.0).contains(&density) {
        return Err(MarketError::InvalidDensity(density));
    }

    let currencies: Vec<CurrencyCode> = (0..config.currency_count).map(currency_name).collect();
    let mut table = RateTable::with_currencies(currencies.iter().cloned());

    let min = config.min_rate.to_f64().unwrap_or(0.5);
    let max = config.max_rate.to_f64().unwrap_or(2.0);

    for from in &currencies {
        for to in &currencies {
            if from == to || !rng.gen_bool(density) {
                continue;
            }
            let sample = if max > min { rng.gen_range(min..max) } else { min };
            let rate = Decimal::from_f64(sample)
                .unwrap_or(Decimal::ONE)
                .round_dp(config.rate_scale);
            // Non-positive samples stay unquoted.
            if rate > Decimal::ZERO {
                table.set_rate(from.clone(), to.clone(), rate)?;
            }
        }
    }

    debug!(
        "generated market: {} currencies, {} quoted pairs",
        table.universe().len(),
        table.pair_count()
    );
    Ok(table)
}

//! Built-in markets.

use crate::core::currency::CurrencyCode;
use crate::core::rates::{RateError, RateTable};
use crate::search::engine::SearchConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const ISLAND_HOME: &str = "SeaShells";
pub const ISLAND_MAX_TRADES: usize = 5;

/// The island market: four goods traded as money, home is SeaShells.
///
/// Rows are `from`, columns `to`, in canonical order
/// SeaShells, Snowballs, Pizzas, SiliconNuggets.
pub fn island_exchange() -> Result<RateTable, RateError> {
    const CURRENCIES: [&str; 4] = ["SeaShells", "Snowballs", "Pizzas", "SiliconNuggets"];
    let matrix: [[Decimal; 4]; 4] = [
        [dec!(1.0), dec!(1.34), dec!(1.98), dec!(0.64)],
        [dec!(0.72), dec!(1.0), dec!(1.45), dec!(0.52)],
        [dec!(0.48), dec!(0.7), dec!(1.0), dec!(0.31)],
        [dec!(1.49), dec!(1.95), dec!(3.1), dec!(1.0)],
    ];

    let mut table = RateTable::with_currencies(CURRENCIES);
    for (i, from) in CURRENCIES.iter().enumerate() {
        for (j, to) in CURRENCIES.iter().enumerate() {
            table.set_rate(CurrencyCode::new(*from), CurrencyCode::new(*to), matrix[i][j])?;
        }
    }
    Ok(table)
}

/// Default parameters the island market is searched with.
pub fn island_config() -> SearchConfig {
    SearchConfig::new(CurrencyCode::new(ISLAND_HOME), ISLAND_MAX_TRADES, dec!(500000))
}

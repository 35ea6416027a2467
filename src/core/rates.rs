use crate::core::currency::{CurrencyCode, CurrencyUniverse};
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

/// Errors arising from rate table construction.
#[derive(Debug, Error, PartialEq)]
pub enum RateError {
    #[error("conversion rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
}

/// Directed conversion rates between the currencies of a universe.
///
/// One unit of `from` converts to `rate` units of `to`. The table need not
/// be symmetric or complete: a missing pair is an unavailable conversion and
/// reads as a rate of zero. Inverse rates are never inferred.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
/// use conversion_engine::core::rates::RateTable;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let shells = CurrencyCode::new("SeaShells");
/// let pizzas = CurrencyCode::new("Pizzas");
///
/// let mut rates = RateTable::with_currencies([shells.clone(), pizzas.clone()]);
/// rates.set_rate(shells.clone(), pizzas.clone(), dec!(1.98)).unwrap();
///
/// assert_eq!(rates.rate(&shells, &pizzas), dec!(1.98));
/// assert_eq!(rates.rate(&pizzas, &shells), Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    universe: CurrencyUniverse,
    /// Direct rates: (from, to) -> rate.
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl RateTable {
    /// Create an empty table over a fixed universe.
    pub fn new(universe: CurrencyUniverse) -> Self {
        Self {
            universe,
            rates: HashMap::new(),
        }
    }

    /// Create an empty table whose universe is the given currencies, in order.
    pub fn with_currencies<I, C>(currencies: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CurrencyCode>,
    {
        Self::new(currencies.into_iter().collect())
    }

    /// Register a currency that has no rates yet.
    pub fn add_currency(&mut self, currency: CurrencyCode) -> bool {
        self.universe.insert(currency)
    }

    /// Set a direct conversion rate: 1 unit of `from` = `rate` units of `to`.
    ///
    /// Currencies not yet in the universe are appended to it.
    pub fn set_rate(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<(), RateError> {
        if rate <= Decimal::ZERO {
            return Err(RateError::InvalidRate { from, to, rate });
        }
        self.universe.insert(from.clone());
        self.universe.insert(to.clone());
        self.rates.insert((from, to), rate);
        Ok(())
    }

    /// Builder-style [`set_rate`](Self::set_rate).
    pub fn with_rate(
        mut self,
        from: impl Into<CurrencyCode>,
        to: impl Into<CurrencyCode>,
        rate: Decimal,
    ) -> Result<Self, RateError> {
        self.set_rate(from.into(), to.into(), rate)?;
        Ok(self)
    }

    /// The explicitly stored rate, if any.
    pub fn get_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Option<Decimal> {
        self.rates.get(&(from.clone(), to.clone())).copied()
    }

    /// Effective rate: stored value, 1 for an unset self-pair, 0 otherwise.
    pub fn rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Decimal {
        match self.get_rate(from, to) {
            Some(rate) => rate,
            None if from == to => Decimal::ONE,
            None => Decimal::ZERO,
        }
    }

    /// Whether `from -> to` is a real move: distinct currencies and a positive rate.
    pub fn is_tradable(&self, from: &CurrencyCode, to: &CurrencyCode) -> bool {
        from != to && self.rate(from, to) > Decimal::ZERO
    }

    /// Tradable successors of `from`, in canonical order.
    pub fn tradable_from<'a>(
        &'a self,
        from: &'a CurrencyCode,
    ) -> impl Iterator<Item = (&'a CurrencyCode, Decimal)> + 'a {
        self.universe
            .iter()
            .filter(move |to| self.is_tradable(from, to))
            .map(move |to| (to, self.rate(from, to)))
    }

    pub fn universe(&self) -> &CurrencyUniverse {
        &self.universe
    }

    /// Number of stored pairs, self-pairs included.
    pub fn pair_count(&self) -> usize {
        self.rates.len()
    }

    /// All stored pairs as (from, to, rate).
    pub fn pairs(&self) -> Vec<(&CurrencyCode, &CurrencyCode, Decimal)> {
        self.rates
            .iter()
            .map(|((from, to), &rate)| (from, to, rate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    #[test]
    fn test_direct_rate() {
        let mut table = RateTable::with_currencies(["A", "B"]);
        table.set_rate(code("A"), code("B"), dec!(1.45)).unwrap();
        assert_eq!(table.get_rate(&code("A"), &code("B")), Some(dec!(1.45)));
    }

    #[test]
    fn test_inverse_is_not_inferred() {
        let mut table = RateTable::with_currencies(["A", "B"]);
        table.set_rate(code("A"), code("B"), dec!(2)).unwrap();
        assert_eq!(table.get_rate(&code("B"), &code("A")), None);
        assert_eq!(table.rate(&code("B"), &code("A")), Decimal::ZERO);
        assert!(!table.is_tradable(&code("B"), &code("A")));
    }

    #[test]
    fn test_self_pair_defaults_to_one_but_is_not_tradable() {
        let table = RateTable::with_currencies(["A", "B"]);
        assert_eq!(table.rate(&code("A"), &code("A")), Decimal::ONE);
        assert!(!table.is_tradable(&code("A"), &code("A")));
    }

    #[test]
    fn test_invalid_rate() {
        let mut table = RateTable::with_currencies(["A", "B"]);
        assert!(table.set_rate(code("A"), code("B"), dec!(-0.5)).is_err());
        assert!(table.set_rate(code("A"), code("B"), Decimal::ZERO).is_err());
        assert_eq!(table.pair_count(), 0);
    }

    #[test]
    fn test_set_rate_registers_currencies() {
        let mut table = RateTable::with_currencies(["A"]);
        table.set_rate(code("C"), code("B"), dec!(1.1)).unwrap();
        let order: Vec<&str> = table.universe().iter().map(|c| c.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_tradable_from_follows_canonical_order() {
        let table = RateTable::with_currencies(["A", "B", "C", "D"])
            .with_rate("A", "D", dec!(0.5))
            .unwrap()
            .with_rate("A", "B", dec!(1.5))
            .unwrap()
            .with_rate("A", "A", dec!(1))
            .unwrap();

        let from = code("A");
        let successors: Vec<(&str, Decimal)> = table
            .tradable_from(&from)
            .map(|(c, r)| (c.as_str(), r))
            .collect();
        assert_eq!(successors, vec![("B", dec!(1.5)), ("D", dec!(0.5))]);
    }
}

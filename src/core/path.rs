use crate::core::currency::CurrencyCode;
use crate::core::rates::RateTable;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors arising when a path is walked through a rate table.
#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error("no conversion available for {from} -> {to}")]
    UnavailablePair { from: CurrencyCode, to: CurrencyCode },
    #[error("amount overflowed converting {from} -> {to}")]
    Overflow { from: CurrencyCode, to: CurrencyCode },
}

/// An ordered sequence of currencies, one conversion per consecutive pair.
///
/// A path of `k + 1` currencies holds `k` trades. The single-element path
/// `[home]` is the "stay put" baseline.
///
/// # Examples
///
/// ```
/// use conversion_engine::core::currency::CurrencyCode;
/// use conversion_engine::core::path::TradePath;
///
/// let a = CurrencyCode::new("A");
/// let path = TradePath::new(a.clone())
///     .extended(CurrencyCode::new("B"))
///     .extended(a);
///
/// assert_eq!(path.trade_count(), 2);
/// assert!(path.is_closed());
/// assert_eq!(path.to_string(), "A -> B -> A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradePath {
    currencies: Vec<CurrencyCode>,
}

impl TradePath {
    /// A path that has not traded yet.
    pub fn new(start: CurrencyCode) -> Self {
        Self {
            currencies: vec![start],
        }
    }

    /// Build a path from an explicit sequence. Returns `None` when empty.
    pub fn from_currencies(currencies: Vec<CurrencyCode>) -> Option<Self> {
        if currencies.is_empty() {
            None
        } else {
            Some(Self { currencies })
        }
    }

    /// A copy of this path with one more trade into `next`.
    pub fn extended(&self, next: CurrencyCode) -> Self {
        let mut currencies = Vec::with_capacity(self.currencies.len() + 1);
        currencies.extend_from_slice(&self.currencies);
        currencies.push(next);
        Self { currencies }
    }

    pub fn start(&self) -> &CurrencyCode {
        &self.currencies[0]
    }

    pub fn last(&self) -> &CurrencyCode {
        &self.currencies[self.currencies.len() - 1]
    }

    /// Number of conversions (path length minus one).
    pub fn trade_count(&self) -> usize {
        self.currencies.len() - 1
    }

    /// True when the path has traded and is back where it started.
    pub fn is_closed(&self) -> bool {
        self.trade_count() > 0 && self.start() == self.last()
    }

    pub fn currencies(&self) -> &[CurrencyCode] {
        &self.currencies
    }

    /// Walk the path through `table`, converting `initial` one trade at a time.
    ///
    /// Fails with `ReplayError::Overflow` if an amount held along the way is
    /// too large to represent, even when the final amount is not.
    pub fn replay(
        &self,
        table: &RateTable,
        initial: Decimal,
    ) -> Result<Vec<TradeStep>, ReplayError> {
        let mut steps = Vec::with_capacity(self.trade_count());
        let mut amount = initial;
        for pair in self.currencies.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if !table.is_tradable(from, to) {
                return Err(ReplayError::UnavailablePair {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            let rate = table.rate(from, to);
            let amount_out = amount.checked_mul(rate).ok_or_else(|| ReplayError::Overflow {
                from: from.clone(),
                to: to.clone(),
            })?;
            steps.push(TradeStep {
                from: from.clone(),
                to: to.clone(),
                rate,
                amount_in: amount,
                amount_out,
            });
            amount = amount_out;
        }
        Ok(steps)
    }

    /// Product of the path's rates, multiplied in path order.
    pub fn factor(&self, table: &RateTable) -> Result<Decimal, ReplayError> {
        let mut factor = Decimal::ONE;
        for pair in self.currencies.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            if !table.is_tradable(from, to) {
                return Err(ReplayError::UnavailablePair {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            factor = factor
                .checked_mul(table.rate(from, to))
                .ok_or_else(|| ReplayError::Overflow {
                    from: from.clone(),
                    to: to.clone(),
                })?;
        }
        Ok(factor)
    }

    /// Final amount: `initial` times the path's factor.
    ///
    /// Computed the same way the search values a path, so a searched path's
    /// reported value is reproduced exactly.
    pub fn final_amount(&self, table: &RateTable, initial: Decimal) -> Result<Decimal, ReplayError> {
        let factor = self.factor(table)?;
        initial
            .checked_mul(factor)
            .ok_or_else(|| ReplayError::Overflow {
                from: self.start().clone(),
                to: self.last().clone(),
            })
    }
}

impl fmt::Display for TradePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.currencies.iter().map(|c| c.as_str()).collect();
        write!(f, "{}", names.join(" -> "))
    }
}

/// One conversion of a replayed path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStep {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub rate: Decimal,
    pub amount_in: Decimal,
    pub amount_out: Decimal,
}

impl fmt::Display for TradeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2} {} -> {:.2} {} (rate: {})",
            self.amount_in, self.from, self.amount_out, self.to, self.rate
        )
    }
}

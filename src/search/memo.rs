//! Memoized search over `(currency, trades remaining)`.
//!
//! The best way to get home from a currency in exactly `s` trades does not
//! depend on how that currency was reached, so it is computed once per
//! `(currency, s)` and shared by every prefix. Each cell stores the chosen
//! successor next to the factor so the path can be rebuilt.

use crate::core::currency::CurrencyCode;
use crate::core::path::TradePath;
use crate::core::rates::RateTable;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
struct Link {
    factor: Decimal,
    next: CurrencyCode,
}

/// Best multiplicative factor, and first move, for closing at `home` from
/// each currency in an exact number of trades.
#[derive(Debug, Clone)]
pub struct ClosingTable {
    home: CurrencyCode,
    max_trades: usize,
    links: HashMap<(CurrencyCode, usize), Link>,
}

impl ClosingTable {
    /// Fill the table bottom-up for `1..=max_trades` remaining trades.
    ///
    /// Successors are tried in canonical order and only replace the current
    /// choice when strictly better. Currencies outside `allowed` are never
    /// entered. Returns `None` if a factor overflows.
    pub fn build(
        table: &RateTable,
        home: &CurrencyCode,
        max_trades: usize,
        allowed: &HashSet<CurrencyCode>,
    ) -> Option<Self> {
        let mut links: HashMap<(CurrencyCode, usize), Link> = HashMap::new();
        let members: Vec<&CurrencyCode> = table
            .universe()
            .iter()
            .filter(|c| allowed.contains(*c))
            .collect();

        for remaining in 1..=max_trades {
            for &current in &members {
                let mut best: Option<Link> = None;

                if remaining == 1 {
                    if table.is_tradable(current, home) {
                        best = Some(Link {
                            factor: table.rate(current, home),
                            next: home.clone(),
                        });
                    }
                } else {
                    for (next, rate) in table.tradable_from(current) {
                        if !allowed.contains(next) {
                            continue;
                        }
                        let Some(tail) = links.get(&(next.clone(), remaining - 1)) else {
                            continue;
                        };
                        let factor = rate.checked_mul(tail.factor)?;
                        if best.as_ref().map_or(true, |b| factor > b.factor) {
                            best = Some(Link {
                                factor,
                                next: next.clone(),
                            });
                        }
                    }
                }

                if let Some(link) = best {
                    links.insert((current.clone(), remaining), link);
                }
            }
        }

        Some(Self {
            home: home.clone(),
            max_trades,
            links,
        })
    }

    /// Best factor for getting from `from` to home in exactly `trades` trades.
    pub fn factor(&self, from: &CurrencyCode, trades: usize) -> Option<Decimal> {
        self.links
            .get(&(from.clone(), trades))
            .map(|link| link.factor)
    }

    /// Rebuild the best closed path of exactly `trades` trades from home.
    pub fn path(&self, trades: usize) -> Option<TradePath> {
        if trades == 0 || trades > self.max_trades {
            return None;
        }
        let mut path = TradePath::new(self.home.clone());
        for remaining in (1..=trades).rev() {
            let link = self.links.get(&(path.last().clone(), remaining))?;
            path = path.extended(link.next.clone());
        }
        Some(path)
    }
}

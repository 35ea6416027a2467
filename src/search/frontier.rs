use crate::core::currency::CurrencyCode;
use crate::core::path::TradePath;
use crate::core::rates::RateTable;
use rust_decimal::Decimal;
use std::collections::HashSet;
use thiserror::Error;

/// A product of rates, or a rate product times the initial amount, left the
/// representable range.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("rate product overflowed")]
pub struct FactorOverflow;

/// A partial path together with the product of the rates it has used.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontierEntry {
    pub path: TradePath,
    pub factor: Decimal,
}

impl FrontierEntry {
    /// Amount held at the end of this path when starting with `initial`.
    pub fn value(&self, initial: Decimal) -> Result<Decimal, FactorOverflow> {
        initial.checked_mul(self.factor).ok_or(FactorOverflow)
    }
}

/// How a frontier grows by one trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion<'a> {
    /// Any tradable successor other than the current currency.
    Free,
    /// Only the given currency; paths that cannot reach it are dropped.
    CloseAt(&'a CurrencyCode),
}

/// All partial paths reachable after a given number of trades.
///
/// Entries are kept in enumeration order: children of an entry are appended
/// in canonical currency order, and entries are expanded in turn, so the
/// frontier stays ordered lexicographically by path.
///
/// Entries carry rate products only. The initial amount is applied once a
/// path has closed, so a large amount held halfway through a path never
/// fails the search on its own.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    entries: Vec<FrontierEntry>,
}

impl Frontier {
    /// A frontier holding only the untraded path `[home]`.
    pub fn seed(home: CurrencyCode) -> Self {
        Self {
            entries: vec![FrontierEntry {
                path: TradePath::new(home),
                factor: Decimal::ONE,
            }],
        }
    }

    /// Grow every entry by one trade.
    ///
    /// `allowed`, when given, restricts which currencies a free step may move
    /// into.
    pub fn expand(
        &self,
        table: &RateTable,
        step: Expansion<'_>,
        allowed: Option<&HashSet<CurrencyCode>>,
    ) -> Result<Frontier, FactorOverflow> {
        let mut next = Vec::with_capacity(self.entries.len());

        for entry in &self.entries {
            let last = entry.path.last();
            match step {
                Expansion::CloseAt(target) => {
                    if table.is_tradable(last, target) {
                        next.push(FrontierEntry {
                            path: entry.path.extended(target.clone()),
                            factor: entry
                                .factor
                                .checked_mul(table.rate(last, target))
                                .ok_or(FactorOverflow)?,
                        });
                    }
                }
                Expansion::Free => {
                    for (to, rate) in table.tradable_from(last) {
                        if allowed.map_or(false, |set| !set.contains(to)) {
                            continue;
                        }
                        next.push(FrontierEntry {
                            path: entry.path.extended(to.clone()),
                            factor: entry.factor.checked_mul(rate).ok_or(FactorOverflow)?,
                        });
                    }
                }
            }
        }

        Ok(Frontier { entries: next })
    }

    /// The first entry holding the maximum value for `initial`, with that value.
    pub fn best(
        &self,
        initial: Decimal,
    ) -> Result<Option<(&FrontierEntry, Decimal)>, FactorOverflow> {
        let mut best: Option<(&FrontierEntry, Decimal)> = None;
        for entry in &self.entries {
            let value = entry.value(initial)?;
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((entry, value)),
            }
        }
        Ok(best)
    }

    pub fn entries(&self) -> &[FrontierEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s)
    }

    fn full_table() -> RateTable {
        let mut table = RateTable::with_currencies(["A", "B", "C"]);
        for from in ["A", "B", "C"] {
            for to in ["A", "B", "C"] {
                let rate = if from == to { dec!(1) } else { dec!(2) };
                table.set_rate(code(from), code(to), rate).unwrap();
            }
        }
        table
    }

    #[test]
    fn test_free_expansion_skips_self() {
        let frontier = Frontier::seed(code("A"));
        let next = frontier.expand(&full_table(), Expansion::Free, None).unwrap();
        let paths: Vec<String> = next.entries().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(paths, vec!["A -> B", "A -> C"]);
    }

    #[test]
    fn test_entries_stay_in_enumeration_order() {
        let table = full_table();
        let next = Frontier::seed(code("A"))
            .expand(&table, Expansion::Free, None)
            .unwrap()
            .expand(&table, Expansion::Free, None)
            .unwrap();
        let paths: Vec<String> = next.entries().iter().map(|e| e.path.to_string()).collect();
        assert_eq!(
            paths,
            vec!["A -> B -> A", "A -> B -> C", "A -> C -> A", "A -> C -> B"]
        );
    }

    #[test]
    fn test_close_expansion_drops_unclosable() {
        let table = RateTable::with_currencies(["A", "B", "C"])
            .with_rate("A", "B", dec!(2))
            .unwrap()
            .with_rate("A", "C", dec!(3))
            .unwrap()
            .with_rate("B", "A", dec!(0.5))
            .unwrap();
        let home = code("A");
        let closed = Frontier::seed(home.clone())
            .expand(&table, Expansion::Free, None)
            .unwrap()
            .expand(&table, Expansion::CloseAt(&home), None)
            .unwrap();

        assert_eq!(closed.len(), 1);
        assert_eq!(closed.entries()[0].path.to_string(), "A -> B -> A");
        assert_eq!(closed.entries()[0].factor, dec!(1));
        assert_eq!(closed.entries()[0].value(dec!(10)).unwrap(), dec!(10));
    }

    #[test]
    fn test_allowed_set_filters_free_steps() {
        let allowed: HashSet<CurrencyCode> = [code("A"), code("C")].into_iter().collect();
        let next = Frontier::seed(code("A"))
            .expand(&full_table(), Expansion::Free, Some(&allowed))
            .unwrap();
        assert_eq!(next.len(), 1);
        assert_eq!(next.entries()[0].path.last(), &code("C"));
    }

    #[test]
    fn test_best_prefers_first_of_equals() {
        let table = full_table();
        let home = code("A");
        let closed = Frontier::seed(home.clone())
            .expand(&table, Expansion::Free, None)
            .unwrap()
            .expand(&table, Expansion::CloseAt(&home), None)
            .unwrap();
        let (best, value) = closed.best(dec!(1)).unwrap().unwrap();
        assert_eq!(value, dec!(4));
        assert_eq!(best.path.to_string(), "A -> B -> A");
    }

    #[test]
    fn test_rate_product_overflow_is_reported() {
        let table = RateTable::with_currencies(["A", "B", "C"])
            .with_rate("A", "B", Decimal::MAX)
            .unwrap()
            .with_rate("B", "C", dec!(2))
            .unwrap();
        let first = Frontier::seed(code("A"))
            .expand(&table, Expansion::Free, None)
            .unwrap();
        assert_eq!(first.expand(&table, Expansion::Free, None).unwrap_err(), FactorOverflow);
    }

    #[test]
    fn test_large_intermediate_amount_is_not_an_overflow() {
        // Holding B would take 10^30 units, more than a Decimal can store,
        // but the round trip only returns the starting amount.
        let table = RateTable::with_currencies(["A", "B"])
            .with_rate("A", "B", dec!(100000000000000000000))
            .unwrap()
            .with_rate("B", "A", dec!(0.00000000000000000001))
            .unwrap();
        let home = code("A");
        let closed = Frontier::seed(home.clone())
            .expand(&table, Expansion::Free, None)
            .unwrap()
            .expand(&table, Expansion::CloseAt(&home), None)
            .unwrap();
        let (_, value) = closed.best(dec!(10000000000)).unwrap().unwrap();
        assert_eq!(value, dec!(10000000000));
    }

    #[test]
    fn test_final_amount_overflow_is_reported() {
        let table = RateTable::with_currencies(["A", "B"])
            .with_rate("A", "B", dec!(100000000000000000000))
            .unwrap()
            .with_rate("B", "A", dec!(100))
            .unwrap();
        let home = code("A");
        let closed = Frontier::seed(home.clone())
            .expand(&table, Expansion::Free, None)
            .unwrap()
            .expand(&table, Expansion::CloseAt(&home), None)
            .unwrap();
        assert_eq!(closed.best(dec!(10000000000)), Err(FactorOverflow));
    }

    #[test]
    fn test_empty_frontier_has_no_best() {
        assert_eq!(Frontier::default().best(dec!(1)), Ok(None));
    }
}

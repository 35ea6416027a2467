use crate::core::currency::CurrencyCode;
use crate::core::path::{ReplayError, TradePath, TradeStep};
use crate::core::rates::RateTable;
use crate::search::engine::{LevelOutcome, SearchResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Human-facing breakdown of a search result.
///
/// Every intermediate amount is recomputed by replaying the best path through
/// the rate table. Unless `Decimal` had to round along the way, the last step
/// lands on the reported final amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeReport {
    pub home: CurrencyCode,
    pub initial_amount: Decimal,
    pub final_amount: Decimal,
    pub profit: Decimal,
    pub profit_percent: f64,
    pub path: TradePath,
    pub steps: Vec<TradeStep>,
    pub levels: Vec<LevelOutcome>,
}

impl TradeReport {
    pub fn from_result(result: &SearchResult, table: &RateTable) -> Result<Self, ReplayError> {
        let steps = result.best_path.replay(table, result.initial_amount)?;
        Ok(TradeReport {
            home: result.home().clone(),
            initial_amount: result.initial_amount,
            final_amount: result.best_value,
            profit: result.profit(),
            profit_percent: result.profit_percent(),
            path: result.best_path.clone(),
            steps,
            levels: result.levels.clone(),
        })
    }

    /// Amount after the last replayed step, or the initial amount if none.
    pub fn replayed_amount(&self) -> Decimal {
        self.steps
            .last()
            .map(|step| step.amount_out)
            .unwrap_or(self.initial_amount)
    }
}

impl std::fmt::Display for TradeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Optimal Trading Path ===")?;
        writeln!(f, "Initial amount: {} {}", self.initial_amount, self.home)?;
        writeln!(f, "Path:           {}", self.path)?;
        writeln!(f, "Final amount:   {:.2} {}", self.final_amount, self.home)?;
        writeln!(
            f,
            "Profit:         {:.2} {} ({:.2}%)",
            self.profit, self.home, self.profit_percent
        )?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo trade beats holding {}.", self.home)?;
        } else {
            writeln!(f, "\nStep-by-step trades:")?;
            for (i, step) in self.steps.iter().enumerate() {
                writeln!(f, "  Trade {}: {}", i + 1, step)?;
            }
        }

        if !self.levels.is_empty() {
            writeln!(f, "\nBest by trade count:")?;
            for level in &self.levels {
                match (&level.best_path, level.best_value) {
                    (Some(path), Some(value)) => {
                        writeln!(f, "  {} trades: {:.2} via {}", level.trades, value, path)?
                    }
                    _ => writeln!(f, "  {} trades: no closed path", level.trades)?,
                }
            }
        }
        Ok(())
    }
}

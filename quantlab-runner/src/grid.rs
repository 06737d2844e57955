//! Crossover parameter grid search.
//!
//! Enumerates (short, long) window pairs, runs the shared portfolio
//! pipeline for each, and ranks surviving pairs by Sharpe. Pairs that
//! barely trade, or whose Sharpe is undefined (zero volatility), are
//! excluded before ranking so NaN never enters an ordering decision.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::panel::Panel;

use crate::runner::{run_crossover_portfolio, RunError};

// ─── Grid definition ─────────────────────────────────────────────────

/// Candidate short/long moving-average windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub short_windows: Vec<usize>,
    pub long_windows: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            short_windows: vec![10, 15, 20, 30, 40, 50],
            long_windows: vec![60, 80, 100, 120, 150, 200],
        }
    }
}

impl ParamGrid {
    /// All `(short, long)` pairs with `short < long`, in grid order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::with_capacity(self.short_windows.len() * self.long_windows.len());
        for &s in &self.short_windows {
            for &l in &self.long_windows {
                if s < l {
                    out.push((s, l));
                }
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.pairs().is_empty()
    }
}

// ─── Results ─────────────────────────────────────────────────────────

/// One evaluated grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRecord {
    pub short_w: usize,
    pub long_w: usize,
    pub sharpe: f64,
    pub mean_ann: f64,
    pub vol_ann: f64,
    pub max_drawdown: f64,
    pub trades: f64,
}

/// Errors from grid search.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("parameter grid contains no valid (short, long) pairs")]
    EmptyGrid,
    #[error(transparent)]
    Run(#[from] RunError),
}

// ─── Search ──────────────────────────────────────────────────────────

/// Evaluate every grid pair over `prices` and return survivors ranked.
///
/// Ranking: Sharpe descending, then annualized mean descending, then
/// `(short, long)` ascending. The final key makes the ordering total, so
/// identical inputs produce identical tables regardless of thread count.
pub fn grid_search(
    prices: &Panel,
    grid: &ParamGrid,
    cost_per_trade: f64,
    min_trades: f64,
) -> Result<Vec<GridRecord>, GridError> {
    let pairs = grid.pairs();
    if pairs.is_empty() {
        return Err(GridError::EmptyGrid);
    }

    let evaluated: Result<Vec<Option<GridRecord>>, RunError> = pairs
        .par_iter()
        .map(|&(short_w, long_w)| {
            let run = run_crossover_portfolio(prices, short_w, long_w, cost_per_trade)?;
            if run.trade_count < min_trades {
                return Ok(None);
            }
            let m = run.metrics();
            let sharpe = match m.sharpe {
                Some(s) => s,
                None => return Ok(None),
            };
            Ok(Some(GridRecord {
                short_w,
                long_w,
                sharpe,
                mean_ann: m.mean_ann,
                vol_ann: m.vol_ann,
                max_drawdown: m.max_drawdown,
                trades: run.trade_count,
            }))
        })
        .collect();

    let mut records: Vec<GridRecord> = evaluated?.into_iter().flatten().collect();
    records.sort_by(|a, b| {
        b.sharpe
            .partial_cmp(&a.sharpe)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(
                b.mean_ann
                    .partial_cmp(&a.mean_ann)
                    .unwrap_or(std::cmp::Ordering::Equal),
            )
            .then((a.short_w, a.long_w).cmp(&(b.short_w, b.long_w)))
    });
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn wavy_panel(n: usize) -> Panel {
        let dates = (0..n)
            .map(|i| NaiveDate::from_ymd_opt(2020, 1, 2).unwrap() + chrono::Days::new(i as u64))
            .collect();
        let prices: Vec<f64> = (0..n)
            .map(|i| 100.0 * 1.001f64.powi(i as i32) * (1.0 + 0.1 * (i as f64 / 20.0).sin()))
            .collect();
        Panel::new(dates, vec![("SPY".into(), prices)]).unwrap()
    }

    #[test]
    fn pairs_skip_degenerate_orderings() {
        let grid = ParamGrid {
            short_windows: vec![10, 60, 100],
            long_windows: vec![60, 100],
        };
        let pairs = grid.pairs();
        assert_eq!(pairs, vec![(10, 60), (10, 100), (60, 100)]);
    }

    #[test]
    fn default_grid_is_full_cartesian() {
        // Every default short is below every default long.
        assert_eq!(ParamGrid::default().pairs().len(), 36);
    }

    #[test]
    fn empty_grid_is_an_error() {
        let grid = ParamGrid {
            short_windows: vec![100],
            long_windows: vec![50],
        };
        assert!(matches!(
            grid_search(&wavy_panel(300), &grid, 0.0005, 0.0),
            Err(GridError::EmptyGrid)
        ));
    }

    #[test]
    fn records_are_ranked_by_sharpe() {
        let prices = wavy_panel(500);
        let grid = ParamGrid {
            short_windows: vec![5, 10, 20],
            long_windows: vec![40, 60],
        };
        let records = grid_search(&prices, &grid, 0.0005, 0.0).unwrap();
        assert!(!records.is_empty());
        for pair in records.windows(2) {
            assert!(pair[0].sharpe >= pair[1].sharpe);
        }
    }

    #[test]
    fn min_trades_filters_static_pairs() {
        // Constant prices: the crossover never fires, so every pair trades
        // zero times and the filter removes them all.
        let dates = (0..300)
            .map(|i| NaiveDate::from_ymd_opt(2020, 1, 2).unwrap() + chrono::Days::new(i as u64))
            .collect();
        let prices = Panel::new(dates, vec![("SPY".into(), vec![100.0; 300])]).unwrap();
        let records = grid_search(&prices, &ParamGrid::default(), 0.0005, 3.0).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn search_is_deterministic() {
        let prices = wavy_panel(400);
        let grid = ParamGrid::default();
        let a = grid_search(&prices, &grid, 0.0005, 3.0).unwrap();
        let b = grid_search(&prices, &grid, 0.0005, 3.0).unwrap();
        assert_eq!(a, b);
    }
}

//! Walk-forward parameter selection with expanding training windows.
//!
//! For each trade year: train the grid search on every row strictly before
//! the year, pick the top-ranked pair, and apply it to that year only. The
//! per-year out-of-sample segments are stitched into one `"Portfolio"`
//! series; duplicate boundary dates keep the earlier segment's value.
//!
//! Years are skipped, not failed, when they are too thin to judge:
//! - fewer than `min_test_rows` test rows, or
//! - no grid pair survives the activity/Sharpe filters on the training set.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use quantlab_core::panel::{Panel, Series, PORTFOLIO};
use quantlab_core::perf::Metrics;

use crate::grid::{grid_search, GridError, ParamGrid};
use crate::runner::{run_crossover_portfolio, RunError};

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for the walk-forward optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardConfig {
    /// First calendar year traded out-of-sample.
    pub first_trade_year: i32,
    /// Last calendar year traded out-of-sample (inclusive).
    pub last_trade_year: i32,
    /// Minimum rows a test year needs to be traded (default 50).
    pub min_test_rows: usize,
    /// Minimum training-set trade count for a grid pair (default 3).
    pub min_trades: f64,
    /// Per-trade cost applied in both training and test runs.
    pub cost_per_trade: f64,
}

impl Default for WalkForwardConfig {
    fn default() -> Self {
        Self {
            first_trade_year: 2016,
            last_trade_year: 2024,
            min_test_rows: 50,
            min_trades: 3.0,
            cost_per_trade: 0.0005,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Parameter choice made for one traded year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkForwardChoice {
    pub trade_year: i32,
    /// Last calendar year included in the training window.
    pub train_end_year: i32,
    pub short_w: usize,
    pub long_w: usize,
    /// In-sample Sharpe of the chosen pair.
    pub train_sharpe: f64,
    /// Trades the chosen pair generated in the test year.
    pub test_trades: f64,
}

/// Complete walk-forward output: per-year choices plus the stitched
/// out-of-sample return series and its metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkForwardReport {
    pub choices: Vec<WalkForwardChoice>,
    pub returns: Series,
    pub metrics: Metrics,
}

/// Errors from walk-forward orchestration.
#[derive(Debug, Error)]
pub enum WalkForwardError {
    #[error("first trade year {first} is after last trade year {last}")]
    InvalidYearRange { first: i32, last: i32 },
    #[error("no tradable years between {first} and {last}")]
    NoViableYears { first: i32, last: i32 },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Run(#[from] RunError),
}

// ─── Orchestration ───────────────────────────────────────────────────

/// Run the walk-forward optimizer over a price panel.
///
/// Every traded row is out-of-sample: the pair applied to year `y` was
/// selected using only rows dated `y-1` or earlier.
pub fn run_walk_forward(
    prices: &Panel,
    grid: &ParamGrid,
    config: &WalkForwardConfig,
) -> Result<WalkForwardReport, WalkForwardError> {
    if config.first_trade_year > config.last_trade_year {
        return Err(WalkForwardError::InvalidYearRange {
            first: config.first_trade_year,
            last: config.last_trade_year,
        });
    }

    let mut choices = Vec::new();
    let mut segments = Vec::new();

    for trade_year in config.first_trade_year..=config.last_trade_year {
        let test = prices.year(trade_year);
        if test.num_rows() < config.min_test_rows {
            debug!(
                trade_year,
                test_rows = test.num_rows(),
                min = config.min_test_rows,
                "skipping thin test year"
            );
            continue;
        }

        let train_end_year = trade_year - 1;
        let train = prices.up_to_year(train_end_year);
        let ranked = grid_search(&train, grid, config.cost_per_trade, config.min_trades)?;
        let best = match ranked.first() {
            Some(record) => record.clone(),
            None => {
                warn!(trade_year, "no grid pair survived training filters");
                continue;
            }
        };

        let oos = run_crossover_portfolio(&test, best.short_w, best.long_w, config.cost_per_trade)?;
        info!(
            trade_year,
            short_w = best.short_w,
            long_w = best.long_w,
            train_sharpe = best.sharpe,
            test_trades = oos.trade_count,
            "walk-forward year complete"
        );

        choices.push(WalkForwardChoice {
            trade_year,
            train_end_year,
            short_w: best.short_w,
            long_w: best.long_w,
            train_sharpe: best.sharpe,
            test_trades: oos.trade_count,
        });
        segments.push(oos.returns);
    }

    if segments.is_empty() {
        return Err(WalkForwardError::NoViableYears {
            first: config.first_trade_year,
            last: config.last_trade_year,
        });
    }

    let returns = Series::stitch(PORTFOLIO, &segments);
    let metrics = Metrics::from_series(&returns);
    Ok(WalkForwardReport {
        choices,
        returns,
        metrics,
    })
}

//! Single-strategy portfolio runner.
//!
//! One entry point shared by grid search and the walk-forward optimizer:
//! prices → crossover signal → next-day positions → cost-adjusted returns →
//! equal-weight `"Portfolio"` series. Also provides the buy-and-hold
//! benchmark and benchmark/strategy equity alignment.

use chrono::NaiveDate;
use thiserror::Error;

use quantlab_core::backtest::{
    apply_transaction_costs, asset_returns, portfolio_mean, positions_from_signals,
    strategy_returns, trade_count,
};
use quantlab_core::panel::{Panel, PanelError, Series};
use quantlab_core::perf::{equity_series, Metrics};
use quantlab_core::signals::{Crossover, SignalError};

/// Errors from running a single strategy over a panel.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("asset '{0}' not present in panel")]
    UnknownAsset(String),
}

/// Output of one crossover portfolio run.
#[derive(Debug, Clone)]
pub struct PortfolioRun {
    /// Daily cost-adjusted portfolio returns.
    pub returns: Series,
    /// Total absolute position change summed over assets and days.
    pub trade_count: f64,
}

impl PortfolioRun {
    pub fn metrics(&self) -> Metrics {
        Metrics::from_series(&self.returns)
    }
}

/// Run the crossover strategy on every asset and average into a portfolio.
///
/// This is the unit of work the grid search and walk-forward optimizer
/// repeat; everything downstream of the signal is the same pipeline the
/// blended strategies use.
pub fn run_crossover_portfolio(
    prices: &Panel,
    short_w: usize,
    long_w: usize,
    cost_per_trade: f64,
) -> Result<PortfolioRun, RunError> {
    let signals = Crossover::new(short_w, long_w)?.generate(prices)?;
    let positions = positions_from_signals(&signals);
    let gross = strategy_returns(prices, &positions)?;
    let net = apply_transaction_costs(&gross, &positions, cost_per_trade)?;
    Ok(PortfolioRun {
        returns: portfolio_mean(&net),
        trade_count: trade_count(&positions),
    })
}

/// Buy-and-hold return series for a single asset.
///
/// The benchmark holds from the first bar, so its return stream is just the
/// asset's simple returns. Named `BuyHold_{asset}` for export.
pub fn buy_and_hold(prices: &Panel, asset: &str) -> Result<Series, RunError> {
    let rets = asset_returns(prices);
    let column = rets
        .column(asset)
        .ok_or_else(|| RunError::UnknownAsset(asset.to_string()))?;
    Ok(Series::new(
        format!("BuyHold_{asset}"),
        rets.dates().to_vec(),
        column.to_vec(),
    ))
}

/// Reindex a benchmark equity curve onto a strategy timeline.
///
/// For each strategy date, takes the latest benchmark value at or before
/// that date; dates before the benchmark starts hold the initial equity.
/// Strategy and benchmark timelines can differ when the out-of-sample
/// stitch drops thin years.
pub fn align_equity(benchmark: &Series, timeline: &[NaiveDate], start: f64) -> Series {
    let mut values = Vec::with_capacity(timeline.len());
    let mut idx = 0usize;
    let mut last = start;
    for &date in timeline {
        while idx < benchmark.len() && benchmark.dates()[idx] <= date {
            last = benchmark.values()[idx];
            idx += 1;
        }
        values.push(last);
    }
    Series::new(benchmark.name(), timeline.to_vec(), values)
}

/// Benchmark equity on the strategy's own date axis.
pub fn benchmark_equity_on(
    prices: &Panel,
    asset: &str,
    timeline: &[NaiveDate],
) -> Result<Series, RunError> {
    let bench = buy_and_hold(prices, asset)?;
    let equity = equity_series(&bench, 1.0);
    Ok(align_equity(&equity, timeline, 1.0))
}

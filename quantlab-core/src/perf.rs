//! Performance metrics and equity curves — pure functions over return series.
//!
//! Annualization assumes 252 trading days. Sharpe is reported at a zero
//! risk-free rate and is `None` (never infinite) when volatility is zero,
//! so rankings and averages downstream stay well-defined.

use serde::{Deserialize, Serialize};

use crate::panel::Series;

/// Trading days per year used for annualization.
pub const TRADING_DAYS: usize = 252;

/// Annualized risk/return summary for one return stream.
///
/// Derived and stateless: recomputed on demand, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Daily mean × 252.
    pub mean_ann: f64,
    /// Daily sample std × √252.
    pub vol_ann: f64,
    /// `mean_ann / vol_ann`; `None` when `vol_ann` is 0.
    pub sharpe: Option<f64>,
    /// Most negative peak-to-trough equity ratio minus one (≤ 0).
    pub max_drawdown: f64,
    pub min_daily: f64,
    pub max_daily: f64,
}

impl Metrics {
    /// Compute the full record from daily returns.
    pub fn compute(returns: &[f64]) -> Self {
        let mean_ann = mean(returns) * TRADING_DAYS as f64;
        let vol_ann = std_dev(returns) * (TRADING_DAYS as f64).sqrt();
        let sharpe = (vol_ann > 0.0).then(|| mean_ann / vol_ann);

        let equity = equity_curve(returns, 1.0);
        let max_drawdown = max_drawdown(&equity);

        let min_daily = returns.iter().copied().fold(f64::INFINITY, f64::min);
        let max_daily = returns.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Self {
            mean_ann,
            vol_ann,
            sharpe,
            max_drawdown,
            min_daily: if min_daily.is_finite() { min_daily } else { 0.0 },
            max_daily: if max_daily.is_finite() { max_daily } else { 0.0 },
        }
    }

    pub fn from_series(returns: &Series) -> Self {
        Self::compute(returns.values())
    }
}

/// Compounding equity curve: `start × Π (1 + r)`.
pub fn equity_curve(returns: &[f64], start: f64) -> Vec<f64> {
    let mut equity = Vec::with_capacity(returns.len());
    let mut acc = start;
    for r in returns {
        acc *= 1.0 + r;
        equity.push(acc);
    }
    equity
}

/// Equity curve as a series, preserving the date axis and name.
pub fn equity_series(returns: &Series, start: f64) -> Series {
    Series::new(
        returns.name(),
        returns.dates().to_vec(),
        equity_curve(returns.values(), start),
    )
}

/// Annualized Sharpe at zero risk-free rate; `None` when vol is zero.
///
/// Shared between the metrics record and the bootstrap tester so both rank
/// with the same formula.
pub fn sharpe(returns: &[f64]) -> Option<f64> {
    let vol_ann = std_dev(returns) * (TRADING_DAYS as f64).sqrt();
    (vol_ann > 0.0).then(|| mean(returns) * TRADING_DAYS as f64 / vol_ann)
}

/// Max drawdown: min over time of `equity / running_max − 1`.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut max_dd = 0.0f64;
    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = eq / peak - 1.0;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1).
fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

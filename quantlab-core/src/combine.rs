//! Strategy legs and fixed-weight blending.
//!
//! A leg is a complete pipeline from prices to a cost-adjusted
//! `"Portfolio"` return series. `combine` blends legs with fixed
//! configuration weights; nothing here re-optimizes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::backtest::{
    apply_transaction_costs, apply_turnover_costs, asset_returns, portfolio_mean, portfolio_sum,
    positions_from_signals, strategy_returns,
};
use crate::panel::{Panel, PanelError, Series, PORTFOLIO};
use crate::rolling::WindowError;
use crate::signals::{Crossover, CsMomentum, MeanReversion, SignalError};
use crate::vol_target::vol_target_weights;

/// Errors from leg construction and blending.
#[derive(Debug, Error)]
pub enum CombineError {
    #[error(transparent)]
    Signal(#[from] SignalError),
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("combine needs one weight per leg: {legs} legs, {weights} weights")]
    WeightCount { legs: usize, weights: usize },
    #[error("legs cover different timelines: {left} rows vs {right} rows")]
    LegMismatch { left: usize, right: usize },
}

/// Parameters for the trend + mean-reversion two-leg blend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendParams {
    pub trend_short_w: usize,
    pub trend_long_w: usize,
    pub mr_window: usize,
    pub mr_entry_z: f64,
    pub w_trend: f64,
    pub w_mr: f64,
    pub cost_per_trade: f64,
    pub target_ann_vol: f64,
    pub vol_window: usize,
    pub leverage_cap: f64,
}

impl Default for BlendParams {
    fn default() -> Self {
        Self {
            trend_short_w: 20,
            trend_long_w: 100,
            mr_window: 20,
            mr_entry_z: 1.0,
            w_trend: 0.6,
            w_mr: 0.4,
            cost_per_trade: 0.0005,
            target_ann_vol: 0.12,
            vol_window: 20,
            leverage_cap: 2.0,
        }
    }
}

/// Blend portfolio legs with fixed weights: `Σ weight_i × leg_i`.
///
/// Weights are configuration constants and need not sum to 1. All legs must
/// share one timeline.
pub fn combine(legs: &[Series], weights: &[f64]) -> Result<Series, CombineError> {
    if legs.len() != weights.len() {
        return Err(CombineError::WeightCount {
            legs: legs.len(),
            weights: weights.len(),
        });
    }
    let first = match legs.first() {
        Some(s) => s,
        None => return Ok(Series::new(PORTFOLIO, Vec::new(), Vec::new())),
    };
    for leg in &legs[1..] {
        if leg.len() != first.len() {
            return Err(CombineError::LegMismatch {
                left: first.len(),
                right: leg.len(),
            });
        }
    }

    let mut values = vec![0.0; first.len()];
    for (leg, w) in legs.iter().zip(weights) {
        for (t, v) in leg.values().iter().enumerate() {
            values[t] += w * v;
        }
    }
    Ok(Series::new(PORTFOLIO, first.dates().to_vec(), values))
}

/// Trend + mean-reversion blend over one price panel.
///
/// Per leg: signal → next-day position → gross return → per-trade cost →
/// vol-target weight (lagged a step, like every other weight panel) →
/// equal-weight average across assets. The two legs then blend by the
/// configured weights.
pub fn combine_strategies(prices: &Panel, params: &BlendParams) -> Result<Series, CombineError> {
    let trend_sig = Crossover::new(params.trend_short_w, params.trend_long_w)?.generate(prices)?;
    let mr_sig = MeanReversion::new(params.mr_window, params.mr_entry_z)?.generate(prices)?;

    let trend_leg = vol_targeted_leg(prices, &trend_sig, params)?;
    let mr_leg = vol_targeted_leg(prices, &mr_sig, params)?;

    combine(&[trend_leg, mr_leg], &[params.w_trend, params.w_mr])
}

fn vol_targeted_leg(
    prices: &Panel,
    signals: &Panel,
    params: &BlendParams,
) -> Result<Series, CombineError> {
    let positions = positions_from_signals(signals);
    let gross = strategy_returns(prices, &positions)?;
    let net = apply_transaction_costs(&gross, &positions, params.cost_per_trade)?;
    let weights = vol_target_weights(
        &net,
        params.target_ann_vol,
        params.vol_window,
        params.leverage_cap,
    )?
    .lag_with_fill(0.0);
    let scaled = net.elementwise_mul(&weights)?;
    Ok(portfolio_mean(&scaled))
}

/// Parameters for the cross-sectional momentum leg.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsMomentumParams {
    pub lookback_days: usize,
    pub skip_days: usize,
    pub top_n: usize,
    pub bottom_n: usize,
    pub cost_per_unit_turnover: f64,
}

impl Default for CsMomentumParams {
    fn default() -> Self {
        Self {
            lookback_days: 126,
            skip_days: 21,
            top_n: 2,
            bottom_n: 2,
            cost_per_unit_turnover: 0.0005,
        }
    }
}

/// Cross-sectional momentum over one price panel.
///
/// Monthly ranked weights, lagged a day, applied to simple returns, summed
/// across assets, then charged for the weight turnover they generate.
pub fn run_cs_momentum(prices: &Panel, params: &CsMomentumParams) -> Result<Series, CombineError> {
    let generator = CsMomentum::new(
        params.lookback_days,
        params.skip_days,
        params.top_n,
        params.bottom_n,
    )?;
    let weights = generator.weights(prices).lag_with_fill(0.0);
    let rets = asset_returns(prices);
    let gross = portfolio_sum(&weights.elementwise_mul(&rets)?);
    Ok(apply_turnover_costs(
        &gross,
        &weights,
        params.cost_per_unit_turnover,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn panel(cols: Vec<(&str, Vec<f64>)>) -> Panel {
        let n = cols[0].1.len();
        let dates = (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(i as u64)
            })
            .collect();
        Panel::new(
            dates,
            cols.into_iter().map(|(a, v)| (a.into(), v)).collect(),
        )
        .unwrap()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| {
                NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(i as u64)
            })
            .collect()
    }

    #[test]
    fn combine_is_weighted_sum() {
        let a = Series::new(PORTFOLIO, dates(2), vec![0.01, 0.02]);
        let b = Series::new(PORTFOLIO, dates(2), vec![0.03, -0.01]);
        let out = combine(&[a, b], &[0.5, 2.0]).unwrap();
        assert!((out.values()[0] - (0.005 + 0.06)).abs() < 1e-12);
        assert!((out.values()[1] - (0.01 - 0.02)).abs() < 1e-12);
    }

    #[test]
    fn combine_rejects_weight_mismatch() {
        let a = Series::new(PORTFOLIO, dates(1), vec![0.01]);
        assert!(matches!(
            combine(&[a], &[0.5, 0.5]).unwrap_err(),
            CombineError::WeightCount { .. }
        ));
    }

    #[test]
    fn combine_rejects_ragged_legs() {
        let a = Series::new(PORTFOLIO, dates(2), vec![0.01, 0.02]);
        let b = Series::new(PORTFOLIO, dates(1), vec![0.03]);
        assert!(matches!(
            combine(&[a, b], &[1.0, 1.0]).unwrap_err(),
            CombineError::LegMismatch { .. }
        ));
    }

    #[test]
    fn blend_on_flat_prices_is_identically_zero() {
        let p = panel(vec![("A", vec![100.0; 160]), ("B", vec![50.0; 160])]);
        let out = combine_strategies(&p, &BlendParams::default()).unwrap();
        assert_eq!(out.name(), PORTFOLIO);
        assert_eq!(out.len(), 160);
        assert!(out.values().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn blend_rejects_bad_windows() {
        let p = panel(vec![("A", vec![100.0; 160])]);
        let params = BlendParams {
            trend_short_w: 100,
            trend_long_w: 20,
            ..Default::default()
        };
        assert!(combine_strategies(&p, &params).is_err());
    }

    #[test]
    fn cs_momentum_runs_and_charges_turnover() {
        let n = 300;
        let mut cols = Vec::new();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            let drift = 1.0 + (i as f64 - 1.5) * 0.001;
            let series: Vec<f64> = (0..n).map(|t| 100.0 * drift.powi(t as i32)).collect();
            cols.push((*name, series));
        }
        let p = panel(cols);
        let params = CsMomentumParams {
            lookback_days: 60,
            skip_days: 5,
            top_n: 1,
            bottom_n: 1,
            cost_per_unit_turnover: 0.0005,
        };
        let out = run_cs_momentum(&p, &params).unwrap();
        assert_eq!(out.len(), n);
        // Warm-up months trade nothing and pay nothing.
        assert_eq!(out.values()[0], 0.0);
        // Once ranked, long the strongest drift and short the weakest:
        // that spread is positive on this panel.
        let tail_sum: f64 = out.values()[n - 30..].iter().sum();
        assert!(tail_sum > 0.0);
    }
}

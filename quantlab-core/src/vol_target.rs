//! Per-asset volatility targeting.
//!
//! Rescales each asset's return stream so its trailing realized volatility
//! matches an annualized target. Weight at `t` is the target daily vol over
//! the rolling std of returns, clipped into `[0, leverage_cap]`; cells where
//! the rolling std is undefined or zero get weight 0.

use crate::panel::Panel;
use crate::perf::TRADING_DAYS;
use crate::rolling::{rolling_std, WindowError};

/// Leverage ceiling applied to raw vol-target weights.
pub const DEFAULT_LEVERAGE_CAP: f64 = 2.0;

/// Unlagged vol-target weight panel for a return panel.
///
/// The caller lags the result one step before applying it, the same
/// treatment every other signal/weight panel gets.
pub fn vol_target_weights(
    returns: &Panel,
    target_ann_vol: f64,
    window: usize,
    leverage_cap: f64,
) -> Result<Panel, WindowError> {
    if window == 0 {
        return Err(WindowError::NonPositive(window));
    }
    let target_daily = target_ann_vol / (TRADING_DAYS as f64).sqrt();
    Ok(returns.map_columns(|series| {
        // Window validated above; per-column recompute cannot fail.
        let vol = rolling_std(series, window).unwrap_or_else(|_| vec![f64::NAN; series.len()]);
        vol.iter()
            .map(|&v| {
                if v.is_nan() || v <= 0.0 {
                    0.0
                } else {
                    (target_daily / v).clamp(0.0, leverage_cap)
                }
            })
            .collect()
    }))
}

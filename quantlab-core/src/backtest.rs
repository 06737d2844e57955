//! Position translation, returns, and transaction costs.
//!
//! The chain is: signal panel → lag one step (positions) → multiply against
//! same-day simple returns → subtract costs proportional to position or
//! weight change → collapse across assets into a `"Portfolio"` series.
//! Every function here is pure; panels go in, new panels come out.

use crate::panel::{lag_series, Panel, PanelError, Series, PORTFOLIO};

/// Translate signals into positions by lagging one step.
///
/// This is the lookahead guard: `position[t]` is a function of
/// `signal[t-1]` and earlier only. The first step is flat. Apply exactly
/// once per signal/weight panel.
pub fn positions_from_signals(signals: &Panel) -> Panel {
    signals.lag_with_fill(0.0)
}

/// Per-asset simple returns: `price[t] / price[t-1] − 1`.
///
/// The first row is 0, and any return touching a missing price resolves to
/// 0: a missing bar earns nothing rather than poisoning the stream.
pub fn asset_returns(prices: &Panel) -> Panel {
    prices.map_columns(|series| {
        let mut out = Vec::with_capacity(series.len());
        if !series.is_empty() {
            out.push(0.0);
        }
        for pair in series.windows(2) {
            let r = pair[1] / pair[0] - 1.0;
            out.push(if r.is_finite() { r } else { 0.0 });
        }
        out
    })
}

/// Per-asset natural-log returns, `ln(1 + r)`.
pub fn log_returns(prices: &Panel) -> Panel {
    asset_returns(prices).map_columns(|series| series.iter().map(|r| r.ln_1p()).collect())
}

/// Strategy returns: positions ⊙ asset returns.
pub fn strategy_returns(prices: &Panel, positions: &Panel) -> Result<Panel, PanelError> {
    positions.elementwise_mul(&asset_returns(prices))
}

/// Deduct per-trade costs from a strategy return panel.
///
/// `trade[t] = |position[t] − position[t-1]|` (first row 0);
/// `cost[t] = trade[t] × cost_per_trade`. Costs are non-negative and zero on
/// days the position is unchanged.
pub fn apply_transaction_costs(
    returns: &Panel,
    positions: &Panel,
    cost_per_trade: f64,
) -> Result<Panel, PanelError> {
    let trades = position_changes(positions);
    let costs = trades.map_columns(|series| series.iter().map(|t| t * cost_per_trade).collect());
    let mut columns = Vec::with_capacity(returns.num_assets());
    for ((_, r), (_, c)) in returns.iter_columns().zip(costs.iter_columns()) {
        if r.len() != c.len() {
            return Err(PanelError::ShapeMismatch {
                left_rows: returns.num_rows(),
                left_cols: returns.num_assets(),
                right_rows: costs.num_rows(),
                right_cols: costs.num_assets(),
            });
        }
        columns.push(r.iter().zip(c).map(|(x, y)| x - y).collect());
    }
    Ok(Panel::from_parts(
        returns.dates().to_vec(),
        returns.assets().to_vec(),
        columns,
    ))
}

/// Absolute position change per asset per day (first row 0).
pub fn position_changes(positions: &Panel) -> Panel {
    positions.map_columns(|series| {
        let prev = lag_series(series, 0.0);
        series
            .iter()
            .zip(&prev)
            .enumerate()
            // Row 0 has no predecessor; it is flat by definition, not a trade.
            .map(|(i, (cur, prev))| if i == 0 { 0.0 } else { (cur - prev).abs() })
            .collect()
    })
}

/// Total absolute position change across all assets and days.
///
/// The walk-forward optimizer's minimum-activity filter reads this number:
/// a pair that almost never trades can look artificially smooth in-sample.
pub fn trade_count(positions: &Panel) -> f64 {
    position_changes(positions)
        .iter_columns()
        .map(|(_, series)| series.iter().sum::<f64>())
        .sum()
}

/// Cross-asset turnover per day: `Σ_assets |w[t] − w[t-1]|`.
pub fn daily_turnover(weights: &Panel) -> Vec<f64> {
    let changes = position_changes(weights);
    let n = weights.num_rows();
    let mut turnover = vec![0.0; n];
    for (_, series) in changes.iter_columns() {
        for (t, v) in series.iter().enumerate() {
            turnover[t] += v;
        }
    }
    turnover
}

/// Deduct turnover-proportional costs from a portfolio return series.
///
/// Used by cross-sectional legs, where cost scales with the total weight
/// shifted at a rebalance rather than with per-asset round trips.
pub fn apply_turnover_costs(
    portfolio: &Series,
    weights: &Panel,
    cost_per_unit_turnover: f64,
) -> Series {
    let turnover = daily_turnover(weights);
    let values = portfolio
        .values()
        .iter()
        .zip(&turnover)
        .map(|(r, t)| r - t * cost_per_unit_turnover)
        .collect();
    Series::new(portfolio.name(), portfolio.dates().to_vec(), values)
}

/// Equal-weight average across assets into a single `"Portfolio"` series.
pub fn portfolio_mean(returns: &Panel) -> Series {
    let n_assets = returns.num_assets() as f64;
    let mut values = vec![0.0; returns.num_rows()];
    for (_, series) in returns.iter_columns() {
        for (t, v) in series.iter().enumerate() {
            values[t] += v / n_assets;
        }
    }
    Series::new(PORTFOLIO, returns.dates().to_vec(), values)
}

/// Sum weighted per-asset returns into a single `"Portfolio"` series.
///
/// The cross-sectional leg uses this: weights already encode ±1/n sizing,
/// so rows sum rather than average.
pub fn portfolio_sum(returns: &Panel) -> Series {
    let mut values = vec![0.0; returns.num_rows()];
    for (_, series) in returns.iter_columns() {
        for (t, v) in series.iter().enumerate() {
            values[t] += v;
        }
    }
    Series::new(PORTFOLIO, returns.dates().to_vec(), values)
}

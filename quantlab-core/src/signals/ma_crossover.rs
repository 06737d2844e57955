//! Moving-average crossover signal.
//!
//! Long (1.0) while the short rolling mean sits above the long rolling mean,
//! cash (0.0) otherwise. Warm-up rows, where either mean is still NaN,
//! resolve to cash.

use super::SignalError;
use crate::panel::Panel;
use crate::rolling::rolling_mean;

/// Trend-following crossover generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossover {
    short_w: usize,
    long_w: usize,
}

impl Crossover {
    /// Windows must satisfy `0 < short_w < long_w`.
    pub fn new(short_w: usize, long_w: usize) -> Result<Self, SignalError> {
        if short_w == 0 {
            return Err(crate::rolling::WindowError::NonPositive(short_w).into());
        }
        if short_w >= long_w {
            return Err(SignalError::WindowOrder {
                short: short_w,
                long: long_w,
            });
        }
        Ok(Self { short_w, long_w })
    }

    pub fn short_window(&self) -> usize {
        self.short_w
    }

    pub fn long_window(&self) -> usize {
        self.long_w
    }

    /// Per-asset 0/1 signal panel.
    pub fn generate(&self, prices: &Panel) -> Result<Panel, SignalError> {
        let mut columns = Vec::with_capacity(prices.num_assets());
        for (_, series) in prices.iter_columns() {
            let short = rolling_mean(series, self.short_w)?;
            let long = rolling_mean(series, self.long_w)?;
            let signal = short
                .iter()
                .zip(&long)
                // NaN > NaN is false, so warm-up rows fall through to 0.
                .map(|(s, l)| if s > l { 1.0 } else { 0.0 })
                .collect();
            columns.push(signal);
        }
        Ok(Panel::from_parts(
            prices.dates().to_vec(),
            prices.assets().to_vec(),
            columns,
        ))
    }
}

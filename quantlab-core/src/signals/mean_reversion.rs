//! Mean-reversion signal.
//!
//! Long (1.0) when the rolling z-score of price drops below `-entry_z`
//! (oversold, expecting a rebound), cash (0.0) otherwise. Long/flat only:
//! the symmetric short entry at `z > +entry_z` is intentionally not taken.

use super::SignalError;
use crate::panel::Panel;
use crate::rolling::zscore;

/// Rolling z-score oversold-entry generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeanReversion {
    window: usize,
    entry_z: f64,
}

impl MeanReversion {
    pub fn new(window: usize, entry_z: f64) -> Result<Self, SignalError> {
        if window == 0 {
            return Err(crate::rolling::WindowError::NonPositive(window).into());
        }
        Ok(Self { window, entry_z })
    }

    /// Per-asset 0/1 signal panel.
    pub fn generate(&self, prices: &Panel) -> Result<Panel, SignalError> {
        let mut columns = Vec::with_capacity(prices.num_assets());
        for (_, series) in prices.iter_columns() {
            let z = zscore(series, self.window)?;
            let signal = z
                .iter()
                // NaN z-scores (warm-up, zero dispersion) compare false → cash.
                .map(|&z| if z < -self.entry_z { 1.0 } else { 0.0 })
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn panel(values: Vec<f64>) -> Panel {
        let dates = (0..values.len())
            .map(|i| {
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(i as u64)
            })
            .collect();
        Panel::new(dates, vec![("SPY".into(), values)]).unwrap()
    }

    #[test]
    fn rejects_zero_window() {
        assert!(MeanReversion::new(0, 1.0).is_err());
    }

    #[test]
    fn dip_below_band_goes_long() {
        // Stable prices, then a sharp drop: z-score dives negative.
        let mut values = vec![100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 100.0];
        values.push(80.0);
        let p = panel(values);
        let sig = MeanReversion::new(5, 1.0).unwrap().generate(&p).unwrap();
        let col = sig.column("SPY").unwrap();
        assert_eq!(*col.last().unwrap(), 1.0);
    }

    #[test]
    fn spike_above_band_stays_flat() {
        // Long/flat policy: overbought does not open a short.
        let mut values = vec![100.0, 101.0, 100.0, 101.0, 100.0, 101.0, 100.0];
        values.push(130.0);
        let p = panel(values);
        let sig = MeanReversion::new(5, 1.0).unwrap().generate(&p).unwrap();
        let col = sig.column("SPY").unwrap();
        assert_eq!(*col.last().unwrap(), 0.0);
    }

    #[test]
    fn constant_prices_stay_flat() {
        // Zero dispersion → NaN z-score → cash, not a division blow-up.
        let p = panel(vec![50.0; 40]);
        let sig = MeanReversion::new(10, 1.0).unwrap().generate(&p).unwrap();
        assert!(sig.column("SPY").unwrap().iter().all(|v| *v == 0.0));
    }
}

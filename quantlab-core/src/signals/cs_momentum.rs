//! Cross-sectional momentum weights.
//!
//! Momentum score at `t` is the return from `t - skip - lookback` to
//! `t - skip`; the skip window sidesteps short-term reversal. On the first
//! trading day of each calendar month, assets are ranked by that day's
//! scores: the top `top_n` become equal-weight longs (+1/top_n), the bottom
//! `bottom_n` equal-weight shorts (−1/bottom_n), everything else flat. The
//! weight vector is held for every trading day of the month.
//!
//! The panel returned here is unlagged; the backtest applies
//! `lag_with_fill(0.0)` once before weights meet same-day returns.

use chrono::Datelike;

use super::SignalError;
use crate::panel::Panel;

/// Monthly-rebalanced long/short ranking generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsMomentum {
    lookback_days: usize,
    skip_days: usize,
    top_n: usize,
    bottom_n: usize,
}

impl CsMomentum {
    pub fn new(
        lookback_days: usize,
        skip_days: usize,
        top_n: usize,
        bottom_n: usize,
    ) -> Result<Self, SignalError> {
        if lookback_days == 0 {
            return Err(SignalError::ZeroLookback);
        }
        if top_n == 0 || bottom_n == 0 {
            return Err(SignalError::EmptyBuckets { top_n, bottom_n });
        }
        Ok(Self {
            lookback_days,
            skip_days,
            top_n,
            bottom_n,
        })
    }

    /// Per-asset momentum scores: lagged-price ratio minus one.
    ///
    /// NaN until both lagged prices exist.
    pub fn scores(&self, prices: &Panel) -> Panel {
        prices.map_columns(|series| {
            let near = shift_nan(series, self.skip_days);
            let far = shift_nan(series, self.skip_days + self.lookback_days);
            near.iter().zip(&far).map(|(n, f)| n / f - 1.0).collect()
        })
    }

    /// Unlagged monthly weight panel.
    ///
    /// A month whose rebalance day has fewer than `top_n + bottom_n`
    /// non-missing scores is skipped: every asset holds weight 0 for that
    /// month. Score ties rank by column order, so the output is
    /// deterministic.
    pub fn weights(&self, prices: &Panel) -> Panel {
        let scores = self.scores(prices);
        let n_assets = prices.num_assets();
        let n_rows = prices.num_rows();
        let mut columns = vec![vec![0.0; n_rows]; n_assets];

        for (start, end) in month_spans(prices) {
            // Rebalance on the month's first trading day.
            let mut ranked: Vec<(usize, f64)> = scores
                .iter_columns()
                .enumerate()
                .filter_map(|(col, (_, series))| {
                    let s = series[start];
                    (!s.is_nan()).then_some((col, s))
                })
                .collect();
            if ranked.len() < self.top_n + self.bottom_n {
                continue;
            }
            ranked.sort_by(|a, b| {
                b.1.partial_cmp(&a.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.0.cmp(&b.0))
            });

            let long_w = 1.0 / self.top_n as f64;
            let short_w = -1.0 / self.bottom_n as f64;
            for &(col, _) in &ranked[..self.top_n] {
                for row in start..end {
                    columns[col][row] = long_w;
                }
            }
            for &(col, _) in &ranked[ranked.len() - self.bottom_n..] {
                for row in start..end {
                    columns[col][row] = short_w;
                }
            }
        }

        Panel::from_parts(prices.dates().to_vec(), prices.assets().to_vec(), columns)
    }
}

/// Row spans `[start, end)` of consecutive dates sharing a calendar month.
fn month_spans(panel: &Panel) -> Vec<(usize, usize)> {
    let dates = panel.dates();
    let mut spans = Vec::new();
    let mut start = 0;
    for i in 1..=dates.len() {
        let boundary = i == dates.len()
            || (dates[i].year(), dates[i].month()) != (dates[start].year(), dates[start].month());
        if boundary {
            spans.push((start, i));
            start = i;
        }
    }
    if dates.is_empty() {
        spans.clear();
    }
    spans
}

/// Shift a series down by `k` rows, filling the leading gap with NaN.
fn shift_nan(values: &[f64], k: usize) -> Vec<f64> {
    let n = values.len();
    let k = k.min(n);
    let mut out = vec![f64::NAN; n];
    out[k..].copy_from_slice(&values[..n - k]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Two months of weekday-ish dates starting 2024-01-01.
    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| d("2024-01-01") + chrono::Days::new(i as u64))
            .collect()
    }

    fn panel(cols: Vec<(&str, Vec<f64>)>) -> Panel {
        let n = cols[0].1.len();
        Panel::new(
            dates(n),
            cols.into_iter().map(|(a, v)| (a.into(), v)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_degenerate_params() {
        assert!(CsMomentum::new(0, 5, 1, 1).is_err());
        assert!(CsMomentum::new(10, 5, 0, 1).is_err());
        assert!(CsMomentum::new(10, 5, 1, 0).is_err());
    }

    #[test]
    fn shift_nan_basic() {
        let out = shift_nan(&[1.0, 2.0, 3.0], 2);
        assert!(out[0].is_nan() && out[1].is_nan());
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn scores_are_lagged_price_ratio() {
        let p = panel(vec![("A", vec![100.0, 110.0, 121.0, 133.1, 146.41])]);
        let gen = CsMomentum::new(2, 1, 1, 1).unwrap();
        let s = gen.scores(&p);
        let col = s.column("A").unwrap();
        // score[3] = price[2]/price[0] − 1 = 0.21
        assert!((col[3] - 0.21).abs() < 1e-9);
        assert!(col[2].is_nan());
    }

    #[test]
    fn month_spans_split_on_calendar_month() {
        let ds = vec![d("2024-01-30"), d("2024-01-31"), d("2024-02-01"), d("2024-02-02")];
        let p = Panel::new(ds, vec![("A".into(), vec![1.0; 4])]).unwrap();
        assert_eq!(month_spans(&p), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn winners_long_losers_short_held_all_month() {
        // 40 days so the second month has fully warmed-up scores.
        let n = 40;
        let up: Vec<f64> = (0..n).map(|i| 100.0 * 1.01f64.powi(i as i32)).collect();
        let down: Vec<f64> = (0..n).map(|i| 100.0 * 0.99f64.powi(i as i32)).collect();
        let flat = vec![100.0; n];
        let p = panel(vec![("UP", up), ("DOWN", down), ("FLAT", flat)]);

        let w = CsMomentum::new(10, 2, 1, 1).unwrap().weights(&p);
        // February rows start at index 31 (Jan 1..31 = 31 days).
        let feb = 31..n;
        for row in feb {
            assert_eq!(w.column("UP").unwrap()[row], 1.0);
            assert_eq!(w.column("DOWN").unwrap()[row], -1.0);
            assert_eq!(w.column("FLAT").unwrap()[row], 0.0);
        }
    }

    #[test]
    fn thin_month_is_skipped_not_an_error() {
        // Five assets, but only three have scores on the rebalance day:
        // need top 2 + bottom 2 = 4, so the whole month stays flat.
        let n = 40;
        let mut cols = Vec::new();
        for (i, name) in ["A", "B", "C"].iter().enumerate() {
            let series: Vec<f64> = (0..n).map(|t| 100.0 + (i + t) as f64).collect();
            cols.push((*name, series));
        }
        // D and E have no history early on: NaN until late in the sample.
        for name in ["D", "E"] {
            let mut series = vec![f64::NAN; n];
            series[n - 1] = 100.0;
            cols.push((name, series));
        }
        let p = panel(cols);

        let w = CsMomentum::new(10, 2, 2, 2).unwrap().weights(&p);
        for (_, series) in w.iter_columns() {
            assert!(series.iter().all(|v| *v == 0.0));
        }
    }
}

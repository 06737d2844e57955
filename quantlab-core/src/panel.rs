//! Price/signal/position panels and portfolio series.
//!
//! A `Panel` is a time-ordered table: one strictly increasing date axis and
//! one `f64` column per asset. Missing cells are strict NaN; tradable price
//! data is never forward-filled. Panels are value-like: each pipeline stage
//! produces a new panel and never mutates its input.
//!
//! `lag_with_fill` is the single shift-by-one primitive. Every signal and
//! weight panel passes through it exactly once before it meets same-day
//! returns; that one choke point is what enforces the no-lookahead invariant.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column name carried by every portfolio-level return/equity series.
pub const PORTFOLIO: &str = "Portfolio";

/// Errors from panel construction and shape checks.
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("panel has no asset columns")]
    EmptyAssets,
    #[error("dates must be strictly increasing (violation at row {row})")]
    UnorderedDates { row: usize },
    #[error("column '{asset}' has {got} rows, expected {expected}")]
    LengthMismatch {
        asset: String,
        expected: usize,
        got: usize,
    },
    #[error("column '{asset}' contains no usable values")]
    AllMissing { asset: String },
    #[error("panel shapes differ: {left_rows}x{left_cols} vs {right_rows}x{right_cols}")]
    ShapeMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
}

/// A date-indexed table with one column per asset.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    assets: Vec<String>,
    /// Column-major: `columns[i]` is the full time series for `assets[i]`.
    columns: Vec<Vec<f64>>,
}

impl Panel {
    /// Build a panel from a date axis and named columns.
    ///
    /// Fails fast on shape violations: empty asset list, non-increasing
    /// dates, ragged columns, or a column with no usable (non-NaN) value.
    /// The last case is an upstream data error; nothing downstream can
    /// compute from a wholly-missing asset.
    pub fn new(
        dates: Vec<NaiveDate>,
        named_columns: Vec<(String, Vec<f64>)>,
    ) -> Result<Self, PanelError> {
        if named_columns.is_empty() {
            return Err(PanelError::EmptyAssets);
        }
        for (row, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(PanelError::UnorderedDates { row: row + 1 });
            }
        }

        let mut assets = Vec::with_capacity(named_columns.len());
        let mut columns = Vec::with_capacity(named_columns.len());
        for (asset, values) in named_columns {
            if values.len() != dates.len() {
                return Err(PanelError::LengthMismatch {
                    asset,
                    expected: dates.len(),
                    got: values.len(),
                });
            }
            if !dates.is_empty() && values.iter().all(|v| v.is_nan()) {
                return Err(PanelError::AllMissing { asset });
            }
            assets.push(asset);
            columns.push(values);
        }

        Ok(Self {
            dates,
            assets,
            columns,
        })
    }

    /// Internal constructor for panels derived from an already-validated
    /// parent. Derived panels (signals, positions, weights) may legitimately
    /// hold all-zero or all-NaN columns.
    pub(crate) fn from_parts(
        dates: Vec<NaiveDate>,
        assets: Vec<String>,
        columns: Vec<Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(assets.len(), columns.len());
        debug_assert!(columns.iter().all(|c| c.len() == dates.len()));
        Self {
            dates,
            assets,
            columns,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    pub fn num_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn num_assets(&self) -> usize {
        self.assets.len()
    }

    /// Time series for one asset, if present.
    pub fn column(&self, asset: &str) -> Option<&[f64]> {
        self.assets
            .iter()
            .position(|a| a == asset)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(asset, series)` pairs in column order.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.assets
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Apply a length-preserving transform to every column.
    pub fn map_columns<F>(&self, f: F) -> Panel
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let columns: Vec<Vec<f64>> = self
            .columns
            .iter()
            .map(|c| {
                let out = f(c);
                debug_assert_eq!(out.len(), c.len());
                out
            })
            .collect();
        Panel::from_parts(self.dates.clone(), self.assets.clone(), columns)
    }

    /// Shift every column down one row; row 0 becomes `fill`.
    ///
    /// After the shift, row `t` holds the value observed at `t-1`, so a
    /// lagged panel multiplied against same-day returns can only act on
    /// information that existed before the bar opened.
    pub fn lag_with_fill(&self, fill: f64) -> Panel {
        self.map_columns(|c| lag_series(c, fill))
    }

    /// Same-shape panel filled with a constant.
    pub fn constant_like(&self, value: f64) -> Panel {
        self.map_columns(|c| vec![value; c.len()])
    }

    /// Elementwise product of two same-shape panels.
    pub fn elementwise_mul(&self, other: &Panel) -> Result<Panel, PanelError> {
        self.check_shape(other)?;
        let columns = self
            .columns
            .iter()
            .zip(&other.columns)
            .map(|(a, b)| a.iter().zip(b).map(|(x, y)| x * y).collect())
            .collect();
        Ok(Panel::from_parts(
            self.dates.clone(),
            self.assets.clone(),
            columns,
        ))
    }

    /// Rows whose calendar year is at or before `year` (expanding training
    /// window). May be empty.
    pub fn up_to_year(&self, year: i32) -> Panel {
        let end = self.dates.partition_point(|d| d.year() <= year);
        self.slice_rows(0, end)
    }

    /// Rows falling inside one calendar year (walk-forward test window).
    pub fn year(&self, year: i32) -> Panel {
        let start = self.dates.partition_point(|d| d.year() < year);
        let end = self.dates.partition_point(|d| d.year() <= year);
        self.slice_rows(start, end)
    }

    /// Copy a clamped row range `[start, end)`.
    pub fn slice_rows(&self, start: usize, end: usize) -> Panel {
        let end = end.min(self.dates.len());
        let start = start.min(end);
        let dates = self.dates[start..end].to_vec();
        let columns = self
            .columns
            .iter()
            .map(|c| c[start..end].to_vec())
            .collect();
        Panel::from_parts(dates, self.assets.clone(), columns)
    }

    fn check_shape(&self, other: &Panel) -> Result<(), PanelError> {
        if self.dates.len() != other.dates.len() || self.assets.len() != other.assets.len() {
            return Err(PanelError::ShapeMismatch {
                left_rows: self.dates.len(),
                left_cols: self.assets.len(),
                right_rows: other.dates.len(),
                right_cols: other.assets.len(),
            });
        }
        Ok(())
    }
}

/// Shift one series down a row, filling the leading gap.
pub fn lag_series(values: &[f64], fill: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(values.len());
    out.push(fill);
    out.extend_from_slice(&values[..values.len() - 1]);
    out
}

/// A named single column on its own date axis.
///
/// Portfolio return and equity streams travel as `Series` once the
/// per-asset dimension has been collapsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl Series {
    pub fn new(name: impl Into<String>, dates: Vec<NaiveDate>, values: Vec<f64>) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        Self {
            name: name.into(),
            dates,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn rename(mut self, name: impl Into<String>) -> Series {
        self.name = name.into();
        self
    }

    /// Iterate `(date, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Concatenate date-stamped segments into one chronological series.
    ///
    /// Rows are sorted by date across segments. When two segments produce
    /// the same date (a stitching boundary), the value from the
    /// earlier-supplied segment wins; later duplicates are dropped. This
    /// keep-first rule is deliberate policy, not an accident of ordering.
    pub fn stitch(name: impl Into<String>, segments: &[Series]) -> Series {
        let mut rows: Vec<(NaiveDate, usize, f64)> = Vec::new();
        for (seg_idx, seg) in segments.iter().enumerate() {
            for (date, value) in seg.iter() {
                rows.push((date, seg_idx, value));
            }
        }
        rows.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut dates = Vec::with_capacity(rows.len());
        let mut values = Vec::with_capacity(rows.len());
        for (date, _, value) in rows {
            if dates.last() == Some(&date) {
                continue;
            }
            dates.push(date);
            values.push(value);
        }
        Series::new(name, dates, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        (0..n)
            .map(|i| d("2024-01-01") + chrono::Days::new(i as u64))
            .collect()
    }

    #[test]
    fn new_accepts_valid_panel() {
        let p = Panel::new(
            dates(3),
            vec![
                ("SPY".into(), vec![100.0, 101.0, 102.0]),
                ("QQQ".into(), vec![200.0, f64::NAN, 202.0]),
            ],
        )
        .unwrap();
        assert_eq!(p.num_rows(), 3);
        assert_eq!(p.num_assets(), 2);
        assert_eq!(p.column("SPY").unwrap()[2], 102.0);
        assert!(p.column("QQQ").unwrap()[1].is_nan());
    }

    #[test]
    fn new_rejects_empty_assets() {
        let err = Panel::new(dates(3), vec![]).unwrap_err();
        assert!(matches!(err, PanelError::EmptyAssets));
    }

    #[test]
    fn new_rejects_duplicate_dates() {
        let mut ds = dates(3);
        ds[2] = ds[1];
        let err = Panel::new(ds, vec![("SPY".into(), vec![1.0, 2.0, 3.0])]).unwrap_err();
        assert!(matches!(err, PanelError::UnorderedDates { row: 2 }));
    }

    #[test]
    fn new_rejects_ragged_columns() {
        let err = Panel::new(dates(3), vec![("SPY".into(), vec![1.0, 2.0])]).unwrap_err();
        assert!(matches!(err, PanelError::LengthMismatch { .. }));
    }

    #[test]
    fn new_rejects_all_nan_column() {
        let err = Panel::new(dates(2), vec![("SPY".into(), vec![f64::NAN, f64::NAN])]).unwrap_err();
        assert!(matches!(err, PanelError::AllMissing { .. }));
    }

    #[test]
    fn lag_shifts_and_fills() {
        let p = Panel::new(dates(3), vec![("SPY".into(), vec![1.0, 2.0, 3.0])]).unwrap();
        let lagged = p.lag_with_fill(0.0);
        assert_eq!(lagged.column("SPY").unwrap(), &[0.0, 1.0, 2.0]);
    }

    #[test]
    fn lag_series_empty() {
        assert!(lag_series(&[], 0.0).is_empty());
    }

    #[test]
    fn elementwise_mul_checks_shape() {
        let a = Panel::new(dates(2), vec![("SPY".into(), vec![1.0, 2.0])]).unwrap();
        let b = Panel::new(dates(3), vec![("SPY".into(), vec![1.0, 2.0, 3.0])]).unwrap();
        assert!(a.elementwise_mul(&b).is_err());

        let c = Panel::new(dates(2), vec![("SPY".into(), vec![3.0, 4.0])]).unwrap();
        let prod = a.elementwise_mul(&c).unwrap();
        assert_eq!(prod.column("SPY").unwrap(), &[3.0, 8.0]);
    }

    #[test]
    fn year_slicing() {
        let ds = vec![
            d("2022-12-30"),
            d("2023-01-03"),
            d("2023-06-01"),
            d("2024-01-02"),
        ];
        let p = Panel::new(ds, vec![("SPY".into(), vec![1.0, 2.0, 3.0, 4.0])]).unwrap();

        let train = p.up_to_year(2022);
        assert_eq!(train.num_rows(), 1);
        assert_eq!(train.column("SPY").unwrap(), &[1.0]);

        let test = p.year(2023);
        assert_eq!(test.num_rows(), 2);
        assert_eq!(test.column("SPY").unwrap(), &[2.0, 3.0]);

        assert_eq!(p.year(2021).num_rows(), 0);
    }

    #[test]
    fn slice_rows_clamps() {
        let p = Panel::new(dates(3), vec![("SPY".into(), vec![1.0, 2.0, 3.0])]).unwrap();
        let s = p.slice_rows(1, 100);
        assert_eq!(s.num_rows(), 2);
        assert_eq!(s.column("SPY").unwrap(), &[2.0, 3.0]);
    }

    #[test]
    fn stitch_sorts_and_keeps_first_on_duplicates() {
        let a = Series::new("a", vec![d("2023-01-02"), d("2023-01-03")], vec![0.1, 0.2]);
        let b = Series::new("b", vec![d("2023-01-03"), d("2023-01-04")], vec![0.9, 0.3]);
        let out = Series::stitch(PORTFOLIO, &[a, b]);

        assert_eq!(out.name(), PORTFOLIO);
        assert_eq!(out.len(), 3);
        // Boundary date 2023-01-03 keeps segment a's value.
        assert_eq!(out.values(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn stitch_out_of_order_segments() {
        let later = Series::new("b", vec![d("2024-01-02")], vec![0.5]);
        let earlier = Series::new("a", vec![d("2023-01-02")], vec![0.1]);
        let out = Series::stitch(PORTFOLIO, &[later, earlier]);
        assert_eq!(out.dates(), &[d("2023-01-02"), d("2024-01-02")]);
        assert_eq!(out.values(), &[0.1, 0.5]);
    }
}

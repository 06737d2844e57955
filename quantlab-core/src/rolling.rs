//! Rolling window statistics.
//!
//! Rolling mean, sample standard deviation, and z-score over a fixed
//! lookback. Cells without a full window of history are NaN, as is any cell
//! whose window contains a NaN input; callers treat NaN as "no signal", not
//! as an error.

use thiserror::Error;

/// Invalid rolling-window parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window must be positive, got {0}")]
    NonPositive(usize),
}

/// Rolling mean over `window` observations.
///
/// Output has the same length as the input; indices `0..window-1` are NaN.
pub fn rolling_mean(values: &[f64], window: usize) -> Result<Vec<f64>, WindowError> {
    if window == 0 {
        return Err(WindowError::NonPositive(window));
    }
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < window {
        return Ok(out);
    }

    for i in (window - 1)..n {
        let win = &values[i + 1 - window..=i];
        if win.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = win.iter().sum::<f64>() / window as f64;
    }
    Ok(out)
}

/// Rolling sample standard deviation (ddof = 1) over `window` observations.
///
/// A window of 1 has no degrees of freedom and yields NaN throughout.
pub fn rolling_std(values: &[f64], window: usize) -> Result<Vec<f64>, WindowError> {
    if window == 0 {
        return Err(WindowError::NonPositive(window));
    }
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n < window || window < 2 {
        return Ok(out);
    }

    for i in (window - 1)..n {
        let win = &values[i + 1 - window..=i];
        if win.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = win.iter().sum::<f64>() / window as f64;
        let var = win.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = var.sqrt();
    }
    Ok(out)
}

/// Rolling z-score: (x − rolling mean) / rolling std.
///
/// NaN during warm-up and wherever the rolling std is zero or undefined.
pub fn zscore(values: &[f64], window: usize) -> Result<Vec<f64>, WindowError> {
    let mean = rolling_mean(values, window)?;
    let std = rolling_std(values, window)?;
    Ok(values
        .iter()
        .zip(mean.iter().zip(std.iter()))
        .map(|(&x, (&m, &s))| {
            if s.is_nan() || s == 0.0 {
                f64::NAN
            } else {
                (x - m) / s
            }
        })
        .collect())
}

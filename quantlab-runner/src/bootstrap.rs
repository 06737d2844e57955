//! Bootstrap robustness tester for a realized return series.
//!
//! Resamples the daily returns n-of-n with replacement and recomputes the
//! annualized Sharpe for each draw, placing the actual Sharpe inside the
//! resampled distribution. Draws whose volatility collapses to zero have no
//! defined Sharpe and are discarded rather than counted.
//!
//! Each trial seeds its own `StdRng` from a BLAKE3-derived sub-seed, so the
//! distribution is a function of `(series, seed)` alone; rayon's thread
//! scheduling cannot change it.

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::panel::Series;
use quantlab_core::perf;
use quantlab_core::rng::SeedSequence;

// ─── Configuration ───────────────────────────────────────────────────

/// Configuration for the bootstrap tester.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resamples (default 2000).
    pub n_resamples: usize,
    /// Root seed for the per-trial RNG hierarchy.
    pub seed: u64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            n_resamples: 2000,
            seed: 42,
        }
    }
}

// ─── Result types ────────────────────────────────────────────────────

/// Bootstrap distribution around an actual Sharpe ratio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    pub actual_sharpe: f64,
    /// Valid resampled Sharpe ratios, in trial order.
    pub sharpes: Vec<f64>,
    /// Share of valid trials strictly below the actual Sharpe, × 100.
    pub percentile: f64,
    /// Share of valid trials at or above the actual Sharpe.
    pub p_exceed: f64,
    /// Trials dropped because the draw had zero volatility.
    pub discarded: usize,
}

impl BootstrapResult {
    pub fn mean(&self) -> f64 {
        if self.sharpes.is_empty() {
            return 0.0;
        }
        self.sharpes.iter().sum::<f64>() / self.sharpes.len() as f64
    }

    pub fn std(&self) -> f64 {
        let n = self.sharpes.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let var = self
            .sharpes
            .iter()
            .map(|s| (s - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        var.sqrt()
    }
}

/// Errors from the bootstrap tester.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("cannot bootstrap an empty return series")]
    EmptyReturns,
    #[error("return series has zero volatility; actual Sharpe is undefined")]
    ZeroVolatility,
    #[error("all {0} resamples had zero volatility")]
    NoValidTrials(usize),
}

// ─── Resampling ──────────────────────────────────────────────────────

/// Run the bootstrap over a realized daily-return series.
pub fn run_bootstrap(
    returns: &Series,
    config: &BootstrapConfig,
) -> Result<BootstrapResult, BootstrapError> {
    let values = returns.values();
    let n = values.len();
    if n == 0 {
        return Err(BootstrapError::EmptyReturns);
    }
    let actual_sharpe = perf::sharpe(values).ok_or(BootstrapError::ZeroVolatility)?;

    let seeds = SeedSequence::new(config.seed);
    let draws: Vec<Option<f64>> = (0..config.n_resamples as u64)
        .into_par_iter()
        .map(|trial| {
            let mut rng = seeds.rng_for(trial);
            let mut resampled = Vec::with_capacity(n);
            for _ in 0..n {
                resampled.push(values[rng.gen_range(0..n)]);
            }
            perf::sharpe(&resampled)
        })
        .collect();

    let mut sharpes = Vec::with_capacity(config.n_resamples);
    let mut discarded = 0usize;
    for draw in draws {
        match draw {
            Some(s) => sharpes.push(s),
            None => discarded += 1,
        }
    }
    if sharpes.is_empty() {
        return Err(BootstrapError::NoValidTrials(config.n_resamples));
    }

    let valid = sharpes.len() as f64;
    let below = sharpes.iter().filter(|&&s| s < actual_sharpe).count() as f64;
    let at_or_above = sharpes.iter().filter(|&&s| s >= actual_sharpe).count() as f64;

    Ok(BootstrapResult {
        actual_sharpe,
        sharpes,
        percentile: below / valid * 100.0,
        p_exceed: at_or_above / valid,
        discarded,
    })
}

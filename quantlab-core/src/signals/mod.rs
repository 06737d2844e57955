//! Signal generators — pure functions from a price panel to a signal panel.
//!
//! Three variants:
//! - [`Crossover`]: trend following via moving-average crossover (1 = long, 0 = cash)
//! - [`MeanReversion`]: rolling z-score oversold entry (1 = long, 0 = cash)
//! - [`CsMomentum`]: monthly cross-sectional momentum ranking (±1/n weights)
//!
//! Generators validate their parameters at construction and fail fast on
//! configuration errors. Cells without enough history are emitted as 0 (no
//! position), never as an error.

mod cs_momentum;
mod ma_crossover;
mod mean_reversion;

pub use cs_momentum::CsMomentum;
pub use ma_crossover::Crossover;
pub use mean_reversion::MeanReversion;

use crate::rolling::WindowError;
use thiserror::Error;

/// Invalid signal-generator parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignalError {
    #[error("short window ({short}) must be less than long window ({long})")]
    WindowOrder { short: usize, long: usize },
    #[error(transparent)]
    Window(#[from] WindowError),
    #[error("ranking buckets must be non-empty (top_n={top_n}, bottom_n={bottom_n})")]
    EmptyBuckets { top_n: usize, bottom_n: usize },
    #[error("momentum lookback must be positive")]
    ZeroLookback,
}

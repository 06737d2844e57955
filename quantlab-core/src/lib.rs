//! QuantLab Core — panel backtesting engine.
//!
//! The chain from prices to a portfolio return stream:
//! - Price/signal/position panels over a strict date axis ([`panel`])
//! - Rolling statistics with NaN warm-up semantics ([`rolling`])
//! - Signal generators: crossover, mean reversion, cross-sectional momentum
//!   ([`signals`])
//! - One-step lag, simple returns, and transaction costs ([`backtest`])
//! - Per-asset volatility targeting ([`vol_target`])
//! - Fixed-weight multi-strategy blending ([`combine`])
//! - Equity curves and annualized metrics ([`perf`])
//! - Deterministic per-trial seed derivation ([`rng`])
//!
//! Everything is a synchronous, deterministic batch computation over
//! in-memory tables; the only randomness in the workspace lives behind
//! [`rng::SeedSequence`].

pub mod backtest;
pub mod combine;
pub mod panel;
pub mod perf;
pub mod rng;
pub mod rolling;
pub mod signals;
pub mod vol_target;

pub use combine::{combine_strategies, run_cs_momentum, BlendParams, CsMomentumParams};
pub use panel::{Panel, PanelError, Series, PORTFOLIO};
pub use perf::{Metrics, TRADING_DAYS};
pub use signals::{Crossover, CsMomentum, MeanReversion, SignalError};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types that cross the runner's rayon
    /// boundaries are Send + Sync.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<Panel>();
        require_sync::<Panel>();
        require_send::<Series>();
        require_sync::<Series>();
        require_send::<Metrics>();
        require_sync::<Metrics>();
        require_send::<BlendParams>();
        require_sync::<BlendParams>();
        require_send::<CsMomentumParams>();
        require_sync::<CsMomentumParams>();
        require_send::<rng::SeedSequence>();
        require_sync::<rng::SeedSequence>();
    }
}

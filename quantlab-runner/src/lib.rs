//! QuantLab Runner — evaluation layer over `quantlab-core`.
//!
//! This crate turns the core pipeline into answers about robustness:
//! - Serializable run configuration with content-addressed ids ([`config`])
//! - The shared crossover portfolio runner and benchmark ([`runner`])
//! - Parameter grid search with activity filtering ([`grid`])
//! - Year-by-year walk-forward optimization ([`walk_forward`])
//! - Seeded bootstrap resampling of the Sharpe ratio ([`bootstrap`])
//! - CSV/JSON artifact export ([`export`])

pub mod bootstrap;
pub mod config;
pub mod export;
pub mod grid;
pub mod runner;
pub mod walk_forward;

pub use bootstrap::{run_bootstrap, BootstrapConfig, BootstrapError, BootstrapResult};
pub use config::{ConfigError, RunConfig, RunId};
pub use grid::{grid_search, GridError, GridRecord, ParamGrid};
pub use runner::{
    benchmark_equity_on, buy_and_hold, run_crossover_portfolio, PortfolioRun, RunError,
};
pub use walk_forward::{
    run_walk_forward, WalkForwardChoice, WalkForwardConfig, WalkForwardError, WalkForwardReport,
};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<RunConfig>();
        assert_sync::<RunConfig>();
        assert_send::<ParamGrid>();
        assert_sync::<ParamGrid>();
        assert_send::<WalkForwardConfig>();
        assert_sync::<WalkForwardConfig>();
        assert_send::<BootstrapConfig>();
        assert_sync::<BootstrapConfig>();
    }

    #[test]
    fn result_types_are_send_sync() {
        assert_send::<PortfolioRun>();
        assert_sync::<PortfolioRun>();
        assert_send::<GridRecord>();
        assert_sync::<GridRecord>();
        assert_send::<WalkForwardReport>();
        assert_sync::<WalkForwardReport>();
        assert_send::<BootstrapResult>();
        assert_sync::<BootstrapResult>();
    }
}

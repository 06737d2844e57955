//! Serializable run configuration.
//!
//! One `RunConfig` captures everything needed to reproduce an evaluation:
//! the universe and date range, the crossover grid, cost settings, the
//! walk-forward year range, the bootstrap seed, and the blend parameters.
//! `run_id()` hashes the canonical JSON form, so identical configs map to
//! identical ids across processes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use quantlab_core::combine::{BlendParams, CsMomentumParams};

use crate::bootstrap::BootstrapConfig;
use crate::grid::ParamGrid;
use crate::walk_forward::WalkForwardConfig;

/// Unique identifier for a run (content-addressable hash).
pub type RunId = String;

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("universe must name at least one asset")]
    EmptyUniverse,
    #[error("parameter grid contains no valid (short, long) pairs")]
    EmptyGrid,
    #[error("start date {start} is not before end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Complete configuration for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Asset symbols, in panel column order.
    pub universe: Vec<String>,

    /// Data start date (inclusive).
    pub start_date: NaiveDate,

    /// Data end date (inclusive).
    pub end_date: NaiveDate,

    /// Benchmark asset for equity comparison.
    pub benchmark: String,

    /// Crossover window grid.
    #[serde(default)]
    pub grid: ParamGrid,

    /// Walk-forward settings.
    #[serde(default)]
    pub walk_forward: WalkForwardConfig,

    /// Bootstrap settings.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,

    /// Trend + mean-reversion blend settings.
    #[serde(default)]
    pub blend: BlendParams,

    /// Cross-sectional momentum settings.
    #[serde(default)]
    pub cs_momentum: CsMomentumParams,
}

impl RunConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Shape checks that must fail before any computation starts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.universe.is_empty() {
            return Err(ConfigError::EmptyUniverse);
        }
        if self.grid.is_empty() {
            return Err(ConfigError::EmptyGrid);
        }
        if self.start_date >= self.end_date {
            return Err(ConfigError::InvalidDateRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        Ok(())
    }

    /// Deterministic content hash of this configuration.
    ///
    /// Two runs with identical configs share a `RunId` and can share
    /// exported artifacts.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).expect("RunConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            universe: vec![
                "SPY".to_string(),
                "QQQ".to_string(),
                "IWM".to_string(),
                "EFA".to_string(),
                "TLT".to_string(),
            ],
            start_date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            benchmark: "SPY".to_string(),
            grid: ParamGrid::default(),
            walk_forward: WalkForwardConfig::default(),
            bootstrap: BootstrapConfig::default(),
            blend: BlendParams::default(),
            cs_momentum: CsMomentumParams::default(),
        }
    }
}

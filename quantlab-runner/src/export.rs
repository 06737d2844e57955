//! Tabular export of evaluation artifacts.
//!
//! CSV writers for grid tables, walk-forward choices, return and equity
//! series, and the bootstrap Sharpe distribution; JSON round-trips for the
//! walk-forward and bootstrap reports. All writers return the rendered
//! text so callers decide where it lands.

use anyhow::{Context, Result};

use quantlab_core::panel::Series;
use quantlab_core::perf::equity_series;

use crate::bootstrap::BootstrapResult;
use crate::grid::GridRecord;
use crate::walk_forward::{WalkForwardChoice, WalkForwardReport};

// ─── JSON round-trips ────────────────────────────────────────────────

/// Serialize a walk-forward report to pretty JSON.
pub fn export_walk_forward_json(report: &WalkForwardReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize WalkForwardReport to JSON")
}

/// Deserialize a walk-forward report from JSON.
pub fn import_walk_forward_json(json: &str) -> Result<WalkForwardReport> {
    serde_json::from_str(json).context("failed to deserialize WalkForwardReport from JSON")
}

/// Serialize a bootstrap result to pretty JSON.
pub fn export_bootstrap_json(result: &BootstrapResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize BootstrapResult to JSON")
}

/// Deserialize a bootstrap result from JSON.
pub fn import_bootstrap_json(json: &str) -> Result<BootstrapResult> {
    serde_json::from_str(json).context("failed to deserialize BootstrapResult from JSON")
}

// ─── CSV writers ─────────────────────────────────────────────────────

/// Export a ranked grid table as CSV.
///
/// Columns: short_w, long_w, sharpe, mean_ann, vol_ann, max_drawdown, trades
pub fn export_grid_csv(records: &[GridRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "short_w",
        "long_w",
        "sharpe",
        "mean_ann",
        "vol_ann",
        "max_drawdown",
        "trades",
    ])?;
    for r in records {
        wtr.write_record([
            &r.short_w.to_string(),
            &r.long_w.to_string(),
            &format!("{:.6}", r.sharpe),
            &format!("{:.6}", r.mean_ann),
            &format!("{:.6}", r.vol_ann),
            &format!("{:.6}", r.max_drawdown),
            &format!("{:.1}", r.trades),
        ])?;
    }
    finish(wtr)
}

/// Export per-year walk-forward parameter choices as CSV.
pub fn export_choices_csv(choices: &[WalkForwardChoice]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "trade_year",
        "train_end_year",
        "short_w",
        "long_w",
        "train_sharpe",
        "test_trades",
    ])?;
    for c in choices {
        wtr.write_record([
            &c.trade_year.to_string(),
            &c.train_end_year.to_string(),
            &c.short_w.to_string(),
            &c.long_w.to_string(),
            &format!("{:.6}", c.train_sharpe),
            &format!("{:.1}", c.test_trades),
        ])?;
    }
    finish(wtr)
}

/// Export a dated return series as CSV with `date` and the series name as
/// the value column.
pub fn export_returns_csv(series: &Series) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", series.name()])?;
    for (date, value) in series.iter() {
        wtr.write_record([&date.to_string(), &format!("{value:.8}")])?;
    }
    finish(wtr)
}

/// Export strategy-vs-benchmark equity as CSV.
///
/// Both series must already share one timeline (see
/// `runner::benchmark_equity_on`).
pub fn export_equity_comparison_csv(
    strategy_returns: &Series,
    benchmark_equity: &Series,
) -> Result<String> {
    let equity = equity_series(strategy_returns, 1.0);
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", equity.name(), benchmark_equity.name()])?;
    for ((date, strat), bench) in equity.iter().zip(benchmark_equity.values()) {
        wtr.write_record([
            &date.to_string(),
            &format!("{strat:.6}"),
            &format!("{bench:.6}"),
        ])?;
    }
    finish(wtr)
}

/// Export the bootstrap Sharpe distribution as CSV with a trial index.
pub fn export_bootstrap_csv(result: &BootstrapResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["trial", "sharpe"])?;
    for (i, s) in result.sharpes.iter().enumerate() {
        wtr.write_record([&i.to_string(), &format!("{s:.6}")])?;
    }
    finish(wtr)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

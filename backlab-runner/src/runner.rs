//! Backtest runner — wires strategy, simulation, and metrics together.
//!
//! `run_backtest` is the single evaluation unit everything above it fans
//! out over: one call per optimizer candidate, one call per comparison
//! case. It is pure — no I/O, no shared state — so concurrent calls need
//! no synchronization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use backlab_core::domain::{PriceSeries, Trade};
use backlab_core::sim::{simulate, CostModel, SimError};
use backlab_core::strategy::{StrategyError, StrategySpec};

use crate::metrics::{MetricsConfig, RiskScorecard};

/// Errors from a single backtest evaluation.
#[derive(Debug, Error)]
pub enum BacktestError {
    #[error("strategy error: {0}")]
    Strategy(#[from] StrategyError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimError),
}

/// Complete result of one strategy evaluation on one series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub spec: StrategySpec,
    pub scorecard: RiskScorecard,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<f64>,
}

/// Run the full pipeline for one (spec, series) pair.
pub fn run_backtest(
    spec: &StrategySpec,
    series: &PriceSeries,
    cost: &CostModel,
    metrics: &MetricsConfig,
) -> Result<BacktestReport, BacktestError> {
    let signals = spec.generate_signal(series)?;
    let sim = simulate(series, &signals, cost)?;
    let scorecard = RiskScorecard::compute(&sim.equity, &sim.trades, metrics);

    Ok(BacktestReport {
        spec: spec.clone(),
        scorecard,
        trades: sim.trades,
        equity_curve: sim.equity,
    })
}

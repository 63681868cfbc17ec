//! Serializable request contract for external collaborators.
//!
//! The structured request a parsing collaborator hands to this crate:
//! strategy (fixed parameters or a search grid), symbol, date range, and
//! target constraints. Nothing here parses free text and nothing does
//! I/O — the price series arrives already validated from the data
//! collaborator, and results leave as JSON-serializable records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use backlab_core::domain::{PriceSeries, SeriesError};
use backlab_core::strategy::StrategySpec;

use crate::optimizer::{OptimizationResult, OptimizeError, Optimizer, OptimizerConfig, ParamGrid};
use crate::runner::{run_backtest, BacktestError, BacktestReport};
use crate::targets::{all_satisfied, TargetConstraint};

/// Unique identifier for a request (content-addressable hash).
pub type RequestId = String;

/// Fixed parameters or a search grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterSource {
    /// Evaluate exactly this parameter set.
    Fixed { spec: StrategySpec },

    /// Search this grid for the best parameter set.
    Grid { grid: ParamGrid },
}

/// A complete structured request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchRequest {
    /// Symbol identifier; opaque to the core, used for reporting.
    pub symbol: String,

    /// Date range (inclusive) to evaluate over.
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,

    /// Fixed parameters or a grid to search.
    pub parameters: ParameterSource,

    /// Performance goals. May be empty (plain best-of-grid search).
    #[serde(default)]
    pub targets: Vec<TargetConstraint>,
}

impl SearchRequest {
    /// Deterministic content hash of this request.
    ///
    /// Two identical requests share an id, which lets persistence
    /// collaborators deduplicate and cache results.
    pub fn request_id(&self) -> RequestId {
        let json = serde_json::to_string(self).expect("SearchRequest serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

/// Result of executing a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestOutcome {
    /// A fixed-parameter evaluation, with the targets checked against it.
    Single {
        report: BacktestReport,
        meets_targets: bool,
    },

    /// A grid search outcome.
    Search(OptimizationResult),
}

/// Request-level failures.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no bars for '{symbol}' between {start} and {end}")]
    EmptyDateRange {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error(transparent)]
    Backtest(#[from] BacktestError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

/// Execute a request against a collaborator-provided series.
///
/// The series is sliced to the request's date range, then dispatched to a
/// single evaluation or a grid search per `parameters`.
pub fn execute(
    request: &SearchRequest,
    series: &PriceSeries,
    config: &OptimizerConfig,
) -> Result<RequestOutcome, RequestError> {
    let window = series
        .between(request.start_date, request.end_date)
        .map_err(|e| match e {
            SeriesError::EmptySeries => RequestError::EmptyDateRange {
                symbol: request.symbol.clone(),
                start: request.start_date,
                end: request.end_date,
            },
            // Slicing a validated series cannot introduce other defects.
            other => unreachable!("unexpected slice error: {other}"),
        })?;

    info!(
        symbol = %request.symbol,
        bars = window.len(),
        request_id = %request.request_id(),
        "executing request"
    );

    match &request.parameters {
        ParameterSource::Fixed { spec } => {
            let report = run_backtest(spec, &window, &config.cost, &config.metrics)?;
            let meets_targets = all_satisfied(&request.targets, &report.scorecard);
            Ok(RequestOutcome::Single {
                report,
                meets_targets,
            })
        }
        ParameterSource::Grid { grid } => {
            let optimizer = Optimizer::new(config.clone());
            let result = optimizer.optimize(&window, grid, &request.targets)?;
            Ok(RequestOutcome::Search(result))
        }
    }
}

//! BackLab Runner — metrics, target search, and comparison ranking.
//!
//! This crate builds on `backlab-core` to provide:
//! - Risk scorecard computation with documented sentinel policies
//! - Target constraints (metric, comparison, threshold)
//! - Single-backtest runner wiring strategy → simulation → metrics
//! - Bounded grid-search optimizer with sequential and parallel modes
//! - Comparison ranking across (strategy, symbol) batches
//! - The serializable request contract consumed by external collaborators

pub mod fitness;
pub mod metrics;
pub mod optimizer;
pub mod ranker;
pub mod request;
pub mod runner;
pub mod targets;

pub use fitness::RankMetric;
pub use metrics::{MetricsConfig, RiskScorecard, PROFIT_FACTOR_CAP};
pub use optimizer::{
    EvaluatedCandidate, OptimizationResult, OptimizeError, Optimizer, OptimizerConfig, ParamGrid,
    SkippedCandidate,
};
pub use ranker::{compare, rank, ComparisonCase, ComparisonEntry, ComparisonReport, FailedCase};
pub use request::{
    execute, ParameterSource, RequestError, RequestId, RequestOutcome, SearchRequest,
};
pub use runner::{run_backtest, BacktestError, BacktestReport};
pub use targets::{all_satisfied, Comparison, TargetConstraint};

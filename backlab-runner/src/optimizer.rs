//! Parameter search — bounded grid optimization against target constraints.
//!
//! The search space is an explicit, enumerated grid: [`ParamGrid`] expands
//! to a candidate list in deterministic nested ascending order (first
//! dimension outermost), and that logical order is part of the contract —
//! the first candidate *in grid order* whose scorecard satisfies every
//! target wins, regardless of which worker finishes first.
//!
//! Two execution modes produce identical results:
//! - Sequential: walk candidates in order, stop at the first satisfying
//!   one; later candidates are never evaluated (cancellation is safe
//!   because evaluations are pure and write no shared state).
//! - Parallel: evaluate the capped candidate list on the rayon pool, then
//!   select the lowest-index satisfying candidate as a post-processing
//!   step.
//!
//! Candidates that fail parameter validation or lack history are skipped
//! and recorded, never fatal; the search fails only when every candidate
//! is unusable.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use backlab_core::domain::PriceSeries;
use backlab_core::sim::CostModel;
use backlab_core::strategy::StrategySpec;

use crate::fitness::RankMetric;
use crate::metrics::{MetricsConfig, RiskScorecard};
use crate::runner::run_backtest;
use crate::targets::{all_satisfied, TargetConstraint};

/// Explicit candidate grid, one variant per strategy.
///
/// Dimension lists are combined as a full cross product. Combinations
/// that violate parameter constraints (e.g. short >= long) are not
/// filtered at enumeration; they fail at the strategy layer during the
/// search and show up in the result's skipped list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParamGrid {
    SmaCrossover {
        short_periods: Vec<usize>,
        long_periods: Vec<usize>,
    },
    RsiMeanReversion {
        periods: Vec<usize>,
        lower_thresholds: Vec<f64>,
        upper_thresholds: Vec<f64>,
    },
    BollingerBands {
        periods: Vec<usize>,
        std_devs: Vec<f64>,
    },
    Macd {
        fast_periods: Vec<usize>,
        slow_periods: Vec<usize>,
        signal_periods: Vec<usize>,
    },
    BuyAndHold,
}

impl ParamGrid {
    /// Default SMA crossover grid: short 5..30, long 30..100.
    pub fn sma_crossover_default() -> Self {
        Self::SmaCrossover {
            short_periods: vec![5, 10, 15, 20, 25, 30],
            long_periods: vec![30, 40, 50, 60, 70, 100],
        }
    }

    /// Default RSI grid: periods 7..28, thresholds 20..35 / 65..80.
    pub fn rsi_default() -> Self {
        Self::RsiMeanReversion {
            periods: vec![7, 14, 21, 28],
            lower_thresholds: vec![20.0, 25.0, 30.0, 35.0],
            upper_thresholds: vec![65.0, 70.0, 75.0, 80.0],
        }
    }

    /// Default Bollinger grid.
    pub fn bollinger_default() -> Self {
        Self::BollingerBands {
            periods: vec![10, 15, 20, 25, 30],
            std_devs: vec![1.5, 2.0, 2.5],
        }
    }

    /// Default MACD grid around the classic (12, 26, 9).
    pub fn macd_default() -> Self {
        Self::Macd {
            fast_periods: vec![8, 12, 16],
            slow_periods: vec![21, 26, 31],
            signal_periods: vec![7, 9, 11],
        }
    }

    /// Total number of combinations in this grid.
    pub fn size(&self) -> usize {
        match self {
            Self::SmaCrossover {
                short_periods,
                long_periods,
            } => short_periods.len() * long_periods.len(),
            Self::RsiMeanReversion {
                periods,
                lower_thresholds,
                upper_thresholds,
            } => periods.len() * lower_thresholds.len() * upper_thresholds.len(),
            Self::BollingerBands { periods, std_devs } => periods.len() * std_devs.len(),
            Self::Macd {
                fast_periods,
                slow_periods,
                signal_periods,
            } => fast_periods.len() * slow_periods.len() * signal_periods.len(),
            Self::BuyAndHold => 1,
        }
    }

    /// Expand the grid into candidates in nested ascending order: the
    /// first dimension is the outermost loop. This order is observable
    /// (first-satisfying-candidate wins) and therefore stable.
    pub fn candidates(&self) -> Vec<StrategySpec> {
        let mut out = Vec::with_capacity(self.size());
        match self {
            Self::SmaCrossover {
                short_periods,
                long_periods,
            } => {
                for &short in short_periods {
                    for &long in long_periods {
                        out.push(StrategySpec::SmaCrossover {
                            short_period: short,
                            long_period: long,
                        });
                    }
                }
            }
            Self::RsiMeanReversion {
                periods,
                lower_thresholds,
                upper_thresholds,
            } => {
                for &period in periods {
                    for &lower in lower_thresholds {
                        for &upper in upper_thresholds {
                            out.push(StrategySpec::RsiMeanReversion {
                                period,
                                lower_threshold: lower,
                                upper_threshold: upper,
                            });
                        }
                    }
                }
            }
            Self::BollingerBands { periods, std_devs } => {
                for &period in periods {
                    for &std_dev in std_devs {
                        out.push(StrategySpec::BollingerBands { period, std_dev });
                    }
                }
            }
            Self::Macd {
                fast_periods,
                slow_periods,
                signal_periods,
            } => {
                for &fast in fast_periods {
                    for &slow in slow_periods {
                        for &signal in signal_periods {
                            out.push(StrategySpec::Macd {
                                fast_period: fast,
                                slow_period: slow,
                                signal_period: signal,
                            });
                        }
                    }
                }
            }
            Self::BuyAndHold => out.push(StrategySpec::BuyAndHold),
        }
        out
    }
}

/// Search configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizerConfig {
    /// Hard cap on evaluated candidates, bounding worst-case latency even
    /// for oversized grids.
    pub max_candidates: usize,
    /// Ranking metric when no targets are given (with targets, the first
    /// target's metric ranks the fallback best).
    pub default_ranking: RankMetric,
    /// Evaluate candidates on the rayon pool instead of in-line.
    pub parallel: bool,
    pub cost: CostModel,
    pub metrics: MetricsConfig,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            default_ranking: RankMetric::SharpeRatio,
            parallel: true,
            cost: CostModel::none(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Search failures. Per-candidate errors are not failures — they are
/// recorded and skipped.
#[derive(Debug, Error)]
pub enum OptimizeError {
    #[error("parameter grid is empty")]
    EmptyGrid,
    #[error("no valid candidates: all {skipped} evaluated candidates were skipped")]
    NoValidCandidates { skipped: usize },
}

/// A candidate that produced a scorecard, in grid order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedCandidate {
    pub spec: StrategySpec,
    pub scorecard: RiskScorecard,
}

/// A candidate rejected by the strategy layer, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedCandidate {
    pub spec: StrategySpec,
    pub reason: String,
}

/// Outcome of a parameter search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub best_parameters: StrategySpec,
    pub best_scorecard: RiskScorecard,
    /// True when the winning candidate satisfied every target constraint.
    pub target_met: bool,
    /// Candidates actually evaluated (skips included).
    pub iterations_run: usize,
    /// Evaluated candidates in grid order.
    pub candidates: Vec<EvaluatedCandidate>,
    /// Rejected candidates in grid order, with reasons.
    pub skipped: Vec<SkippedCandidate>,
}

/// Grid search driver. See the module docs for the execution contract.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
}

enum SearchState {
    /// Lowest grid index whose scorecard satisfied every target.
    Satisfied(usize),
    /// Grid (or cap) exhausted without satisfying the targets.
    Exhausted,
}

impl Optimizer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Search the grid for the best candidate against the targets.
    ///
    /// With a non-empty target set, the first candidate in grid order
    /// satisfying every target wins (`target_met = true`); otherwise the
    /// best candidate by the ranking metric is returned with
    /// `target_met = false`. An empty target set skips the satisfaction
    /// phase entirely and ranks the whole (capped) grid.
    pub fn optimize(
        &self,
        series: &PriceSeries,
        grid: &ParamGrid,
        targets: &[TargetConstraint],
    ) -> Result<OptimizationResult, OptimizeError> {
        let all = grid.candidates();
        if all.is_empty() {
            return Err(OptimizeError::EmptyGrid);
        }
        let capped = &all[..all.len().min(self.config.max_candidates)];

        let ranking = targets
            .first()
            .map(|t| t.metric)
            .unwrap_or(self.config.default_ranking);

        info!(
            grid_size = all.len(),
            evaluating = capped.len(),
            parallel = self.config.parallel,
            "starting parameter search"
        );

        let outcomes = if self.config.parallel {
            self.evaluate_parallel(series, capped)
        } else {
            self.evaluate_sequential(series, capped, targets)
        };

        self.select(outcomes, targets, ranking)
    }

    /// Evaluate every capped candidate on the rayon pool. Completion
    /// order is irrelevant: results come back indexed by grid position.
    fn evaluate_parallel(
        &self,
        series: &PriceSeries,
        capped: &[StrategySpec],
    ) -> Vec<(StrategySpec, Result<RiskScorecard, String>)> {
        capped
            .par_iter()
            .map(|spec| {
                let outcome = run_backtest(spec, series, &self.config.cost, &self.config.metrics)
                    .map(|report| report.scorecard)
                    .map_err(|e| e.to_string());
                (spec.clone(), outcome)
            })
            .collect()
    }

    /// Walk candidates in grid order, stopping at the first satisfying
    /// one. Abandoned candidates are simply never evaluated.
    fn evaluate_sequential(
        &self,
        series: &PriceSeries,
        capped: &[StrategySpec],
        targets: &[TargetConstraint],
    ) -> Vec<(StrategySpec, Result<RiskScorecard, String>)> {
        let mut outcomes = Vec::with_capacity(capped.len());
        for spec in capped {
            let outcome = run_backtest(spec, series, &self.config.cost, &self.config.metrics)
                .map(|report| report.scorecard)
                .map_err(|e| e.to_string());

            let satisfied = matches!(
                &outcome,
                Ok(card) if !targets.is_empty() && all_satisfied(targets, card)
            );
            outcomes.push((spec.clone(), outcome));
            if satisfied {
                break;
            }
        }
        outcomes
    }

    /// Deterministic post-processing over grid-ordered outcomes.
    fn select(
        &self,
        outcomes: Vec<(StrategySpec, Result<RiskScorecard, String>)>,
        targets: &[TargetConstraint],
        ranking: RankMetric,
    ) -> Result<OptimizationResult, OptimizeError> {
        let iterations_run = outcomes.len();
        let mut candidates = Vec::new();
        let mut skipped = Vec::new();

        for (spec, outcome) in outcomes {
            match outcome {
                Ok(scorecard) => candidates.push(EvaluatedCandidate { spec, scorecard }),
                Err(reason) => {
                    debug!(strategy = spec.name(), %reason, "candidate skipped");
                    skipped.push(SkippedCandidate { spec, reason });
                }
            }
        }

        if candidates.is_empty() {
            return Err(OptimizeError::NoValidCandidates {
                skipped: skipped.len(),
            });
        }

        let state = if targets.is_empty() {
            SearchState::Exhausted
        } else {
            candidates
                .iter()
                .position(|c| all_satisfied(targets, &c.scorecard))
                .map_or(SearchState::Exhausted, SearchState::Satisfied)
        };

        let (best_idx, target_met) = match state {
            SearchState::Satisfied(idx) => (idx, true),
            SearchState::Exhausted => {
                // Best by ranking metric; strict comparison keeps the
                // earliest candidate on ties.
                let mut best = 0usize;
                for (idx, candidate) in candidates.iter().enumerate().skip(1) {
                    if ranking.is_better(
                        ranking.extract(&candidate.scorecard),
                        ranking.extract(&candidates[best].scorecard),
                    ) {
                        best = idx;
                    }
                }
                (best, false)
            }
        };

        info!(
            target_met,
            iterations_run,
            evaluated = candidates.len(),
            skipped = skipped.len(),
            best = candidates[best_idx].spec.name(),
            "parameter search finished"
        );

        Ok(OptimizationResult {
            best_parameters: candidates[best_idx].spec.clone(),
            best_scorecard: candidates[best_idx].scorecard.clone(),
            target_met,
            iterations_run,
            candidates,
            skipped,
        })
    }
}

//! Target constraints — the goals a parameter search tries to satisfy.
//!
//! A constraint is (metric, comparison, threshold), e.g.
//! `sharpe_ratio > 1.5` or `max_drawdown > -0.15`. A candidate satisfies
//! a target set when every constraint holds against its scorecard.

use serde::{Deserialize, Serialize};

use crate::fitness::RankMetric;
use crate::metrics::RiskScorecard;

/// Comparison operator for a target constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Comparison {
    pub fn holds(&self, value: f64, threshold: f64) -> bool {
        match self {
            Comparison::GreaterThan => value > threshold,
            Comparison::GreaterOrEqual => value >= threshold,
            Comparison::LessThan => value < threshold,
            Comparison::LessOrEqual => value <= threshold,
        }
    }
}

/// One performance goal: metric compared against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetConstraint {
    pub metric: RankMetric,
    pub comparison: Comparison,
    pub threshold: f64,
}

impl TargetConstraint {
    pub fn new(metric: RankMetric, comparison: Comparison, threshold: f64) -> Self {
        Self {
            metric,
            comparison,
            threshold,
        }
    }

    pub fn is_satisfied_by(&self, card: &RiskScorecard) -> bool {
        self.comparison.holds(self.metric.extract(card), self.threshold)
    }
}

/// True when every constraint in the set holds.
pub fn all_satisfied(targets: &[TargetConstraint], card: &RiskScorecard) -> bool {
    targets.iter().all(|t| t.is_satisfied_by(card))
}

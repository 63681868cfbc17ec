//! Ranking metric — configurable scorecard field selector.

use serde::{Deserialize, Serialize};

use crate::metrics::RiskScorecard;

/// Which scorecard field to rank/optimize by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    #[default]
    SharpeRatio,
    SortinoRatio,
    CalmarRatio,
    TotalReturn,
    AnnualizedReturn,
    MaxDrawdown,
    Volatility,
    WinRate,
    ProfitFactor,
}

impl RankMetric {
    /// Extract the corresponding value from a scorecard.
    pub fn extract(&self, card: &RiskScorecard) -> f64 {
        match self {
            Self::SharpeRatio => card.sharpe_ratio,
            Self::SortinoRatio => card.sortino_ratio,
            Self::CalmarRatio => card.calmar_ratio,
            Self::TotalReturn => card.total_return,
            Self::AnnualizedReturn => card.annualized_return,
            Self::MaxDrawdown => card.max_drawdown,
            Self::Volatility => card.volatility,
            Self::WinRate => card.win_rate,
            Self::ProfitFactor => card.profit_factor,
        }
    }

    /// Compare two metric values. Returns true if `a` is better than `b`.
    ///
    /// Higher is better for every metric except Volatility. MaxDrawdown is
    /// stored as a non-positive fraction, so `a > b` (less negative) is
    /// still the right comparison.
    pub fn is_better(&self, a: f64, b: f64) -> bool {
        match self {
            Self::Volatility => a < b,
            _ => a > b,
        }
    }
}

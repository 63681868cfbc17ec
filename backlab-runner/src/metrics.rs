//! Risk metrics — pure functions that score an equity curve and trade list.
//!
//! Every metric is a pure function: equity curve and/or trade ledger in,
//! scalar out. All outputs are fractions (0.10 = 10%) and always finite;
//! mathematically undefined cases map to documented sentinels:
//!
//! - zero return variance → sharpe_ratio = 0 (not ±inf)
//! - no negative returns → sortino_ratio = sharpe_ratio
//! - zero max drawdown → calmar_ratio = 0
//! - no losing trades → profit_factor = [`PROFIT_FACTOR_CAP`] (0 if there
//!   are no winning trades either)
//! - no trades → win_rate = 0, profit_factor = 0

use serde::{Deserialize, Serialize};

use backlab_core::domain::Trade;

/// Sentinel for profit factor when there are gains but no losing trades.
pub const PROFIT_FACTOR_CAP: f64 = 999.0;

/// Annualization and risk-free parameters for ratio metrics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Annual risk-free rate as a fraction.
    pub risk_free_rate: f64,
    /// Trading periods per year (252 for daily bars).
    pub periods_per_year: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: 0.0,
            periods_per_year: 252.0,
        }
    }
}

/// Aggregate performance and risk scorecard for a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskScorecard {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub calmar_ratio: f64,
    pub max_drawdown: f64,
    pub volatility: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub trade_count: usize,
}

impl RiskScorecard {
    /// Compute all metrics from an equity curve and trade ledger.
    pub fn compute(equity: &[f64], trades: &[Trade], config: &MetricsConfig) -> Self {
        let returns = period_returns(equity);
        let sharpe = sharpe_ratio(&returns, config.risk_free_rate, config.periods_per_year);
        Self {
            total_return: total_return(equity),
            annualized_return: annualized_return(equity, config.periods_per_year),
            sharpe_ratio: sharpe,
            sortino_ratio: sortino_ratio(
                &returns,
                config.risk_free_rate,
                config.periods_per_year,
                sharpe,
            ),
            calmar_ratio: calmar_ratio(equity, config.periods_per_year),
            max_drawdown: max_drawdown(equity),
            volatility: volatility(&returns, config.periods_per_year),
            win_rate: win_rate(trades),
            profit_factor: profit_factor(trades),
            trade_count: trades.len(),
        }
    }

    /// True if every field is finite (always holds for computed cards).
    pub fn is_finite(&self) -> bool {
        [
            self.total_return,
            self.annualized_return,
            self.sharpe_ratio,
            self.sortino_ratio,
            self.calmar_ratio,
            self.max_drawdown,
            self.volatility,
            self.win_rate,
            self.profit_factor,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Period-over-period fractional changes of the equity curve.
pub fn period_returns(equity: &[f64]) -> Vec<f64> {
    if equity.len() < 2 {
        return Vec::new();
    }
    equity
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

/// Total return as a fraction: (final - initial) / initial.
pub fn total_return(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let initial = equity[0];
    let final_eq = *equity.last().unwrap();
    if initial <= 0.0 {
        return 0.0;
    }
    (final_eq - initial) / initial
}

/// Compound annual growth rate from the equity curve.
///
/// Returns 0.0 for single-bar curves or non-positive endpoints.
pub fn annualized_return(equity: &[f64], periods_per_year: f64) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let initial = equity[0];
    let final_eq = *equity.last().unwrap();
    if initial <= 0.0 || final_eq <= 0.0 {
        return 0.0;
    }
    let years = (equity.len() - 1) as f64 / periods_per_year;
    if years <= 0.0 {
        return 0.0;
    }
    (final_eq / initial).powf(1.0 / years) - 1.0
}

/// Annualized Sharpe ratio.
///
/// Sharpe = (mean(returns) - rf/ppy) / std(returns) * sqrt(ppy), sample
/// std. Zero variance or fewer than 2 returns → 0.0.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64, periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let period_rf = risk_free_rate / periods_per_year;
    let mean_excess = mean(returns) - period_rf;
    let std = std_dev(returns);
    if std < 1e-15 {
        return 0.0;
    }
    (mean_excess / std) * periods_per_year.sqrt()
}

/// Annualized Sortino ratio (downside deviation only).
///
/// Same numerator as Sharpe; the denominator is the sample std of the
/// negative returns. With no negative returns there is no downside risk
/// to penalize, so the Sortino equals the Sharpe (passed in by the
/// caller). Zero downside deviation → 0.0.
pub fn sortino_ratio(
    returns: &[f64],
    risk_free_rate: f64,
    periods_per_year: f64,
    sharpe: f64,
) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return sharpe;
    }
    let downside_std = std_dev(&downside);
    if downside_std < 1e-15 {
        return 0.0;
    }
    let period_rf = risk_free_rate / periods_per_year;
    let mean_excess = mean(returns) - period_rf;
    (mean_excess / downside_std) * periods_per_year.sqrt()
}

/// Maximum drawdown as a non-positive fraction (e.g., -0.15 = 15%).
///
/// 0.0 for constant or monotonically non-decreasing curves.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let mut peak = equity[0];
    let mut max_dd = 0.0_f64;

    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Calmar ratio: annualized return / |max drawdown|.
///
/// Zero drawdown → 0.0; a losing strategy with drawdown yields a
/// negative ratio.
pub fn calmar_ratio(equity: &[f64], periods_per_year: f64) -> f64 {
    let dd = max_drawdown(equity);
    if dd >= 0.0 {
        return 0.0;
    }
    annualized_return(equity, periods_per_year) / dd.abs()
}

/// Annualized volatility: sample std of returns * sqrt(ppy).
pub fn volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }
    std_dev(returns) * periods_per_year.sqrt()
}

/// Fraction of trades with a positive net return. 0.0 with no trades.
pub fn win_rate(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Profit factor: sum of winning trade returns / |sum of losing trade
/// returns|.
///
/// No trades or no winners → 0.0; winners but no losers →
/// [`PROFIT_FACTOR_CAP`].
pub fn profit_factor(trades: &[Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let gains: f64 = trades
        .iter()
        .filter(|t| t.return_pct > 0.0)
        .map(|t| t.return_pct)
        .sum();
    let losses: f64 = trades
        .iter()
        .filter(|t| t.return_pct < 0.0)
        .map(|t| t.return_pct.abs())
        .sum();

    if losses < 1e-15 {
        return if gains > 0.0 { PROFIT_FACTOR_CAP } else { 0.0 };
    }
    gains / losses
}

// ─── Helpers ────────────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1). 0.0 for fewer than 2 values.
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

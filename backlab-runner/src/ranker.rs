//! Comparison ranking — order a batch of scorecards by a chosen metric.
//!
//! Ranking is pure and stable: entries that tie on the metric keep their
//! input order. The batch itself is typically produced by [`compare`],
//! which fans one worker task out per (strategy, symbol) case and gathers
//! all results before ranking — completion order never leaks into the
//! ranking.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use backlab_core::domain::PriceSeries;
use backlab_core::sim::CostModel;
use backlab_core::strategy::StrategySpec;

use crate::fitness::RankMetric;
use crate::metrics::{MetricsConfig, RiskScorecard};
use crate::runner::run_backtest;

/// One (strategy, symbol) evaluation request. The series is borrowed:
/// several strategies comparing on the same symbol share one series.
#[derive(Debug, Clone, Copy)]
pub struct ComparisonCase<'a> {
    pub strategy: &'a StrategySpec,
    pub symbol: &'a str,
    pub series: &'a PriceSeries,
}

/// A scored entry in a comparison batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub strategy: StrategySpec,
    pub symbol: String,
    pub scorecard: RiskScorecard,
}

/// A case that could not be evaluated, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedCase {
    pub strategy: StrategySpec,
    pub symbol: String,
    pub reason: String,
}

/// Ranked comparison output: entries best-first, failures recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metric: RankMetric,
    pub entries: Vec<ComparisonEntry>,
    pub failures: Vec<FailedCase>,
}

/// Order entries by the metric, best first, stable on ties.
///
/// Non-finite metric values (which computed scorecards never produce)
/// compare as equal and therefore keep their input position.
pub fn rank(entries: &[ComparisonEntry], metric: RankMetric) -> Vec<ComparisonEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by(|a, b| {
        let va = metric.extract(&a.scorecard);
        let vb = metric.extract(&b.scorecard);
        if metric.is_better(va, vb) {
            std::cmp::Ordering::Less
        } else if metric.is_better(vb, va) {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    });
    ranked
}

/// Evaluate every case in parallel, then rank the gathered scorecards.
///
/// Cases are embarrassingly parallel: each runs the pure pipeline on
/// read-only inputs. Failures (bad parameters, short history) are
/// recorded per case, never fatal to the batch.
pub fn compare(
    cases: &[ComparisonCase<'_>],
    cost: &CostModel,
    metrics: &MetricsConfig,
    metric: RankMetric,
) -> ComparisonReport {
    let outcomes: Vec<Result<ComparisonEntry, FailedCase>> = cases
        .par_iter()
        .map(|case| {
            run_backtest(case.strategy, case.series, cost, metrics)
                .map(|report| ComparisonEntry {
                    strategy: case.strategy.clone(),
                    symbol: case.symbol.to_string(),
                    scorecard: report.scorecard,
                })
                .map_err(|e| FailedCase {
                    strategy: case.strategy.clone(),
                    symbol: case.symbol.to_string(),
                    reason: e.to_string(),
                })
        })
        .collect();

    let mut entries = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            Ok(entry) => entries.push(entry),
            Err(failed) => {
                warn!(
                    strategy = failed.strategy.name(),
                    symbol = %failed.symbol,
                    reason = %failed.reason,
                    "comparison case failed"
                );
                failures.push(failed);
            }
        }
    }

    ComparisonReport {
        metric,
        entries: rank(&entries, metric),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backlab_core::domain::Bar;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let base = chrono::NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: base + chrono::Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: (close - 1.0).max(0.1),
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new(bars).unwrap()
    }

    fn entry(symbol: &str, sharpe: f64) -> ComparisonEntry {
        ComparisonEntry {
            strategy: StrategySpec::BuyAndHold,
            symbol: symbol.to_string(),
            scorecard: RiskScorecard {
                total_return: 0.1,
                annualized_return: 0.1,
                sharpe_ratio: sharpe,
                sortino_ratio: 1.0,
                calmar_ratio: 0.5,
                max_drawdown: -0.1,
                volatility: 0.2,
                win_rate: 0.5,
                profit_factor: 1.5,
                trade_count: 5,
            },
        }
    }

    #[test]
    fn rank_orders_best_first() {
        let entries = vec![entry("A", 1.0), entry("B", 3.0), entry("C", 2.0)];
        let ranked = rank(&entries, RankMetric::SharpeRatio);
        let symbols: Vec<&str> = ranked.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["B", "C", "A"]);
    }

    #[test]
    fn rank_is_stable_on_ties() {
        let entries = vec![entry("first", 1.5), entry("second", 1.5), entry("third", 1.5)];
        let ranked = rank(&entries, RankMetric::SharpeRatio);
        let symbols: Vec<&str> = ranked.iter().map(|e| e.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["first", "second", "third"]);
    }

    #[test]
    fn rank_does_not_mutate_input() {
        let entries = vec![entry("A", 1.0), entry("B", 3.0)];
        let _ranked = rank(&entries, RankMetric::SharpeRatio);
        assert_eq!(entries[0].symbol, "A");
    }

    #[test]
    fn compare_runs_all_cases_and_ranks() {
        let rising: Vec<f64> = (0..120).map(|i| 100.0 + i as f64).collect();
        let falling: Vec<f64> = (0..120).map(|i| 220.0 - i as f64).collect();
        let up = make_series(&rising);
        let down = make_series(&falling);

        let buy_hold = StrategySpec::BuyAndHold;
        let cases = vec![
            ComparisonCase {
                strategy: &buy_hold,
                symbol: "DOWN",
                series: &down,
            },
            ComparisonCase {
                strategy: &buy_hold,
                symbol: "UP",
                series: &up,
            },
        ];

        let report = compare(
            &cases,
            &CostModel::none(),
            &MetricsConfig::default(),
            RankMetric::TotalReturn,
        );

        assert_eq!(report.entries.len(), 2);
        assert!(report.failures.is_empty());
        assert_eq!(report.entries[0].symbol, "UP");
        assert!(report.entries[0].scorecard.total_return > report.entries[1].scorecard.total_return);
    }

    #[test]
    fn compare_records_failures_without_aborting() {
        let short_series = make_series(&[100.0, 101.0, 102.0]);
        let long_series = make_series(&(0..120).map(|i| 100.0 + i as f64).collect::<Vec<_>>());

        let sma = StrategySpec::SmaCrossover {
            short_period: 5,
            long_period: 20,
        };
        let buy_hold = StrategySpec::BuyAndHold;
        let cases = vec![
            ComparisonCase {
                strategy: &sma,
                symbol: "SHORT",
                series: &short_series,
            },
            ComparisonCase {
                strategy: &buy_hold,
                symbol: "LONG",
                series: &long_series,
            },
        ];

        let report = compare(
            &cases,
            &CostModel::none(),
            &MetricsConfig::default(),
            RankMetric::SharpeRatio,
        );

        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].symbol, "SHORT");
        assert!(report.failures[0].reason.contains("insufficient history"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = ComparisonReport {
            metric: RankMetric::SharpeRatio,
            entries: vec![entry("A", 1.0)],
            failures: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metric"], "sharpe_ratio");
        assert_eq!(json["entries"][0]["symbol"], "A");
    }
}

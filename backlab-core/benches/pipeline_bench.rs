//! Criterion benchmarks for the signal + simulation hot path.
//!
//! Benchmarks:
//! 1. Signal generation per strategy variant
//! 2. Full pipeline (signal generation + simulation) on a multi-year series

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use backlab_core::domain::{Bar, PriceSeries};
use backlab_core::sim::{simulate, CostModel};
use backlab_core::strategy::StrategySpec;

fn make_series(n: usize) -> PriceSeries {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.01;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: (close - 1.5).max(0.1),
                close,
                volume: 1_000_000,
            }
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

fn variants() -> Vec<(&'static str, StrategySpec)> {
    vec![
        (
            "sma_crossover",
            StrategySpec::SmaCrossover {
                short_period: 20,
                long_period: 50,
            },
        ),
        (
            "rsi_mean_reversion",
            StrategySpec::RsiMeanReversion {
                period: 14,
                lower_threshold: 30.0,
                upper_threshold: 70.0,
            },
        ),
        (
            "bollinger_bands",
            StrategySpec::BollingerBands {
                period: 20,
                std_dev: 2.0,
            },
        ),
        (
            "macd",
            StrategySpec::Macd {
                fast_period: 12,
                slow_period: 26,
                signal_period: 9,
            },
        ),
        ("buy_and_hold", StrategySpec::BuyAndHold),
    ]
}

fn bench_signal_generation(c: &mut Criterion) {
    let series = make_series(1260); // ~5 trading years
    let mut group = c.benchmark_group("signal_generation");

    for (name, spec) in variants() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &spec, |b, spec| {
            b.iter(|| spec.generate_signal(black_box(&series)).unwrap());
        });
    }
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let series = make_series(1260);
    let cost = CostModel::none();
    let spec = StrategySpec::SmaCrossover {
        short_period: 20,
        long_period: 50,
    };

    c.bench_function("pipeline/sma_crossover_5y", |b| {
        b.iter(|| {
            let signals = spec.generate_signal(black_box(&series)).unwrap();
            simulate(black_box(&series), &signals, &cost).unwrap()
        });
    });
}

criterion_group!(benches, bench_signal_generation, bench_full_pipeline);
criterion_main!(benches);

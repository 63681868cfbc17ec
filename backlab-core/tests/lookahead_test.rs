//! No-look-ahead verification.
//!
//! For every strategy variant: generating signals over a full series and
//! over a truncated prefix must agree on the prefix. If a signal at bar i
//! ever depended on bars beyond i, truncation would change it.

use backlab_core::domain::{Bar, PriceSeries};
use backlab_core::strategy::StrategySpec;

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

fn wavy_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 + (i as f64 * 0.21).sin() * 15.0 + (i as f64 * 0.045).cos() * 8.0)
        .collect()
}

fn all_variants() -> Vec<StrategySpec> {
    vec![
        StrategySpec::SmaCrossover {
            short_period: 5,
            long_period: 20,
        },
        StrategySpec::RsiMeanReversion {
            period: 14,
            lower_threshold: 30.0,
            upper_threshold: 70.0,
        },
        StrategySpec::BollingerBands {
            period: 20,
            std_dev: 2.0,
        },
        StrategySpec::Macd {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        },
        StrategySpec::BuyAndHold,
    ]
}

#[test]
fn truncation_does_not_change_earlier_signals() {
    let closes = wavy_closes(200);
    let full = make_series(&closes);

    for spec in all_variants() {
        let full_signals = spec.generate_signal(&full).unwrap();

        for cut in [60, 100, 150, 199] {
            let prefix = make_series(&closes[..cut]);
            let prefix_signals = spec.generate_signal(&prefix).unwrap();

            assert_eq!(
                prefix_signals,
                full_signals[..cut].to_vec(),
                "variant {} diverges when truncated at {cut}",
                spec.name()
            );
        }
    }
}

#[test]
fn appending_bars_does_not_rewrite_history() {
    let mut closes = wavy_closes(120);
    let before = make_series(&closes);

    let spec = StrategySpec::SmaCrossover {
        short_period: 5,
        long_period: 20,
    };
    let before_signals = spec.generate_signal(&before).unwrap();

    // A violent crash appended afterwards must not alter past signals.
    closes.extend((0..30).map(|i| 40.0 - i as f64));
    let after = make_series(&closes);
    let after_signals = spec.generate_signal(&after).unwrap();

    assert_eq!(before_signals[..], after_signals[..120]);
}

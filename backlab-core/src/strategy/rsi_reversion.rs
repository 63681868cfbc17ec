//! RSI mean reversion — buy oversold, sell overbought.
//!
//! Stateful walk: enter Long when RSI drops below the lower threshold
//! while flat, exit to Flat when RSI rises above the upper threshold.
//! Between the thresholds the current position is held.

use crate::domain::Bar;
use crate::indicators::{Indicator, Rsi};
use crate::strategy::Signal;

pub(super) fn signals(
    period: usize,
    lower_threshold: f64,
    upper_threshold: f64,
    bars: &[Bar],
) -> Vec<Signal> {
    let rsi = Rsi::new(period).compute(bars);

    let mut state = Signal::Flat;
    rsi.iter()
        .map(|&value| {
            if value.is_nan() {
                return state;
            }
            if value < lower_threshold && state == Signal::Flat {
                state = Signal::Long;
            } else if value > upper_threshold && state == Signal::Long {
                state = Signal::Flat;
            }
            state
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn constant_series_never_trades() {
        // Constant price → RSI 50 → between thresholds → always Flat
        let bars = make_bars(&[100.0; 100]);
        let result = signals(14, 30.0, 70.0, &bars);
        assert!(result.iter().all(|s| *s == Signal::Flat));
    }

    #[test]
    fn crash_triggers_entry() {
        // Steep selloff drives RSI to 0, well below the lower threshold
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - 8.0 * i as f64).collect();
        let bars = make_bars(&closes);
        let result = signals(5, 30.0, 70.0, &bars);
        assert_eq!(*result.last().unwrap(), Signal::Long);
    }

    #[test]
    fn rally_after_entry_exits() {
        // Selloff (enter), then strong rally (RSI above 70 → exit)
        let mut closes: Vec<f64> = (0..15).map(|i| 200.0 - 8.0 * i as f64).collect();
        closes.extend((0..25).map(|i| 90.0 + 10.0 * i as f64));
        let bars = make_bars(&closes);
        let result = signals(5, 30.0, 70.0, &bars);

        assert!(result.contains(&Signal::Long), "entry expected");
        assert_eq!(*result.last().unwrap(), Signal::Flat, "exit expected");
    }

    #[test]
    fn holds_between_thresholds() {
        // Once long, mild chop between thresholds must not exit.
        let mut closes: Vec<f64> = (0..15).map(|i| 200.0 - 8.0 * i as f64).collect();
        let base = *closes.last().unwrap();
        closes.extend((0..10).map(|i| base + ((i % 2) as f64) * 0.5));
        let bars = make_bars(&closes);
        let result = signals(5, 30.0, 70.0, &bars);
        assert_eq!(*result.last().unwrap(), Signal::Long);
    }
}

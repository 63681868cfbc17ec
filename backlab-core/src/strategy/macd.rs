//! MACD trend following — long while the MACD line is above its signal line.

use crate::domain::Bar;
use crate::indicators::Macd;
use crate::strategy::Signal;

pub(super) fn signals(
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    bars: &[Bar],
) -> Vec<Signal> {
    let lines = Macd::new(fast_period, slow_period, signal_period).lines(bars);

    (0..bars.len())
        .map(|i| {
            let macd = lines.macd[i];
            let sig = lines.signal[i];
            if !macd.is_nan() && !sig.is_nan() && macd > sig {
                Signal::Long
            } else {
                Signal::Flat
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    #[test]
    fn accelerating_uptrend_goes_long() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + 0.05 * (i as f64).powi(2)).collect();
        let bars = make_bars(&closes);
        let result = signals(5, 10, 4, &bars);
        assert_eq!(*result.last().unwrap(), Signal::Long);
    }

    #[test]
    fn warmup_is_flat() {
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let result = signals(5, 10, 4, &bars);
        // signal line undefined before slow + signal - 2 = 12
        for s in result.iter().take(12) {
            assert_eq!(*s, Signal::Flat);
        }
    }

    #[test]
    fn trend_reversal_flips_to_flat() {
        let mut closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        closes.extend((0..40).map(|i| 178.0 - 2.0 * i as f64));
        let bars = make_bars(&closes);
        let result = signals(5, 10, 4, &bars);
        assert!(result.contains(&Signal::Long));
        assert_eq!(*result.last().unwrap(), Signal::Flat);
    }
}

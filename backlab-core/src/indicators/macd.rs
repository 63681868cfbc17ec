//! MACD (Moving Average Convergence Divergence).
//!
//! macd line  = EMA(close, fast) - EMA(close, slow)
//! signal line = EMA(macd line, signal), seeded from the first defined
//!               macd values.
//! Lookback: slow + signal - 2 (first bar where both lines are defined).

use crate::domain::Bar;
use crate::indicators::ema::ema_of_series;
use crate::indicators::{Ema, Indicator};

/// The two MACD series, aligned with the input bars.
#[derive(Debug, Clone)]
pub struct MacdLines {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        assert!(fast_period >= 1, "MACD fast period must be >= 1");
        assert!(
            fast_period < slow_period,
            "MACD fast period must be < slow period"
        );
        assert!(signal_period >= 1, "MACD signal period must be >= 1");
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }

    /// First index where both the macd and signal lines are defined.
    pub fn lookback(&self) -> usize {
        self.slow_period + self.signal_period - 2
    }

    /// Compute both lines in one pass.
    pub fn lines(&self, bars: &[Bar]) -> MacdLines {
        let n = bars.len();
        let fast = Ema::new(self.fast_period).compute(bars);
        let slow = Ema::new(self.slow_period).compute(bars);

        let macd: Vec<f64> = (0..n)
            .map(|i| {
                if fast[i].is_nan() || slow[i].is_nan() {
                    f64::NAN
                } else {
                    fast[i] - slow[i]
                }
            })
            .collect();

        let signal = ema_of_series(&macd, self.signal_period);

        MacdLines { macd, signal }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn macd_alignment_and_warmup() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let macd = Macd::new(3, 6, 2);
        let lines = macd.lines(&bars);

        assert_eq!(lines.macd.len(), 30);
        assert_eq!(lines.signal.len(), 30);

        // macd defined from slow-1 = 5
        for i in 0..5 {
            assert!(lines.macd[i].is_nan());
        }
        assert!(!lines.macd[5].is_nan());

        // signal defined from slow + signal - 2 = 6
        assert!(lines.signal[5].is_nan());
        assert!(!lines.signal[6].is_nan());
        assert_eq!(macd.lookback(), 6);
    }

    #[test]
    fn macd_positive_in_uptrend() {
        // In a steady uptrend the fast EMA rides above the slow EMA.
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + 2.0 * i as f64).collect();
        let bars = make_bars(&closes);
        let lines = Macd::new(5, 10, 4).lines(&bars);
        let last = *lines.macd.last().unwrap();
        assert!(last > 0.0, "macd should be positive in an uptrend: {last}");
    }

    #[test]
    fn macd_constant_price_is_zero() {
        let bars = make_bars(&[100.0; 30]);
        let lines = Macd::new(3, 6, 2).lines(&bars);
        assert_approx(*lines.macd.last().unwrap(), 0.0, DEFAULT_EPSILON);
        assert_approx(*lines.signal.last().unwrap(), 0.0, DEFAULT_EPSILON);
    }
}

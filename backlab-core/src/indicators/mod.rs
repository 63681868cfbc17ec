//! Concrete indicator implementations.
//!
//! Indicators are pure, vectorized computations over a bar slice: the
//! output is aligned 1:1 with the input, with `NaN` marking warmup
//! positions where the value is not yet defined. Input bars come from a
//! validated [`PriceSeries`](crate::domain::PriceSeries), so prices are
//! finite; `NaN` in an output vector always means "warmup", never "bad
//! input".

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use bollinger::{Bollinger, BollingerBand};
pub use ema::{ema_of_series, Ema};
pub use macd::{Macd, MacdLines};
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Bar;

/// A single-series indicator over close prices.
pub trait Indicator {
    /// Number of leading bars with undefined (NaN) output.
    fn lookback(&self) -> usize;

    /// Compute the indicator for every bar. Output length == input length.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = (open.min(close) - 1.0).max(0.0);
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

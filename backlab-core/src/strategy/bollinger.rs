//! Bollinger band mean reversion — buy the lower band, sell the upper.
//!
//! Stateful walk: enter Long when the close touches or breaks the lower
//! band while flat, exit to Flat when it touches or breaks the upper
//! band. Inside the bands the current position is held.

use crate::domain::Bar;
use crate::indicators::{Bollinger, Indicator};
use crate::strategy::Signal;

pub(super) fn signals(period: usize, std_dev: f64, bars: &[Bar]) -> Vec<Signal> {
    let upper = Bollinger::upper(period, std_dev).compute(bars);
    let lower = Bollinger::lower(period, std_dev).compute(bars);

    let mut state = Signal::Flat;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if upper[i].is_nan() || lower[i].is_nan() {
                return state;
            }
            if bar.close <= lower[i] && state == Signal::Flat {
                state = Signal::Long;
            } else if bar.close >= upper[i] && state == Signal::Long {
                state = Signal::Flat;
            }
            state
        })
        .collect()
}

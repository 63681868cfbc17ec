//! SMA crossover — long while the short average is above the long average.
//!
//! Both averages must be defined (past warmup); earlier bars are Flat.

use crate::domain::Bar;
use crate::indicators::{Indicator, Sma};
use crate::strategy::Signal;

pub(super) fn signals(short_period: usize, long_period: usize, bars: &[Bar]) -> Vec<Signal> {
    let short = Sma::new(short_period).compute(bars);
    let long = Sma::new(long_period).compute(bars);

    (0..bars.len())
        .map(|i| {
            if !short[i].is_nan() && !long[i].is_nan() && short[i] > long[i] {
                Signal::Long
            } else {
                Signal::Flat
            }
        })
        .collect()
}

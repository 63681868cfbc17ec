//! Strategy engine — pure mapping from (spec, series) to a signal sequence.
//!
//! Strategies form a closed set: [`StrategySpec`] enumerates every variant
//! together with its parameters, and [`StrategySpec::generate_signal`] is
//! the single dispatch point. Signal generation is referentially
//! transparent — same inputs, same output — which is what makes the
//! optimizer's parallel fan-out safe without locking.
//!
//! A signal is a per-bar *position state* (Long / Flat / Short), not a
//! buy/sell impulse; the simulation engine derives trades from state
//! transitions. The value at index i depends only on bars <= i.

pub mod bollinger;
pub mod buy_hold;
pub mod macd;
pub mod rsi_reversion;
pub mod sma_crossover;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::PriceSeries;

/// Position state for one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Signal {
    Long,
    Flat,
    Short,
}

impl Signal {
    /// Position direction as a multiplier: +1 long, 0 flat, -1 short.
    pub fn direction(&self) -> f64 {
        match self {
            Signal::Long => 1.0,
            Signal::Flat => 0.0,
            Signal::Short => -1.0,
        }
    }
}

/// Errors from parameter validation or signal generation.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("invalid parameters: {constraint}")]
    InvalidParameters { constraint: String },
    #[error("insufficient history: {required} bars required, {actual} available")]
    InsufficientHistory { required: usize, actual: usize },
}

/// A strategy variant with its parameters.
///
/// Serialized with a `type` tag so external collaborators can name
/// variants in structured requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrategySpec {
    /// Long while the short SMA is above the long SMA.
    SmaCrossover { short_period: usize, long_period: usize },

    /// Enter long when RSI drops below the lower threshold, exit when it
    /// rises above the upper threshold.
    RsiMeanReversion {
        period: usize,
        lower_threshold: f64,
        upper_threshold: f64,
    },

    /// Enter long at the lower band, exit at the upper band.
    BollingerBands { period: usize, std_dev: f64 },

    /// Long while the MACD line is above its signal line.
    Macd {
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    },

    /// Long from the first bar to the last. Baseline benchmark.
    BuyAndHold,
}

impl StrategySpec {
    /// Human-readable variant name for reports and logs.
    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::SmaCrossover { .. } => "sma_crossover",
            StrategySpec::RsiMeanReversion { .. } => "rsi_mean_reversion",
            StrategySpec::BollingerBands { .. } => "bollinger_bands",
            StrategySpec::Macd { .. } => "macd",
            StrategySpec::BuyAndHold => "buy_and_hold",
        }
    }

    /// Check parameter constraints. Violations are reported, never clamped.
    pub fn validate(&self) -> Result<(), StrategyError> {
        let fail = |constraint: &str| {
            Err(StrategyError::InvalidParameters {
                constraint: constraint.to_string(),
            })
        };
        match *self {
            StrategySpec::SmaCrossover {
                short_period,
                long_period,
            } => {
                if short_period < 2 {
                    return fail("short_period must be at least 2");
                }
                if short_period >= long_period {
                    return fail("short_period must be less than long_period");
                }
                if long_period > 200 {
                    return fail("long_period must not exceed 200");
                }
                Ok(())
            }
            StrategySpec::RsiMeanReversion {
                period,
                lower_threshold,
                upper_threshold,
            } => {
                if period < 2 {
                    return fail("period must be at least 2");
                }
                if !(lower_threshold > 0.0 && lower_threshold < 100.0) {
                    return fail("lower_threshold must be within (0, 100)");
                }
                if !(upper_threshold > 0.0 && upper_threshold < 100.0) {
                    return fail("upper_threshold must be within (0, 100)");
                }
                if lower_threshold >= upper_threshold {
                    return fail("lower_threshold must be less than upper_threshold");
                }
                Ok(())
            }
            StrategySpec::BollingerBands { period, std_dev } => {
                if period < 2 {
                    return fail("period must be at least 2");
                }
                if !(std_dev > 0.0) {
                    return fail("std_dev must be positive");
                }
                Ok(())
            }
            StrategySpec::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => {
                if fast_period < 2 {
                    return fail("fast_period must be at least 2");
                }
                if fast_period >= slow_period {
                    return fail("fast_period must be less than slow_period");
                }
                if signal_period < 1 {
                    return fail("signal_period must be at least 1");
                }
                Ok(())
            }
            StrategySpec::BuyAndHold => Ok(()),
        }
    }

    /// Warmup: bars consumed before the first defined signal.
    pub fn warmup(&self) -> usize {
        match *self {
            StrategySpec::SmaCrossover { long_period, .. } => long_period,
            StrategySpec::RsiMeanReversion { period, .. } => period,
            StrategySpec::BollingerBands { period, .. } => period,
            StrategySpec::Macd {
                slow_period,
                signal_period,
                ..
            } => slow_period + signal_period,
            StrategySpec::BuyAndHold => 0,
        }
    }

    /// Minimum series length this variant accepts.
    pub fn required_history(&self) -> usize {
        self.warmup() + 1
    }

    /// Generate the per-bar position-state sequence for this variant.
    ///
    /// Validates parameters, checks history length, then dispatches.
    /// The output is aligned 1:1 with the series.
    pub fn generate_signal(&self, series: &PriceSeries) -> Result<Vec<Signal>, StrategyError> {
        self.validate()?;

        let required = self.required_history();
        if series.len() < required {
            return Err(StrategyError::InsufficientHistory {
                required,
                actual: series.len(),
            });
        }

        let bars = series.bars();
        let signals = match *self {
            StrategySpec::SmaCrossover {
                short_period,
                long_period,
            } => sma_crossover::signals(short_period, long_period, bars),
            StrategySpec::RsiMeanReversion {
                period,
                lower_threshold,
                upper_threshold,
            } => rsi_reversion::signals(period, lower_threshold, upper_threshold, bars),
            StrategySpec::BollingerBands { period, std_dev } => {
                bollinger::signals(period, std_dev, bars)
            }
            StrategySpec::Macd {
                fast_period,
                slow_period,
                signal_period,
            } => macd::signals(fast_period, slow_period, signal_period, bars),
            StrategySpec::BuyAndHold => buy_hold::signals(bars),
        };

        debug_assert_eq!(signals.len(), series.len());
        Ok(signals)
    }
}

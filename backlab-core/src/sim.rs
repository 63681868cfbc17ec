//! Simulation engine — signals + prices in, trade ledger + equity curve out.
//!
//! Execution contract (applied uniformly):
//! - A position-state change at bar i executes at `close[i]` (same-bar
//!   close). A Long→Short flip closes one trade and opens the next at the
//!   same close.
//! - Equity starts at [`EQUITY_BASE`] on the first bar and compounds
//!   multiplicatively while a position is held; flat periods carry equity
//!   forward unchanged.
//! - The cost model is a flat fraction per round trip, recognized on the
//!   exit bar: the exit bar's equity and the trade's `return_pct` are both
//!   scaled by `(1 - cost_per_trade)`.
//! - A position still open at the last bar is closed at the final close
//!   and recorded as a trade, costs included.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, Trade, TradeDirection};
use crate::strategy::Signal;

/// Equity curve base value on the first bar.
pub const EQUITY_BASE: f64 = 1.0;

/// Flat transaction-cost assumption: fraction of equity per round trip.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostModel {
    pub cost_per_trade: f64,
}

impl CostModel {
    pub fn none() -> Self {
        Self { cost_per_trade: 0.0 }
    }

    pub fn new(cost_per_trade: f64) -> Self {
        Self { cost_per_trade }
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::none()
    }
}

/// Output of a simulation run: the trade ledger and the equity curve,
/// both owned by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    pub trades: Vec<Trade>,
    pub equity: Vec<f64>,
}

/// Input mismatches the engine checks before walking the bars. The
/// strategy layer's preconditions normally make these unreachable.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("price series is empty")]
    EmptySeries,
    #[error("signal length {signal_len} does not match series length {series_len}")]
    SignalLengthMismatch {
        signal_len: usize,
        series_len: usize,
    },
}

struct OpenPosition {
    entry_index: usize,
    entry_price: f64,
    direction: TradeDirection,
}

/// Walk the signal sequence over the series and produce the trade ledger
/// and equity curve. Pure: identical inputs yield identical output.
pub fn simulate(
    series: &PriceSeries,
    signals: &[Signal],
    cost: &CostModel,
) -> Result<Simulation, SimError> {
    if series.is_empty() {
        return Err(SimError::EmptySeries);
    }
    if signals.len() != series.len() {
        return Err(SimError::SignalLengthMismatch {
            signal_len: signals.len(),
            series_len: series.len(),
        });
    }

    let bars = series.bars();
    let n = bars.len();
    let cost_factor = 1.0 - cost.cost_per_trade;

    let mut equity = Vec::with_capacity(n);
    equity.push(EQUITY_BASE);

    let mut trades = Vec::new();
    let mut held = Signal::Flat;
    let mut open: Option<OpenPosition> = None;

    // Bar 0: equity records the pre-execution base; an immediate entry
    // opens at the first close.
    if signals[0] != Signal::Flat {
        held = signals[0];
        open = Some(OpenPosition {
            entry_index: 0,
            entry_price: bars[0].close,
            direction: direction_of(signals[0]),
        });
    }

    for i in 1..n {
        let prev_close = bars[i - 1].close;
        let close = bars[i].close;

        // Mark the held position over [i-1, i]. A short wiped out by a
        // doubling bar floors at zero rather than going negative.
        let mut factor = if held == Signal::Flat || prev_close <= 0.0 {
            1.0
        } else {
            let ret = close / prev_close - 1.0;
            (1.0 + held.direction() * ret).max(0.0)
        };

        if signals[i] != held {
            if let Some(pos) = open.take() {
                // Round-trip cost recognized on the exit bar.
                factor *= cost_factor;
                trades.push(close_trade(pos, i, close, cost_factor));
            }
            if signals[i] != Signal::Flat {
                open = Some(OpenPosition {
                    entry_index: i,
                    entry_price: close,
                    direction: direction_of(signals[i]),
                });
            }
            held = signals[i];
        }

        equity.push(equity[i - 1] * factor);
    }

    // Close out a position still open at the last bar. On a single-bar
    // series the entry is the mark-out: no round trip happened, no cost,
    // and the first bar keeps the base value.
    if let Some(pos) = open.take() {
        let last = n - 1;
        let close = bars[last].close;
        let factor = if last == 0 { 1.0 } else { cost_factor };
        equity[last] *= factor;
        trades.push(close_trade(pos, last, close, factor));
    }

    Ok(Simulation { trades, equity })
}

fn direction_of(signal: Signal) -> TradeDirection {
    match signal {
        Signal::Short => TradeDirection::Short,
        _ => TradeDirection::Long,
    }
}

fn close_trade(pos: OpenPosition, exit_index: usize, exit_price: f64, cost_factor: f64) -> Trade {
    let gross = if pos.entry_price > 0.0 {
        exit_price / pos.entry_price - 1.0
    } else {
        0.0
    };
    let directional = match pos.direction {
        TradeDirection::Long => gross,
        TradeDirection::Short => -gross,
    };
    let return_pct = (1.0 + directional).max(0.0) * cost_factor - 1.0;

    Trade {
        entry_index: pos.entry_index,
        entry_price: pos.entry_price,
        exit_index,
        exit_price,
        direction: pos.direction,
        return_pct,
    }
}

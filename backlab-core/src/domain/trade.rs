//! Trade — one completed round trip, derived from signal transitions.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TradeDirection {
    Long,
    Short,
}

/// A closed position: entry and exit bar indices and prices, plus the net
/// fractional return after transaction costs on both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trade {
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_price: f64,
    pub direction: TradeDirection,
    pub return_pct: f64,
}

impl Trade {
    pub fn is_winner(&self) -> bool {
        self.return_pct > 0.0
    }

    /// Bars between entry and exit (0 for same-bar round trips).
    pub fn bars_held(&self) -> usize {
        self.exit_index - self.entry_index
    }
}

//! BackLab Core — domain types, indicators, strategies, equity simulation.
//!
//! This crate contains the pure half of the backtesting pipeline:
//! - Domain types (bars, validated price series, trades)
//! - Vectorized indicators (SMA, EMA, RSI, Bollinger, MACD)
//! - The strategy engine: a closed variant set mapping (spec, series) to
//!   a per-bar position-state sequence
//! - The simulation engine: signals + prices to trade ledger + equity curve
//!
//! Everything here is a pure function over immutable inputs, which is what
//! lets the runner crate fan evaluations out across threads without locks.

pub mod domain;
pub mod indicators;
pub mod sim;
pub mod strategy;

pub use domain::{Bar, PriceSeries, SeriesError, Trade, TradeDirection};
pub use sim::{simulate, CostModel, SimError, Simulation, EQUITY_BASE};
pub use strategy::{Signal, StrategyError, StrategySpec};

//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod interval;
pub mod signal;
pub mod strategy;

pub use indicators::{
    AdxIndicator, AtrIndicator, BollingerBandsIndicator, Candle, EmaIndicator, MacdIndicator,
    RsiIndicator,
};
pub use interval::{Interval, ParseIntervalError};
pub use signal::{
    metric_value, ConsensusResult, Metrics, ParseDirectionError, SignalDirection, SignalTriple,
};
pub use strategy::{
    ConfigurationError, LabelSpec, SignalCategory, StrategyConfig, WeightingProfile,
    RESERVED_PARAMETER_NAMES,
};

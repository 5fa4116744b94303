//! Strategy execution over tickers and intervals.

pub mod runner;

pub use runner::{AnalysisRequest, RunnerError, StrategyRunner};

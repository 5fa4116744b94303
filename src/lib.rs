//! Confluence: technical-analysis signal fusion.
//!
//! Strategies read candles per ticker and interval, derive independent
//! trend, momentum, mean-reversion and volatility signals, and fuse them
//! into one consensus call per pair under a strategy-specific weighting.

pub mod common;
pub mod config;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;
pub mod strategies;

//! Environment-driven configuration.
//!
//! Variables (all optional):
//! - `ENVIRONMENT`: `production`/`prod` switches logging to JSON
//! - `STRATEGY`: preset name, default `EMAStrategy`
//! - `TICKERS`: comma-separated tickers
//! - `INTERVALS`: comma-separated interval labels, default `1d`
//! - `DATA_DIR`: directory of `<TICKER>_<interval>.json` candle files
//! - `NEUTRAL_THRESHOLD`: fusion dead band in [0, 1), default 0
//! - `WORKER_CONCURRENCY`: pairs evaluated in parallel
//! - `SHOW_REASONING`: dump the report to stderr
//! - `AGENT_NAME`: name on the emitted message

use crate::models::interval::Interval;
use crate::report::DEFAULT_AGENT_NAME;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

impl ConfigError {
    fn new(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Deployment environment name, `sandbox` unless `ENVIRONMENT` says otherwise.
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub strategy: String,
    pub tickers: Vec<String>,
    pub intervals: Vec<Interval>,
    pub data_dir: PathBuf,
    pub neutral_threshold: f64,
    pub concurrency: usize,
    pub show_reasoning: bool,
    pub agent_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: "EMAStrategy".to_string(),
            tickers: Vec::new(),
            intervals: vec![Interval::OneDay],
            data_dir: PathBuf::from("data"),
            neutral_threshold: 0.0,
            concurrency: default_concurrency(),
            show_reasoning: false,
            agent_name: DEFAULT_AGENT_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(strategy) = lookup("STRATEGY") {
            let strategy = strategy.trim();
            if strategy.is_empty() {
                return Err(ConfigError::new("STRATEGY", strategy, "must not be empty"));
            }
            config.strategy = strategy.to_string();
        }

        if let Some(raw) = lookup("TICKERS") {
            config.tickers = split_list(&raw);
        }

        if let Some(raw) = lookup("INTERVALS") {
            config.intervals = split_list(&raw)
                .iter()
                .map(|label| {
                    label
                        .parse::<Interval>()
                        .map_err(|e| ConfigError::new("INTERVALS", &raw, e.to_string()))
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(raw) = lookup("NEUTRAL_THRESHOLD") {
            let threshold: f64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::new("NEUTRAL_THRESHOLD", &raw, "not a number"))?;
            if !threshold.is_finite() || !(0.0..1.0).contains(&threshold) {
                return Err(ConfigError::new(
                    "NEUTRAL_THRESHOLD",
                    &raw,
                    "must be within [0, 1)",
                ));
            }
            config.neutral_threshold = threshold;
        }

        if let Some(raw) = lookup("WORKER_CONCURRENCY") {
            config.concurrency = match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::new(
                        "WORKER_CONCURRENCY",
                        &raw,
                        "must be a positive integer",
                    ))
                }
            };
        }

        if let Some(raw) = lookup("SHOW_REASONING") {
            config.show_reasoning = parse_flag(&raw)
                .ok_or_else(|| ConfigError::new("SHOW_REASONING", &raw, "expected true or false"))?;
        }

        if let Some(name) = lookup("AGENT_NAME") {
            if !name.trim().is_empty() {
                config.agent_name = name.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

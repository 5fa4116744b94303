//! Signal directions and the triples adapters emit.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Indicator readings attached to a signal, keyed by metric name.
pub type Metrics = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalDirection {
    /// +1 for bullish, -1 for bearish, 0 for neutral.
    pub fn sign(self) -> f64 {
        match self {
            SignalDirection::Bullish => 1.0,
            SignalDirection::Bearish => -1.0,
            SignalDirection::Neutral => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalDirection::Bullish => "bullish",
            SignalDirection::Bearish => "bearish",
            SignalDirection::Neutral => "neutral",
        }
    }
}

impl fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized signal direction '{0}'")]
pub struct ParseDirectionError(pub String);

impl FromStr for SignalDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullish" => Ok(SignalDirection::Bullish),
            "bearish" => Ok(SignalDirection::Bearish),
            "neutral" => Ok(SignalDirection::Neutral),
            other => Err(ParseDirectionError(other.to_string())),
        }
    }
}

/// Output of one signal source for one ticker/interval series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTriple {
    #[serde(rename = "signal")]
    pub direction: SignalDirection,
    pub confidence: f64,
    #[serde(default)]
    pub metrics: Metrics,
}

impl SignalTriple {
    pub fn new(direction: SignalDirection, confidence: f64) -> Self {
        Self {
            direction,
            confidence,
            metrics: Metrics::new(),
        }
    }

    /// Neutral, zero-confidence triple used when a series has no usable data.
    pub fn neutral() -> Self {
        Self::new(SignalDirection::Neutral, 0.0)
    }

    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), metric_value(value));
        self
    }

    pub fn with_metric_value(mut self, name: &str, value: Value) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }
}

/// JSON-safe metric: NaN and infinities become `null`.
pub fn metric_value(value: f64) -> Value {
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// Fused decision for one ticker/interval pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    #[serde(rename = "signal")]
    pub direction: SignalDirection,
    pub confidence: f64,
}

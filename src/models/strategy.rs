//! Strategy variants as data: weighting profiles and label mappings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use thiserror::Error;

/// Misconfiguration of a strategy or weighting profile. Never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("weighting profile has no labels")]
    EmptyProfile,
    #[error("weight for label '{label}' must be finite and non-negative, got {weight}")]
    InvalidWeight { label: String, weight: f64 },
    #[error("no usable weight: every weight is zero or no weighted label is present")]
    NoUsableWeight,
    #[error("label '{0}' is not part of the weighting profile")]
    UnknownLabel(String),
    #[error("strategy '{strategy}': label '{label}' has no signal source mapping")]
    UnmappedLabel { strategy: String, label: String },
    #[error("strategy '{strategy}': no signal source registered for category '{category}' (label '{label}')")]
    MissingSource {
        strategy: String,
        label: String,
        category: SignalCategory,
    },
    #[error("neutral threshold must be finite and within [0, 1), got {0}")]
    InvalidThreshold(f64),
    #[error("unknown strategy preset '{0}'")]
    UnknownPreset(String),
    #[error("invalid strategy definition: {0}")]
    Parse(String),
    #[error("strategy '{strategy}': parameter '{name}' clashes with a report field")]
    ReservedParameter { strategy: String, name: String },
}

/// Fields of an analysis record; strategy parameters are reported next to
/// them and may not reuse these names.
pub const RESERVED_PARAMETER_NAMES: [&str; 4] =
    ["signal", "confidence", "strategy_signals", "degraded"];

/// Physical indicator family a label is backed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    MeanReversion,
    Volatility,
}

impl SignalCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            SignalCategory::Trend => "trend",
            SignalCategory::Momentum => "momentum",
            SignalCategory::MeanReversion => "mean_reversion",
            SignalCategory::Volatility => "volatility",
        }
    }

    pub fn all() -> Vec<SignalCategory> {
        vec![
            SignalCategory::Trend,
            SignalCategory::Momentum,
            SignalCategory::MeanReversion,
            SignalCategory::Volatility,
        ]
    }
}

impl fmt::Display for SignalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label to weight mapping. Weights are finite, non-negative and not all zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightingProfile {
    weights: BTreeMap<String, f64>,
}

impl WeightingProfile {
    pub fn new(weights: BTreeMap<String, f64>) -> Result<Self, ConfigurationError> {
        if weights.is_empty() {
            return Err(ConfigurationError::EmptyProfile);
        }
        for (label, &weight) in &weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigurationError::InvalidWeight {
                    label: label.clone(),
                    weight,
                });
            }
        }
        if weights.values().all(|&w| w == 0.0) {
            return Err(ConfigurationError::NoUsableWeight);
        }
        Ok(Self { weights })
    }

    /// Build from `(label, weight)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self::new(pairs.into_iter().map(|(l, w)| (l.into(), w)).collect())
    }

    /// Profile that skips validation. Fusion still rejects a zero denominator.
    pub fn unchecked(weights: BTreeMap<String, f64>) -> Self {
        Self { weights }
    }

    pub fn weight(&self, label: &str) -> Option<f64> {
        self.weights.get(label).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.weights.contains_key(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.weights.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(l, &w)| (l.as_str(), w))
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Which source backs a label, and how much it counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub category: SignalCategory,
    pub weight: f64,
}

/// A strategy variant: named label mapping, weights and descriptive parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub name: String,
    /// Labels in declaration order, which is also their report order.
    pub labels: IndexMap<String, LabelSpec>,
    /// Copied verbatim into every analysis record of this strategy.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, Value>,
}

impl StrategyConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            labels: IndexMap::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: &str, category: SignalCategory, weight: f64) -> Self {
        self.labels
            .insert(label.to_string(), LabelSpec { category, weight });
        self
    }

    pub fn with_parameter(mut self, name: &str, value: Value) -> Self {
        self.parameters.insert(name.to_string(), value);
        self
    }

    /// Combine a weighting profile with a separate label to category mapping.
    /// Both must cover exactly the same labels.
    pub fn from_parts(
        name: impl Into<String>,
        profile: &WeightingProfile,
        mapping: &BTreeMap<String, SignalCategory>,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        let mut config = Self::new(name.clone());
        for (label, weight) in profile.iter() {
            let category = mapping
                .get(label)
                .ok_or_else(|| ConfigurationError::UnmappedLabel {
                    strategy: name.clone(),
                    label: label.to_string(),
                })?;
            config = config.with_label(label, *category, weight);
        }
        if let Some(extra) = mapping.keys().find(|label| !profile.contains(label)) {
            return Err(ConfigurationError::UnknownLabel(extra.clone()));
        }
        Ok(config)
    }

    /// Weighting profile derived from the label specs.
    pub fn profile(&self) -> Result<WeightingProfile, ConfigurationError> {
        WeightingProfile::new(
            self.labels
                .iter()
                .map(|(label, spec)| (label.clone(), spec.weight))
                .collect(),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if let Some(name) = self
            .parameters
            .keys()
            .find(|name| RESERVED_PARAMETER_NAMES.contains(&name.as_str()))
        {
            return Err(ConfigurationError::ReservedParameter {
                strategy: self.name.clone(),
                name: name.clone(),
            });
        }
        self.profile().map(|_| ())
    }

    /// Distinct source categories this strategy reads.
    pub fn categories(&self) -> BTreeSet<SignalCategory> {
        self.labels.values().map(|spec| spec.category).collect()
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigurationError> {
        let config: StrategyConfig =
            serde_json::from_str(json).map_err(|e| ConfigurationError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Trend-heavy EMA strategy.
    pub fn ema() -> Self {
        Self::new("EMAStrategy")
            .with_label("ema_crossovers", SignalCategory::Trend, 0.45)
            .with_label("ema_slope", SignalCategory::Momentum, 0.30)
            .with_label("price_to_ema", SignalCategory::MeanReversion, 0.15)
            .with_label("multi_timeframe", SignalCategory::Trend, 0.05)
            .with_label("ema_volatility", SignalCategory::Volatility, 0.05)
            .with_parameter(
                "ema_periods",
                json!({
                    "short": [3, 5, 8],
                    "medium": [13, 21, 34],
                    "long": [55, 89, 144],
                }),
            )
    }

    /// Momentum-dominated RSI strategy.
    pub fn rsi() -> Self {
        Self::new("RSIStrategy")
            .with_label("rsi_overbought_oversold", SignalCategory::MeanReversion, 0.05)
            .with_label("rsi_divergence", SignalCategory::Trend, 0.05)
            .with_label("rsi_trend_strength", SignalCategory::Momentum, 0.05)
            .with_label("rsi_volatility", SignalCategory::Volatility, 0.05)
            .with_label("momentum", SignalCategory::Momentum, 0.80)
    }

    pub fn presets() -> Vec<StrategyConfig> {
        vec![Self::ema(), Self::rsi()]
    }

    /// Look up a preset by name, ignoring case and an optional `Strategy` suffix.
    pub fn preset(name: &str) -> Result<Self, ConfigurationError> {
        let wanted = normalize_preset_name(name);
        Self::presets()
            .into_iter()
            .find(|preset| normalize_preset_name(&preset.name) == wanted)
            .ok_or_else(|| ConfigurationError::UnknownPreset(name.to_string()))
    }
}

fn normalize_preset_name(name: &str) -> String {
    let lower = name.trim().to_ascii_lowercase();
    lower
        .strip_suffix("strategy")
        .map(str::to_string)
        .unwrap_or(lower)
}

//! Confidence-weighted voting over labeled signals.

use crate::models::signal::{ConsensusResult, SignalDirection, SignalTriple};
use crate::models::strategy::{ConfigurationError, WeightingProfile};
use crate::signals::scoring::{calculate_confidence, clamp_unit, direction_from_score};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Signals for one ticker/interval pair keyed by label.
pub type LabeledSignalSet = BTreeMap<String, SignalTriple>;

/// Signed share of one label in the fused score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelContribution {
    pub label: String,
    pub weight: f64,
    pub direction: SignalDirection,
    pub confidence: f64,
    /// `weight * confidence * sign(direction)`
    pub contribution: f64,
}

/// Normalized score and the contributions it was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FusionBreakdown {
    pub score: f64,
    pub total_weight: f64,
    pub contributions: Vec<LabelContribution>,
}

/// Fuses labeled signals under a weighting profile.
///
/// `S = Σ(w · confidence · sign) / Σw` over labels present with `w > 0`.
/// The direction is bullish when `S > ε`, bearish when `S < -ε`, neutral
/// otherwise; the confidence is `|S|` clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FusionEngine {
    neutral_threshold: f64,
}

impl Default for FusionEngine {
    fn default() -> Self {
        Self {
            neutral_threshold: 0.0,
        }
    }
}

impl FusionEngine {
    pub fn new(neutral_threshold: f64) -> Result<Self, ConfigurationError> {
        if !neutral_threshold.is_finite() || !(0.0..1.0).contains(&neutral_threshold) {
            return Err(ConfigurationError::InvalidThreshold(neutral_threshold));
        }
        Ok(Self { neutral_threshold })
    }

    pub fn neutral_threshold(&self) -> f64 {
        self.neutral_threshold
    }

    /// Per-label contributions and the normalized score.
    pub fn breakdown(
        &self,
        signals: &LabeledSignalSet,
        profile: &WeightingProfile,
    ) -> Result<FusionBreakdown, ConfigurationError> {
        let mut contributions = Vec::with_capacity(signals.len());

        for (label, triple) in signals {
            let weight = profile
                .weight(label)
                .ok_or_else(|| ConfigurationError::UnknownLabel(label.clone()))?;
            if weight.is_nan() || weight <= 0.0 {
                continue;
            }
            let confidence = clamp_unit(triple.confidence);
            contributions.push(LabelContribution {
                label: label.clone(),
                weight,
                direction: triple.direction,
                confidence,
                contribution: weight * confidence * triple.direction.sign(),
            });
        }

        let total_weight: f64 = contributions.iter().map(|c| c.weight).sum();
        if total_weight <= 0.0 {
            return Err(ConfigurationError::NoUsableWeight);
        }

        let score = contributions.iter().map(|c| c.contribution).sum::<f64>() / total_weight;

        Ok(FusionBreakdown {
            score,
            total_weight,
            contributions,
        })
    }

    pub fn fuse(
        &self,
        signals: &LabeledSignalSet,
        profile: &WeightingProfile,
    ) -> Result<ConsensusResult, ConfigurationError> {
        let breakdown = self.breakdown(signals, profile)?;
        let consensus = ConsensusResult {
            direction: direction_from_score(breakdown.score, self.neutral_threshold),
            confidence: calculate_confidence(breakdown.score),
        };

        debug!(
            score = breakdown.score,
            total_weight = breakdown.total_weight,
            labels = breakdown.contributions.len(),
            direction = %consensus.direction,
            confidence = consensus.confidence,
            "FusionEngine: fused {} weighted signals",
            breakdown.contributions.len()
        );

        Ok(consensus)
    }
}

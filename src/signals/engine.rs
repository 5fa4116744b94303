//! Evaluation of one ticker/interval series under one strategy.

use crate::indicators::registry::{SourceError, SourceRegistry};
use crate::models::indicators::Candle;
use crate::models::signal::{ConsensusResult, SignalTriple};
use crate::models::strategy::{ConfigurationError, SignalCategory, StrategyConfig, WeightingProfile};
use crate::signals::fusion::{FusionEngine, LabeledSignalSet};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PairError {
    #[error("{category} source '{source_name}' failed: {error}")]
    Source {
        category: SignalCategory,
        source_name: &'static str,
        #[source]
        error: SourceError,
    },
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Labeled signals and their consensus for one pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairEvaluation {
    pub signals: LabeledSignalSet,
    pub consensus: ConsensusResult,
}

pub struct SignalEngine;

impl SignalEngine {
    /// Run every source the strategy needs, each exactly once.
    pub fn compute_sources(
        candles: &[Candle],
        strategy: &StrategyConfig,
        registry: &SourceRegistry,
    ) -> Result<BTreeMap<SignalCategory, SignalTriple>, PairError> {
        let mut computed = BTreeMap::new();

        for category in strategy.categories() {
            let source = registry.get(category).ok_or_else(|| {
                let label = strategy
                    .labels
                    .iter()
                    .find(|(_, spec)| spec.category == category)
                    .map(|(label, _)| label.clone())
                    .unwrap_or_default();
                ConfigurationError::MissingSource {
                    strategy: strategy.name.clone(),
                    label,
                    category,
                }
            })?;

            let triple = source.compute(candles).map_err(|error| PairError::Source {
                category,
                source_name: source.name(),
                error,
            })?;
            trace!(
                category = %category,
                source = source.name(),
                direction = %triple.direction,
                confidence = triple.confidence,
                "SignalEngine: computed source"
            );
            computed.insert(category, triple);
        }

        Ok(computed)
    }

    /// Fan computed sources out to the strategy's labels.
    pub fn label_signals(
        strategy: &StrategyConfig,
        computed: &BTreeMap<SignalCategory, SignalTriple>,
    ) -> LabeledSignalSet {
        strategy
            .labels
            .iter()
            .filter_map(|(label, spec)| {
                computed
                    .get(&spec.category)
                    .map(|triple| (label.clone(), triple.clone()))
            })
            .collect()
    }

    pub fn evaluate(
        candles: &[Candle],
        strategy: &StrategyConfig,
        profile: &WeightingProfile,
        registry: &SourceRegistry,
        fusion: &FusionEngine,
    ) -> Result<PairEvaluation, PairError> {
        let computed = Self::compute_sources(candles, strategy, registry)?;
        let signals = Self::label_signals(strategy, &computed);
        let consensus = fusion.fuse(&signals, profile)?;
        Ok(PairEvaluation { signals, consensus })
    }
}

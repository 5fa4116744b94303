//! Signal source trait and the registry that maps categories onto sources.

use crate::indicators::error::IndicatorError;
use crate::models::indicators::Candle;
use crate::models::signal::SignalTriple;
use crate::models::strategy::SignalCategory;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Failure of a signal source for reasons other than missing data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("malformed series: {0}")]
    MalformedSeries(#[from] IndicatorError),
    #[error("{source_name} failed: {message}")]
    Failed {
        source_name: String,
        message: String,
    },
}

/// Derives one normalized signal from a candle series.
///
/// Implementations are pure: the same series always yields the same triple.
/// An empty or too-short series yields [`SignalTriple::neutral`], never an error.
pub trait SignalSource: Send + Sync {
    /// Get the category this source backs
    fn category(&self) -> SignalCategory;

    /// Get the name of the source
    fn name(&self) -> &'static str;

    fn compute(&self, candles: &[Candle]) -> Result<SignalTriple, SourceError>;
}

/// One shared source per category.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<SignalCategory, Arc<dyn SignalSource>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in source for every category
    pub fn with_defaults() -> Self {
        use crate::signals::sources::{
            MeanReversionSignals, MomentumSignals, TrendSignals, VolatilitySignals,
        };

        Self::new()
            .with_source(Arc::new(TrendSignals::default()))
            .with_source(Arc::new(MomentumSignals::default()))
            .with_source(Arc::new(MeanReversionSignals::default()))
            .with_source(Arc::new(VolatilitySignals::default()))
    }

    /// Register a source under its own category, replacing any previous one
    pub fn register(&mut self, source: Arc<dyn SignalSource>) {
        self.sources.insert(source.category(), source);
    }

    pub fn with_source(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.register(source);
        self
    }

    pub fn get(&self, category: SignalCategory) -> Option<&Arc<dyn SignalSource>> {
        self.sources.get(&category)
    }

    pub fn contains(&self, category: SignalCategory) -> bool {
        self.sources.contains_key(&category)
    }

    /// Registered categories in a stable order
    pub fn categories(&self) -> Vec<SignalCategory> {
        let mut categories: Vec<_> = self.sources.keys().copied().collect();
        categories.sort();
        categories
    }
}

use crate::models::signal::{ConsensusResult, Metrics, SignalDirection, SignalTriple};
use crate::signals::scoring::to_percentage;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One label's own call, as reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDetail {
    pub signal: SignalDirection,
    /// Integer percentage, 0 to 100.
    pub confidence: u8,
    pub metrics: Metrics,
}

impl From<&SignalTriple> for LabelDetail {
    fn from(triple: &SignalTriple) -> Self {
        Self {
            signal: triple.direction,
            confidence: to_percentage(triple.confidence),
            metrics: triple.metrics.clone(),
        }
    }
}

/// Fused call for one ticker/interval plus the detail behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub signal: SignalDirection,
    /// Integer percentage, 0 to 100.
    pub confidence: u8,
    /// Strategy parameters, reported next to the decision.
    #[serde(flatten)]
    pub parameters: BTreeMap<String, Value>,
    /// Per-label detail in strategy declaration order.
    pub strategy_signals: IndexMap<String, LabelDetail>,
    /// Set when the pair could not be evaluated and was isolated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl AnalysisRecord {
    /// `signals` are reported in the order given.
    pub fn new<'a, I>(
        consensus: &ConsensusResult,
        signals: I,
        parameters: &BTreeMap<String, Value>,
    ) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a SignalTriple)>,
    {
        Self {
            signal: consensus.direction,
            confidence: to_percentage(consensus.confidence),
            parameters: parameters.clone(),
            strategy_signals: signals
                .into_iter()
                .map(|(label, triple)| (label.clone(), LabelDetail::from(triple)))
                .collect(),
            degraded: None,
        }
    }

    /// Neutral, zero-confidence record for a pair whose evaluation faulted.
    pub fn degraded(reason: impl Into<String>, parameters: &BTreeMap<String, Value>) -> Self {
        Self {
            signal: SignalDirection::Neutral,
            confidence: 0,
            parameters: parameters.clone(),
            strategy_signals: IndexMap::new(),
            degraded: Some(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Records keyed by ticker, then by interval label, both in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisReport {
    entries: IndexMap<String, IndexMap<String, AnalysisRecord>>,
}

impl AnalysisReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty entry for `ticker` so it is reported even without intervals.
    pub fn ensure_ticker(&mut self, ticker: &str) {
        self.entries.entry(ticker.to_string()).or_default();
    }

    pub fn insert(&mut self, ticker: &str, interval: &str, record: AnalysisRecord) {
        self.entries
            .entry(ticker.to_string())
            .or_default()
            .insert(interval.to_string(), record);
    }

    pub fn get(&self, ticker: &str, interval: &str) -> Option<&AnalysisRecord> {
        self.entries.get(ticker)?.get(interval)
    }

    pub fn ticker(&self, ticker: &str) -> Option<&IndexMap<String, AnalysisRecord>> {
        self.entries.get(ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Every `(ticker, interval, record)` in insertion order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &AnalysisRecord)> {
        self.entries.iter().flat_map(|(ticker, intervals)| {
            intervals
                .iter()
                .map(move |(interval, record)| (ticker.as_str(), interval.as_str(), record))
        })
    }

    /// Number of ticker/interval pairs.
    pub fn len(&self) -> usize {
        self.entries.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn degraded_count(&self) -> usize {
        self.records().filter(|(_, _, r)| r.is_degraded()).count()
    }

    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

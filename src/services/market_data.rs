//! Candle series lookup keyed by ticker and interval.

use crate::models::indicators::Candle;
use crate::models::interval::Interval;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("series for {ticker} {interval} unavailable: {reason}")]
    Unavailable {
        ticker: String,
        interval: Interval,
        reason: String,
    },
}

/// Source of candle series.
///
/// "No data" is an empty series, never an error; errors are reserved for
/// genuine faults. Timeouts and retries belong to the implementation.
pub trait SeriesProvider: Send + Sync {
    fn get_series(&self, ticker: &str, interval: Interval) -> Result<Vec<Candle>, ProviderError>;
}

/// Series held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySeriesProvider {
    series: HashMap<(String, Interval), Vec<Candle>>,
}

impl InMemorySeriesProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: &str, interval: Interval, candles: Vec<Candle>) {
        self.series.insert((ticker.to_string(), interval), candles);
    }

    pub fn with_series(mut self, ticker: &str, interval: Interval, candles: Vec<Candle>) -> Self {
        self.insert(ticker, interval, candles);
        self
    }
}

impl SeriesProvider for InMemorySeriesProvider {
    fn get_series(&self, ticker: &str, interval: Interval) -> Result<Vec<Candle>, ProviderError> {
        Ok(self
            .series
            .get(&(ticker.to_string(), interval))
            .cloned()
            .unwrap_or_default())
    }
}

/// Reads `<dir>/<TICKER>_<interval>.json`, each a JSON array of candles.
/// A missing file is an empty series.
#[derive(Debug, Clone)]
pub struct JsonDirSeriesProvider {
    dir: PathBuf,
}

impl JsonDirSeriesProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn series_path(&self, ticker: &str, interval: Interval) -> PathBuf {
        self.dir.join(format!("{}_{}.json", ticker, interval))
    }
}

impl SeriesProvider for JsonDirSeriesProvider {
    fn get_series(&self, ticker: &str, interval: Interval) -> Result<Vec<Candle>, ProviderError> {
        let path = self.series_path(ticker, interval);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "JsonDirSeriesProvider: no series file, treating as empty");
                return Ok(Vec::new());
            }
            Err(source) => return Err(ProviderError::Io { path, source }),
        };

        serde_json::from_str(&raw).map_err(|source| ProviderError::Parse { path, source })
    }
}

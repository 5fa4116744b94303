use thiserror::Error;

/// A series that indicator math cannot be run on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("candle {index}: {field} is not a finite number")]
    NonFinite { index: usize, field: &'static str },
    #[error("candle {index}: {field} must be positive, got {value}")]
    NonPositivePrice {
        index: usize,
        field: &'static str,
        value: f64,
    },
    #[error("candle {index}: volume must not be negative, got {value}")]
    NegativeVolume { index: usize, value: f64 },
    #[error("candle {index}: high {high} is below low {low}")]
    InvertedRange { index: usize, high: f64, low: f64 },
}

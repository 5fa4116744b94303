//! Sanity checks applied to a series before any indicator runs on it.

use crate::indicators::error::IndicatorError;
use crate::models::indicators::Candle;

/// Reject candles with non-finite or non-positive prices, negative or
/// non-finite volume, or a high below the low.
pub fn validate_candles(candles: &[Candle]) -> Result<(), IndicatorError> {
    for (index, candle) in candles.iter().enumerate() {
        let prices = [
            ("open", candle.open),
            ("high", candle.high),
            ("low", candle.low),
            ("close", candle.close),
        ];
        for (field, value) in prices {
            if !value.is_finite() {
                return Err(IndicatorError::NonFinite { index, field });
            }
            if value <= 0.0 {
                return Err(IndicatorError::NonPositivePrice {
                    index,
                    field,
                    value,
                });
            }
        }
        if !candle.volume.is_finite() {
            return Err(IndicatorError::NonFinite {
                index,
                field: "volume",
            });
        }
        if candle.volume < 0.0 {
            return Err(IndicatorError::NegativeVolume {
                index,
                value: candle.volume,
            });
        }
        if candle.high < candle.low {
            return Err(IndicatorError::InvertedRange {
                index,
                high: candle.high,
                low: candle.low,
            });
        }
    }
    Ok(())
}

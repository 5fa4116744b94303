//! Average True Range and the short/long volatility regime built on it.

use crate::common::math;
use crate::models::indicators::{AtrIndicator, Candle};

/// True range of every bar after the first, oldest first.
pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .windows(2)
        .map(|bars| math::true_range(bars[1].high, bars[1].low, bars[0].close))
        .collect()
}

/// Mean true range over the latest `period` bars. Needs `period + 1` candles
/// since the first bar has no previous close.
pub fn calculate_atr(candles: &[Candle], period: u32) -> Option<AtrIndicator> {
    let window = period as usize;
    if window == 0 || candles.len() <= window {
        return None;
    }

    math::sma(&true_ranges(candles), window).map(|value| AtrIndicator { value, period })
}

pub fn calculate_atr_default(candles: &[Candle]) -> Option<AtrIndicator> {
    calculate_atr(candles, 14)
}

/// Short ATR over long ATR. Below 1 volatility is contracting, above 1 it is
/// expanding; a flat long ATR reads as 1.
pub fn calculate_atr_regime(
    candles: &[Candle],
    short_period: u32,
    long_period: u32,
) -> Option<(AtrIndicator, AtrIndicator, f64)> {
    let short = calculate_atr(candles, short_period)?;
    let long = calculate_atr(candles, long_period)?;
    let regime = if long.value > 0.0 {
        short.value / long.value
    } else {
        1.0
    };
    Some((short, long, regime))
}

//! EMA (Exponential Moving Average) indicator

use crate::common::math;
use crate::models::indicators::{Candle, EmaIndicator};
use crate::models::signal::SignalDirection;

/// Calculate EMA for a specific period
pub fn calculate_ema(candles: &[Candle], period: u32) -> Option<EmaIndicator> {
    if period == 0 || candles.len() < period as usize {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let ema_value = math::ema(&closes, period as usize)?;

    Some(EmaIndicator {
        value: ema_value,
        period,
    })
}

/// Calculate multiple EMAs at once
pub fn calculate_emas(candles: &[Candle], periods: &[u32]) -> Vec<EmaIndicator> {
    periods
        .iter()
        .filter_map(|&period| calculate_ema(candles, period))
        .collect()
}

/// Relative position of a fast EMA against a slow one.
/// Bullish when the fast EMA sits above the slow EMA.
pub fn check_ema_cross(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
) -> Option<SignalDirection> {
    let fast_ema = calculate_ema(candles, fast_period)?;
    let slow_ema = calculate_ema(candles, slow_period)?;

    if fast_ema.value > slow_ema.value {
        Some(SignalDirection::Bullish)
    } else if fast_ema.value < slow_ema.value {
        Some(SignalDirection::Bearish)
    } else {
        Some(SignalDirection::Neutral)
    }
}

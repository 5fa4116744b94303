//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::math;
use crate::models::indicators::{Candle, MacdIndicator};

/// Calculate MACD indicator
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
pub fn calculate_macd(
    candles: &[Candle],
    fast_period: u32,
    slow_period: u32,
    signal_period: u32,
) -> Option<MacdIndicator> {
    if fast_period == 0 || fast_period >= slow_period || signal_period == 0 {
        return None;
    }
    if candles.len() < slow_period as usize + signal_period as usize {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let fast_series = math::ema_series(&closes, fast_period as usize);
    let slow_series = math::ema_series(&closes, slow_period as usize);

    // Both series end at the last close; align the fast one onto the slow one.
    let offset = fast_series.len() - slow_series.len();
    let macd_values: Vec<f64> = slow_series
        .iter()
        .zip(&fast_series[offset..])
        .map(|(slow, fast)| fast - slow)
        .collect();

    let macd_line = *macd_values.last()?;
    let signal_line = math::ema(&macd_values, signal_period as usize)?;

    Some(MacdIndicator {
        macd: macd_line,
        signal: signal_line,
        histogram: macd_line - signal_line,
        period: Some((fast_period, slow_period, signal_period)),
    })
}

/// Calculate MACD with default periods (12, 26, 9)
pub fn calculate_macd_default(candles: &[Candle]) -> Option<MacdIndicator> {
    calculate_macd(candles, 12, 26, 9)
}

//! RSI (Relative Strength Index) indicator

use crate::models::indicators::{Candle, RsiIndicator};

/// Calculate RSI indicator
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss over the last `period` changes
pub fn calculate_rsi(candles: &[Candle], period: u32) -> Option<RsiIndicator> {
    if period == 0 || candles.len() < period as usize + 1 {
        return None;
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = candles
        .windows(2)
        .map(|pair| {
            let change = pair[1].close - pair[0].close;
            if change > 0.0 {
                (change, 0.0)
            } else {
                (0.0, change.abs())
            }
        })
        .unzip();

    let avg_gain: f64 = gains.iter().rev().take(period as usize).sum::<f64>() / period as f64;
    let avg_loss: f64 = losses.iter().rev().take(period as usize).sum::<f64>() / period as f64;

    let value = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - (100.0 / (1.0 + rs))
    };

    Some(RsiIndicator {
        value,
        period: Some(period),
    })
}

/// Calculate RSI with default period (14)
pub fn calculate_rsi_default(candles: &[Candle]) -> Option<RsiIndicator> {
    calculate_rsi(candles, 14)
}

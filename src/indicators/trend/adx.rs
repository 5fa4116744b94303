//! ADX (Average Directional Index) indicator

use crate::common::math;
use crate::indicators::volatility::true_ranges;
use crate::models::indicators::{AdxIndicator, Candle};

/// Calculate ADX indicator
///
/// ADX measures trend strength regardless of direction.
/// +DI and -DI come from smoothed directional movement over `period` bars,
/// and ADX is the EMA of the resulting DX series.
pub fn calculate_adx(candles: &[Candle], period: u32) -> Option<AdxIndicator> {
    let period = period as usize;
    if period == 0 || candles.len() < period * 2 + 1 {
        return None;
    }

    let tr_values = true_ranges(candles);
    let mut plus_dm_values = Vec::with_capacity(candles.len() - 1);
    let mut minus_dm_values = Vec::with_capacity(candles.len() - 1);

    for pair in candles.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        let up_move = curr.high - prev.high;
        let down_move = prev.low - curr.low;
        plus_dm_values.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm_values.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    let mut dx_values = Vec::with_capacity(tr_values.len() - period + 1);
    let mut plus_di = 0.0;
    let mut minus_di = 0.0;

    for end in period..=tr_values.len() {
        let atr = math::sma(&tr_values[..end], period)?;
        let plus_dm_avg = math::sma(&plus_dm_values[..end], period)?;
        let minus_dm_avg = math::sma(&minus_dm_values[..end], period)?;

        plus_di = if atr > 0.0 { 100.0 * plus_dm_avg / atr } else { 0.0 };
        minus_di = if atr > 0.0 { 100.0 * minus_dm_avg / atr } else { 0.0 };

        let di_sum = plus_di + minus_di;
        dx_values.push(if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        });
    }

    let adx_value = math::ema(&dx_values, period)?;

    Some(AdxIndicator {
        value: adx_value,
        plus_di,
        minus_di,
        period: period as u32,
    })
}

/// Calculate ADX with default period (14)
pub fn calculate_adx_default(candles: &[Candle]) -> Option<AdxIndicator> {
    calculate_adx(candles, 14)
}

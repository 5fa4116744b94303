//! Bollinger Bands: a moving mean wrapped in a multiple of its dispersion.

use crate::common::math;
use crate::models::indicators::{BollingerBandsIndicator, Candle};

/// Bands over the latest `period` closes, `std_dev` population deviations wide
/// on each side of the SMA.
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: u32,
    std_dev: f64,
) -> Option<BollingerBandsIndicator> {
    let window = period as usize;
    if window == 0 || candles.len() < window {
        return None;
    }

    let closes: Vec<f64> = candles[candles.len() - window..]
        .iter()
        .map(|c| c.close)
        .collect();
    let middle = math::sma(&closes, window)?;
    let std = math::standard_deviation(&closes, window)?;
    let half_width = std_dev * std;

    Some(BollingerBandsIndicator {
        upper: middle + half_width,
        middle,
        lower: middle - half_width,
        std,
        period,
        std_dev,
    })
}

/// 20-period bands, two deviations wide.
pub fn calculate_bollinger_bands_default(candles: &[Candle]) -> Option<BollingerBandsIndicator> {
    calculate_bollinger_bands(candles, 20, 2.0)
}

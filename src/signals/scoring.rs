//! Score normalization, direction thresholds and percentage rounding

use crate::models::signal::SignalDirection;

/// Normalize a value to -1 to +1 range
///
/// For indicators that output values in different ranges, this converts them
/// to a standardized -1 (bearish) to +1 (bullish) scale
pub fn normalize_score(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return 0.0;
    }
    let normalized = 2.0 * ((value - min) / (max - min)) - 1.0;
    normalized.clamp(-1.0, 1.0)
}

/// Normalize RSI (0-100) to -1 to +1
pub fn normalize_rsi(rsi: f64) -> f64 {
    normalize_score(rsi, 0.0, 100.0)
}

/// Normalize MACD histogram to -1 to +1 given the value that counts as a full move
pub fn normalize_macd_histogram(histogram: f64, scale: f64) -> f64 {
    if scale <= 0.0 || !scale.is_finite() {
        return 0.0;
    }
    (histogram / scale).clamp(-1.0, 1.0)
}

/// Clamp into [0, 1]; NaN becomes 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Symmetric threshold: bullish above `threshold`, bearish below `-threshold`,
/// neutral otherwise. With a zero threshold only an exact zero is neutral.
pub fn direction_from_score(score: f64, threshold: f64) -> SignalDirection {
    if score > threshold {
        SignalDirection::Bullish
    } else if score < -threshold {
        SignalDirection::Bearish
    } else {
        SignalDirection::Neutral
    }
}

/// Calculate confidence from the normalized global score
/// Confidence is the absolute value of the score, clamped to [0, 1]
pub fn calculate_confidence(global_score: f64) -> f64 {
    clamp_unit(global_score.abs())
}

/// Integer percentage for reports. Exact halves round to the even integer,
/// so 12.5 reports as 12 and 99.5 as 100.
pub fn to_percentage(confidence: f64) -> u8 {
    (clamp_unit(confidence) * 100.0).round_ties_even() as u8
}

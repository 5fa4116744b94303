//! Built-in signal sources, one per category.
//!
//! Each source validates the series, returns a neutral zero-confidence triple
//! while the series is shorter than its warm-up, and otherwise maps its
//! indicator readings onto a direction and a confidence in [0, 1].

use crate::indicators::momentum::{calculate_macd, calculate_rsi};
use crate::indicators::registry::{SignalSource, SourceError};
use crate::indicators::trend::{calculate_adx, calculate_ema, check_ema_cross};
use crate::indicators::validation::validate_candles;
use crate::indicators::volatility::{calculate_atr_regime, calculate_bollinger_bands};
use crate::models::indicators::Candle;
use crate::models::signal::{SignalDirection, SignalTriple};
use crate::models::strategy::SignalCategory;
use crate::signals::scoring::{
    clamp_unit, direction_from_score, normalize_macd_histogram, normalize_rsi,
};

/// EMA crossover for direction, ADX for strength.
#[derive(Debug, Clone)]
pub struct TrendSignals {
    pub fast_period: u32,
    pub slow_period: u32,
    pub adx_period: u32,
}

impl Default for TrendSignals {
    fn default() -> Self {
        Self {
            fast_period: 8,
            slow_period: 21,
            adx_period: 14,
        }
    }
}

impl TrendSignals {
    fn warm_up(&self) -> usize {
        (self.slow_period as usize).max(self.adx_period as usize * 2 + 1)
    }
}

impl SignalSource for TrendSignals {
    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn name(&self) -> &'static str {
        "ema_adx_trend"
    }

    fn compute(&self, candles: &[Candle]) -> Result<SignalTriple, SourceError> {
        validate_candles(candles)?;
        if candles.len() < self.warm_up() {
            return Ok(SignalTriple::neutral());
        }

        let (Some(direction), Some(fast), Some(slow), Some(adx)) = (
            check_ema_cross(candles, self.fast_period, self.slow_period),
            calculate_ema(candles, self.fast_period),
            calculate_ema(candles, self.slow_period),
            calculate_adx(candles, self.adx_period),
        ) else {
            return Ok(SignalTriple::neutral());
        };

        let strength = clamp_unit(adx.value / 100.0);
        Ok(SignalTriple::new(direction, strength)
            .with_metric("ema_fast", fast.value)
            .with_metric("ema_slow", slow.value)
            .with_metric("adx", adx.value)
            .with_metric("plus_di", adx.plus_di)
            .with_metric("minus_di", adx.minus_di)
            .with_metric("trend_strength", strength))
    }
}

/// RSI and MACD histogram averaged into one momentum score.
#[derive(Debug, Clone)]
pub struct MomentumSignals {
    pub rsi_period: u32,
    pub macd_fast: u32,
    pub macd_slow: u32,
    pub macd_signal: u32,
    /// Histogram value, as a fraction of price, that maps to a full score.
    pub histogram_scale: f64,
}

impl Default for MomentumSignals {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            histogram_scale: 0.01,
        }
    }
}

impl MomentumSignals {
    fn warm_up(&self) -> usize {
        (self.rsi_period as usize + 1).max((self.macd_slow + self.macd_signal) as usize)
    }
}

impl SignalSource for MomentumSignals {
    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn name(&self) -> &'static str {
        "rsi_macd_momentum"
    }

    fn compute(&self, candles: &[Candle]) -> Result<SignalTriple, SourceError> {
        validate_candles(candles)?;
        if candles.len() < self.warm_up() {
            return Ok(SignalTriple::neutral());
        }

        let (Some(rsi), Some(macd), Some(last)) = (
            calculate_rsi(candles, self.rsi_period),
            calculate_macd(candles, self.macd_fast, self.macd_slow, self.macd_signal),
            candles.last(),
        ) else {
            return Ok(SignalTriple::neutral());
        };

        let rsi_score = normalize_rsi(rsi.value);
        let macd_score = normalize_macd_histogram(macd.histogram, last.close * self.histogram_scale);
        let score = (rsi_score + macd_score) / 2.0;

        Ok(SignalTriple::new(direction_from_score(score, 0.0), clamp_unit(score.abs()))
            .with_metric("rsi", rsi.value)
            .with_metric("macd", macd.macd)
            .with_metric("macd_signal", macd.signal)
            .with_metric("macd_histogram", macd.histogram)
            .with_metric("momentum_score", score))
    }
}

/// Bollinger z-score: stretched below the mean is bullish, above is bearish.
#[derive(Debug, Clone)]
pub struct MeanReversionSignals {
    pub period: u32,
    pub std_dev: f64,
    /// Absolute z-score beyond which a reversion call is made.
    pub entry_z: f64,
}

impl Default for MeanReversionSignals {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
            entry_z: 1.0,
        }
    }
}

impl SignalSource for MeanReversionSignals {
    fn category(&self) -> SignalCategory {
        SignalCategory::MeanReversion
    }

    fn name(&self) -> &'static str {
        "bollinger_mean_reversion"
    }

    fn compute(&self, candles: &[Candle]) -> Result<SignalTriple, SourceError> {
        validate_candles(candles)?;
        if candles.len() < self.period as usize {
            return Ok(SignalTriple::neutral());
        }

        let (Some(bands), Some(last)) = (
            calculate_bollinger_bands(candles, self.period, self.std_dev),
            candles.last(),
        ) else {
            return Ok(SignalTriple::neutral());
        };

        let price = last.close;
        let z = bands.z_score(price);
        let (direction, confidence) = if z < -self.entry_z {
            (SignalDirection::Bullish, clamp_unit(z.abs() / 3.0))
        } else if z > self.entry_z {
            (SignalDirection::Bearish, clamp_unit(z.abs() / 3.0))
        } else {
            (SignalDirection::Neutral, 0.5)
        };

        Ok(SignalTriple::new(direction, confidence)
            .with_metric("z_score", z)
            .with_metric("bollinger_upper", bands.upper)
            .with_metric("bollinger_middle", bands.middle)
            .with_metric("bollinger_lower", bands.lower)
            .with_metric("percent_b", bands.percent_b(price)))
    }
}

/// Short ATR against long ATR: contracting volatility is bullish, expanding is bearish.
#[derive(Debug, Clone)]
pub struct VolatilitySignals {
    pub short_period: u32,
    pub long_period: u32,
    pub low_regime: f64,
    pub high_regime: f64,
}

impl Default for VolatilitySignals {
    fn default() -> Self {
        Self {
            short_period: 14,
            long_period: 50,
            low_regime: 0.8,
            high_regime: 1.2,
        }
    }
}

impl SignalSource for VolatilitySignals {
    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn name(&self) -> &'static str {
        "atr_volatility_regime"
    }

    fn compute(&self, candles: &[Candle]) -> Result<SignalTriple, SourceError> {
        validate_candles(candles)?;
        let warm_up = self.short_period.max(self.long_period) as usize + 1;
        if candles.len() < warm_up {
            return Ok(SignalTriple::neutral());
        }

        let (Some((short_atr, long_atr, regime)), Some(last)) = (
            calculate_atr_regime(candles, self.short_period, self.long_period),
            candles.last(),
        ) else {
            return Ok(SignalTriple::neutral());
        };

        let (direction, confidence) = if regime < self.low_regime {
            (SignalDirection::Bullish, clamp_unit((1.0 - regime) / 0.5))
        } else if regime > self.high_regime {
            (SignalDirection::Bearish, clamp_unit((regime - 1.0) / 0.5))
        } else {
            (SignalDirection::Neutral, 0.5)
        };

        Ok(SignalTriple::new(direction, confidence)
            .with_metric("atr", short_atr.value)
            .with_metric("atr_long", long_atr.value)
            .with_metric("atr_pct", short_atr.value / last.close * 100.0)
            .with_metric("volatility_regime", regime))
    }
}

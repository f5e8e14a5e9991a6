//! Trend, volume-trend and support/resistance classification.

use std::fmt;

use crate::domain::indicator::ema::ema_last;

pub const TREND_MIN_SAMPLES: usize = 50;
pub const TREND_LOOKBACK: usize = 20;
pub const TREND_CHANGE_PCT: f64 = 2.0;

pub const VOLUME_MIN_SAMPLES: usize = 10;
pub const VOLUME_RECENT: usize = 3;
pub const VOLUME_INCREASE_RATIO: f64 = 1.2;

pub const LEVEL_LOOKBACK: usize = 20;
pub const LEVEL_TOLERANCE: f64 = 0.005;
pub const LEVEL_MIN_TOUCHES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Uptrend => write!(f, "UPTREND"),
            Trend::Downtrend => write!(f, "DOWNTREND"),
            Trend::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

/// Uptrend: price above EMA(20) and EMA(50) with more than +2% over the last
/// 20 samples. Downtrend is the mirror image. Sideways otherwise, including
/// whenever fewer than 50 samples exist.
pub fn classify_trend(prices: &[f64]) -> Trend {
    if prices.len() < TREND_MIN_SAMPLES {
        return Trend::Sideways;
    }

    let price = prices[prices.len() - 1];
    let (Some(ema20), Some(ema50)) = (ema_last(prices, 20), ema_last(prices, 50)) else {
        return Trend::Sideways;
    };
    let above20 = price > ema20;
    let above50 = price > ema50;

    let base = prices[prices.len() - TREND_LOOKBACK];
    if base == 0.0 {
        return Trend::Sideways;
    }
    let change_pct = (price - base) / base * 100.0;

    if above20 && above50 && change_pct > TREND_CHANGE_PCT {
        Trend::Uptrend
    } else if !above20 && !above50 && change_pct < -TREND_CHANGE_PCT {
        Trend::Downtrend
    } else {
        Trend::Sideways
    }
}

/// Mean of the last 3 volumes exceeds the mean of the 7 before it by more
/// than 20%. False with fewer than 10 samples.
pub fn is_volume_increasing(volumes: &[f64]) -> bool {
    if volumes.len() < VOLUME_MIN_SAMPLES {
        return false;
    }

    let len = volumes.len();
    let recent = &volumes[len - VOLUME_RECENT..];
    let prior = &volumes[len - VOLUME_MIN_SAMPLES..len - VOLUME_RECENT];

    let recent_mean = recent.iter().sum::<f64>() / recent.len() as f64;
    let prior_mean = prior.iter().sum::<f64>() / prior.len() as f64;

    recent_mean > prior_mean * VOLUME_INCREASE_RATIO
}

/// Samples among the trailing 20 that lie within 0.5% of `level`.
pub fn support_touches(prices: &[f64], level: f64) -> usize {
    let threshold = (level * LEVEL_TOLERANCE).abs();
    let start = prices.len().saturating_sub(LEVEL_LOOKBACK);
    prices[start..]
        .iter()
        .filter(|p| (**p - level).abs() < threshold)
        .count()
}

/// A level is confirmed once 20 samples exist and at least 3 of them touch it.
pub fn is_level_confirmed(prices: &[f64], level: f64) -> bool {
    prices.len() >= LEVEL_LOOKBACK && support_touches(prices, level) >= LEVEL_MIN_TOUCHES
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize, start: f64, step: f64) -> Vec<f64> {
        (0..n).map(|i| start + step * i as f64).collect()
    }

    #[test]
    fn trend_needs_fifty_samples() {
        assert_eq!(classify_trend(&ramp(49, 100.0, 1.0)), Trend::Sideways);
    }

    #[test]
    fn trend_up() {
        assert_eq!(classify_trend(&ramp(60, 100.0, 1.0)), Trend::Uptrend);
    }

    #[test]
    fn trend_down() {
        assert_eq!(classify_trend(&ramp(60, 200.0, -1.0)), Trend::Downtrend);
    }

    #[test]
    fn trend_flat_is_sideways() {
        assert_eq!(classify_trend(&[100.0; 60]), Trend::Sideways);
    }

    #[test]
    fn trend_slow_drift_is_sideways() {
        // rising, but only ~0.2% over 20 samples
        assert_eq!(classify_trend(&ramp(60, 1000.0, 0.1)), Trend::Sideways);
    }

    #[test]
    fn trend_display() {
        assert_eq!(Trend::Uptrend.to_string(), "UPTREND");
        assert_eq!(Trend::Downtrend.to_string(), "DOWNTREND");
        assert_eq!(Trend::Sideways.to_string(), "SIDEWAYS");
    }

    #[test]
    fn volume_increasing_detected() {
        let mut volumes = vec![100.0; 7];
        volumes.extend([130.0, 130.0, 130.0]);
        assert!(is_volume_increasing(&volumes));
    }

    #[test]
    fn volume_increase_must_exceed_twenty_percent() {
        let mut volumes = vec![100.0; 7];
        volumes.extend([120.0, 120.0, 120.0]);
        assert!(!is_volume_increasing(&volumes));
    }

    #[test]
    fn volume_only_last_ten_matter() {
        let mut volumes = vec![1.0; 5];
        volumes.extend(vec![100.0; 7]);
        volumes.extend([110.0, 110.0, 110.0]);
        assert!(!is_volume_increasing(&volumes));
    }

    #[test]
    fn volume_needs_ten_samples() {
        assert!(!is_volume_increasing(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 10.0, 10.0, 10.0]));
    }

    #[test]
    fn support_touch_count() {
        let mut prices = vec![110.0; 17];
        prices.extend([100.2, 99.8, 100.4]);
        assert_eq!(support_touches(&prices, 100.0), 3);
        assert!(is_level_confirmed(&prices, 100.0));
    }

    #[test]
    fn support_touches_outside_tolerance_ignored() {
        let mut prices = vec![110.0; 17];
        prices.extend([100.6, 99.4, 100.0]);
        assert_eq!(support_touches(&prices, 100.0), 1);
        assert!(!is_level_confirmed(&prices, 100.0));
    }

    #[test]
    fn support_only_trailing_twenty() {
        let mut prices = vec![100.0; 5];
        prices.extend(vec![120.0; 20]);
        assert_eq!(support_touches(&prices, 100.0), 0);
    }

    #[test]
    fn level_needs_twenty_samples() {
        let prices = vec![100.0; 19];
        assert_eq!(support_touches(&prices, 100.0), 19);
        assert!(!is_level_confirmed(&prices, 100.0));
    }
}

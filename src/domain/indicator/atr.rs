//! Average True Range.
//!
//! TR = max(high - low, |high - prev_close|, |low - prev_close|)
//! ATR = simple mean of TR over the trailing `period` bars. Each TR needs the
//! previous close, so `period + 1` samples are required.

/// Half-width of the synthetic bar range used when only closes are known.
pub const SYNTHETIC_RANGE_FRACTION: f64 = 0.002;

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

/// ATR over the trailing `period` bars of equally long high/low/close
/// columns. `None` without `period + 1` samples.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Option<f64> {
    let len = closes.len();
    if period == 0 || len <= period || highs.len() != len || lows.len() != len {
        return None;
    }

    let sum: f64 = (len - period..len)
        .map(|i| true_range(highs[i], lows[i], closes[i - 1]))
        .sum();
    Some(sum / period as f64)
}

/// ATR from close prices alone.
///
/// This is an approximation, not a real intrabar range: each bar's high and
/// low are synthesized as close * (1 ± 0.2%). On a flat series the result is
/// 0.4% of price rather than zero.
pub fn atr_from_closes(closes: &[f64], period: usize) -> Option<f64> {
    let highs: Vec<f64> = closes
        .iter()
        .map(|c| c * (1.0 + SYNTHETIC_RANGE_FRACTION))
        .collect();
    let lows: Vec<f64> = closes
        .iter()
        .map(|c| c * (1.0 - SYNTHETIC_RANGE_FRACTION))
        .collect();
    atr(&highs, &lows, closes, period)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn true_range_components() {
        assert_relative_eq!(true_range(110.0, 90.0, 100.0), 20.0);
        assert_relative_eq!(true_range(110.0, 90.0, 70.0), 40.0);
        assert_relative_eq!(true_range(110.0, 90.0, 130.0), 40.0);
    }

    #[test]
    fn atr_requires_period_plus_one() {
        let closes = [100.0, 101.0, 102.0];
        let highs = [101.0, 102.0, 103.0];
        let lows = [99.0, 100.0, 101.0];
        assert!(atr(&highs, &lows, &closes, 3).is_none());
        assert!(atr(&highs, &lows, &closes, 2).is_some());
    }

    #[test]
    fn atr_constant_range() {
        let closes = vec![100.0; 20];
        let highs = vec![105.0; 20];
        let lows = vec![95.0; 20];
        assert_relative_eq!(atr(&highs, &lows, &closes, 14).unwrap(), 10.0);
    }

    #[test]
    fn atr_uses_trailing_window() {
        // the first bar has a huge range that falls outside the window
        let closes = [100.0, 100.0, 100.0, 100.0];
        let highs = [200.0, 102.0, 101.0, 103.0];
        let lows = [0.0, 98.0, 99.0, 97.0];
        // TRs of the last 2 bars: 2, 6
        assert_relative_eq!(atr(&highs, &lows, &closes, 2).unwrap(), 4.0);
    }

    #[test]
    fn atr_mismatched_columns() {
        assert!(atr(&[1.0], &[1.0, 2.0], &[1.0, 2.0], 1).is_none());
    }

    #[test]
    fn atr_zero_period() {
        assert!(atr_from_closes(&[1.0, 2.0], 0).is_none());
    }

    #[test]
    fn atr_from_closes_flat_is_synthetic_range() {
        let closes = vec![100.0; 16];
        let value = atr_from_closes(&closes, 14).unwrap();
        assert_relative_eq!(value, 0.4, epsilon = 1e-9);
    }

    #[test]
    fn atr_from_closes_gap_dominates() {
        // each step of +1 beats the 0.4 synthetic range:
        // |close*1.002 - prev_close| = 1 + 0.002*close
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let value = atr_from_closes(&closes, 14).unwrap();
        let expected: f64 = (1..15).map(|i| 1.0 + 0.002 * (100.0 + i as f64)).sum::<f64>() / 14.0;
        assert_relative_eq!(value, expected, epsilon = 1e-9);
    }
}

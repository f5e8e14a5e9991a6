//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with the SMA of the first n samples, then
//! EMA[i] = (x[i] - EMA[i-1]) * k + EMA[i-1].
//! Warmup: the first (n-1) entries are 0.0 (undefined).
//!
//! Callers feed the retained window of a bounded history, so the result is an
//! approximation of the unbounded EMA: the seed's weight decays as
//! (1-k)^(len-n), which is negligible for a 500-sample window and n <= 50.

/// Full-length EMA. Every entry is 0.0 when `values.len() < period`.
pub fn ema_series(values: &[f64], period: usize) -> Vec<f64> {
    let mut ema = vec![0.0; values.len()];
    if period == 0 || values.len() < period {
        return ema;
    }

    let k = 2.0 / (period as f64 + 1.0);
    ema[period - 1] = values[..period].iter().sum::<f64>() / period as f64;

    for i in period..values.len() {
        ema[i] = (values[i] - ema[i - 1]) * k + ema[i - 1];
    }

    ema
}

/// Newest EMA value, `None` while the EMA is still warming up.
pub fn ema_last(values: &[f64], period: usize) -> Option<f64> {
    if period == 0 || values.len() < period {
        return None;
    }
    ema_series(values, period).last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ema_warmup() {
        let series = ema_series(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], 0.0);
        assert_eq!(series[1], 0.0);
        assert!(series[2] > 0.0);
    }

    #[test]
    fn ema_period_1_tracks_input() {
        let series = ema_series(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn ema_seed_is_sma() {
        let series = ema_series(&[10.0, 20.0, 30.0], 3);
        let expected_sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert!((series[2] - expected_sma).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = ema_series(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = 20.0;
        let ema_3 = (40.0 - sma) * k + sma;
        let ema_4 = (50.0 - ema_3) * k + ema_3;

        assert!((series[3] - ema_3).abs() < f64::EPSILON);
        assert!((series[4] - ema_4).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_short_input_is_all_zero() {
        let series = ema_series(&[10.0, 20.0], 3);
        assert_eq!(series, vec![0.0, 0.0]);
        assert_eq!(ema_last(&[10.0, 20.0], 3), None);
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(ema_series(&[], 3).is_empty());
        assert_eq!(ema_series(&[10.0, 20.0], 0), vec![0.0, 0.0]);
        assert_eq!(ema_last(&[10.0], 0), None);
    }

    #[test]
    fn ema_last_matches_series() {
        let values = [5.0, 6.0, 7.0, 6.5, 8.0, 9.0];
        let series = ema_series(&values, 4);
        assert_eq!(ema_last(&values, 4), series.last().copied());
    }

    proptest! {
        #[test]
        fn ema_of_constant_converges(v in -1e4f64..1e4, period in 1usize..60) {
            let values = vec![v; period * 10];
            let last = ema_last(&values, period).unwrap();
            prop_assert!((last - v).abs() <= 1e-9 * v.abs().max(1.0));
        }

        #[test]
        fn ema_preserves_length(
            values in prop::collection::vec(-1e3f64..1e3, 0..100),
            period in 1usize..30,
        ) {
            prop_assert_eq!(ema_series(&values, period).len(), values.len());
        }
    }
}

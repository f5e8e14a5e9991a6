//! RSI (Relative Strength Index) over the trailing window.
//!
//! The last `period` price changes are split into gains and loss magnitudes,
//! each averaged over `period` (simple averages, no Wilder smoothing):
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss)).

pub const NEUTRAL_RSI: f64 = 50.0;

/// Neutral 50.0 until `period + 1` prices exist or when prices did not move.
/// 100.0 when there were gains and no losses.
pub fn rsi(prices: &[f64], period: usize) -> f64 {
    if period == 0 || prices.len() <= period {
        return NEUTRAL_RSI;
    }

    let window = &prices[prices.len() - period - 1..];
    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change > 0.0 {
            gains += change;
        } else {
            losses += change.abs();
        }
    }

    let avg_gain = gains / period as f64;
    let avg_loss = losses / period as f64;

    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { NEUTRAL_RSI };
    }

    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rsi_not_enough_data_is_neutral() {
        assert_eq!(rsi(&[], 14), NEUTRAL_RSI);
        assert_eq!(rsi(&[100.0; 14], 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_zero_period_is_neutral() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0], 0), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_all_gains() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert!((rsi(&prices, 14) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_all_losses() {
        let prices: Vec<f64> = (0..15).map(|i| 100.0 - i as f64).collect();
        assert!(rsi(&prices, 14).abs() < f64::EPSILON);
    }

    #[test]
    fn rsi_flat_prices_neutral() {
        assert_eq!(rsi(&[100.0; 20], 14), NEUTRAL_RSI);
    }

    #[test]
    fn rsi_known_value() {
        // changes over the last 4: +2, -1, +1, -2 → avg gain 0.75, avg loss 0.75
        let prices = [50.0, 10.0, 12.0, 11.0, 12.0, 10.0];
        assert!((rsi(&prices, 4) - 50.0).abs() < 1e-12);

        // +3, -1 → rs = 3 → 75
        let prices = [10.0, 13.0, 12.0];
        assert!((rsi(&prices, 2) - 75.0).abs() < 1e-12);
    }

    #[test]
    fn rsi_ignores_older_changes() {
        let mut prices = vec![100.0, 50.0, 100.0];
        prices.extend((0..14).map(|i| 100.0 + i as f64));
        assert!((rsi(&prices, 14) - 100.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn rsi_bounded(prices in prop::collection::vec(1.0f64..1e5, 0..80), period in 1usize..30) {
            let value = rsi(&prices, period);
            prop_assert!((0.0..=100.0).contains(&value), "RSI {} out of range", value);
        }
    }
}

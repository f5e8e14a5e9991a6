//! Price/volume history for one strategy instance and the indicator queries
//! evaluated against it.
//!
//! Indicator state is never cached: each query recomputes from the current
//! window, so EMA-based readings are approximations over the retained
//! history (see `indicator::ema`).

use crate::domain::indicator::{self, MacdSeries, Trend};
use crate::domain::rolling::RollingSeries;

pub const DEFAULT_HISTORY: usize = 500;
pub const VOLATILITY_ATR_PERIOD: usize = 14;
pub const HIGH_VOLATILITY_FRACTION: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct MarketData {
    prices: RollingSeries,
    volumes: RollingSeries,
}

impl MarketData {
    pub fn new(capacity: usize) -> Self {
        MarketData {
            prices: RollingSeries::new(capacity),
            volumes: RollingSeries::new(capacity),
        }
    }

    pub fn push(&mut self, price: f64, volume: f64) {
        self.prices.push(price);
        self.volumes.push(volume);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn prices(&self) -> &[f64] {
        self.prices.as_slice()
    }

    pub fn volumes(&self) -> &[f64] {
        self.volumes.as_slice()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.prices.last_value().ok()
    }

    pub fn sma(&self, period: usize) -> Option<f64> {
        indicator::sma(self.prices(), period)
    }

    pub fn ema(&self, period: usize) -> Vec<f64> {
        indicator::ema_series(self.prices(), period)
    }

    pub fn ema_last(&self, period: usize) -> Option<f64> {
        indicator::ema_last(self.prices(), period)
    }

    pub fn rsi(&self, period: usize) -> f64 {
        indicator::rsi(self.prices(), period)
    }

    pub fn macd(&self, fast: usize, slow: usize, signal: usize) -> MacdSeries {
        indicator::macd(self.prices(), fast, slow, signal)
    }

    /// Close-only ATR; see `indicator::atr_from_closes` for the synthetic
    /// range it assumes.
    pub fn atr(&self, period: usize) -> Option<f64> {
        indicator::atr_from_closes(self.prices(), period)
    }

    pub fn is_price_above_ema(&self, period: usize) -> bool {
        match (self.last_price(), self.ema_last(period)) {
            (Some(price), Some(ema)) => price > ema,
            _ => false,
        }
    }

    pub fn trend(&self) -> Trend {
        indicator::classify_trend(self.prices())
    }

    pub fn is_volume_increasing(&self) -> bool {
        indicator::is_volume_increasing(self.volumes())
    }

    /// ATR(14) above 2% of the current price.
    pub fn is_volatility_high(&self) -> bool {
        match (self.atr(VOLATILITY_ATR_PERIOD), self.last_price()) {
            (Some(atr), Some(price)) => atr > price * HIGH_VOLATILITY_FRACTION,
            _ => false,
        }
    }

    pub fn support_touches(&self, level: f64) -> usize {
        indicator::support_touches(self.prices(), level)
    }

    pub fn is_support_level(&self, level: f64) -> bool {
        indicator::is_level_confirmed(self.prices(), level)
    }

    /// Resistance uses the same touch rule as support.
    pub fn is_resistance_level(&self, level: f64) -> bool {
        indicator::is_level_confirmed(self.prices(), level)
    }
}

impl Default for MarketData {
    fn default() -> Self {
        MarketData::new(DEFAULT_HISTORY)
    }
}

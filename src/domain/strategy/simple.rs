//! Moving-average crossover: long while SMA(short) is above SMA(long).

use tracing::debug;

use crate::domain::indicator::IndicatorType;
use crate::domain::market_data::MarketData;
use crate::domain::position::Position;
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct SimpleParams {
    pub short_period: usize,
    pub long_period: usize,
}

impl Default for SimpleParams {
    fn default() -> Self {
        SimpleParams {
            short_period: 10,
            long_period: 50,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SmaCrossStrategy {
    params: SimpleParams,
    data: MarketData,
}

impl SmaCrossStrategy {
    /// History is capped at `long_period` samples, all the slow average needs.
    pub fn new(params: SimpleParams) -> Self {
        let data = MarketData::new(params.long_period);
        SmaCrossStrategy { params, data }
    }

    pub fn params(&self) -> &SimpleParams {
        &self.params
    }

    fn averages(&self) -> Option<(f64, f64)> {
        if self.data.len() < self.params.long_period {
            return None;
        }
        let short = self.data.sma(self.params.short_period)?;
        let long = self.data.sma(self.params.long_period)?;
        debug!(
            short_kind = %IndicatorType::Sma(self.params.short_period),
            short,
            long_kind = %IndicatorType::Sma(self.params.long_period),
            long,
            "moving averages"
        );
        Some((short, long))
    }
}

impl Strategy for SmaCrossStrategy {
    fn name(&self) -> &str {
        "sma-cross"
    }

    fn update_market_data(&mut self, price: f64, volume: f64) {
        self.data.push(price, volume);
    }

    fn should_enter_long(&self) -> bool {
        matches!(self.averages(), Some((short, long)) if short > long)
    }

    fn should_exit_long(&self, _position: &Position) -> bool {
        matches!(self.averages(), Some((short, long)) if short < long)
    }

    fn should_enter_short(&self) -> bool {
        false
    }

    fn should_exit_short(&self, _position: &Position) -> bool {
        false
    }
}

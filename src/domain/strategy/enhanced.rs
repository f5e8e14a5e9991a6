//! Multi-indicator strategy.
//!
//! Long entries are a weighted vote of five independent readings (EMA
//! alignment, RSI band, MACD, volume, higher lows) that fires on three or
//! more. Long exits combine an ATR stop/target with a trend-reversal check.
//! Shorts combine trend, MACD crossover, RSI, volume and volatility filters,
//! with fixed percentage stop and target off the entry price.

use tracing::debug;

use crate::domain::indicator::macd::{DEFAULT_FAST, DEFAULT_SIGNAL, DEFAULT_SLOW};
use crate::domain::indicator::{IndicatorType, MacdSeries, Trend, crossed_above, crossed_below};
use crate::domain::market_data::{DEFAULT_HISTORY, MarketData};
use crate::domain::position::Position;
use crate::domain::strategy::Strategy;

const ALIGN_FAST: usize = 8;
const ALIGN_MID: usize = 21;
const ALIGN_SLOW: usize = 50;

const MOMENTUM_RSI_PERIOD: usize = 14;
const RSI_FLOOR: f64 = 40.0;
const RSI_ENTRY_CEILING: f64 = 65.0;

const VOLUME_WINDOW: usize = 10;
const LOWS_WINDOW: usize = 2;
const MIN_VOTES: usize = 3;

const LONG_WARMUP: usize = 20;
const SHORT_WARMUP: usize = 10;

const EXIT_ATR_PERIOD: usize = 14;
const STOP_ATR_MULTIPLE: f64 = 2.0;
const TARGET_ATR_MULTIPLE: f64 = 3.0;

const SHORT_PROFIT_TARGET: f64 = 0.03;
const SHORT_STOP_LOSS: f64 = -0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedParams {
    pub fast_ema: usize,
    pub slow_ema: usize,
    pub signal_ema: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub history_size: usize,
}

impl Default for EnhancedParams {
    fn default() -> Self {
        EnhancedParams {
            fast_ema: DEFAULT_FAST,
            slow_ema: DEFAULT_SLOW,
            signal_ema: DEFAULT_SIGNAL,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            history_size: DEFAULT_HISTORY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnhancedStrategy {
    params: EnhancedParams,
    data: MarketData,
}

impl EnhancedStrategy {
    pub fn new(params: EnhancedParams) -> Self {
        let data = MarketData::new(params.history_size);
        EnhancedStrategy { params, data }
    }

    pub fn params(&self) -> &EnhancedParams {
        &self.params
    }

    pub fn market_data(&self) -> &MarketData {
        &self.data
    }

    fn macd_kind(&self) -> IndicatorType {
        IndicatorType::Macd {
            fast: self.params.fast_ema,
            slow: self.params.slow_ema,
            signal: self.params.signal_ema,
        }
    }

    fn macd(&self) -> MacdSeries {
        self.data
            .macd(self.params.fast_ema, self.params.slow_ema, self.params.signal_ema)
    }

    fn has_history(&self, warmup: usize) -> bool {
        self.data.len() >= self.params.slow_ema + warmup
    }

    fn ema_alignment_vote(&self) -> bool {
        match (
            self.data.ema_last(ALIGN_FAST),
            self.data.ema_last(ALIGN_MID),
            self.data.ema_last(ALIGN_SLOW),
        ) {
            (Some(fast), Some(mid), Some(slow)) => {
                fast > mid
                    && mid > slow
                    && self.data.is_price_above_ema(ALIGN_FAST)
                    && self.data.is_price_above_ema(ALIGN_MID)
            }
            _ => false,
        }
    }

    fn volume_vote(&self) -> bool {
        let volumes = self.data.volumes();
        if volumes.len() <= VOLUME_WINDOW {
            return false;
        }
        let recent = &volumes[volumes.len() - VOLUME_WINDOW..];
        let avg = recent.iter().sum::<f64>() / VOLUME_WINDOW as f64;
        volumes[volumes.len() - 1] > avg
    }

    fn higher_lows_vote(&self) -> bool {
        let prices = self.data.prices();
        let n = prices.len();
        if n <= 2 * LOWS_WINDOW {
            return false;
        }
        let min_of = |s: &[f64]| s.iter().copied().fold(f64::INFINITY, f64::min);
        let recent = min_of(&prices[n - LOWS_WINDOW..]);
        let before = min_of(&prices[n - 2 * LOWS_WINDOW..n - LOWS_WINDOW]);
        recent > before
    }

    fn is_oversold(&self, rsi: f64) -> bool {
        rsi < self.params.rsi_oversold
    }

    fn short_exit_on_price(position: &Position, price: f64) -> bool {
        if !(position.entry_price > 0.0) {
            return false;
        }
        let gain = (position.entry_price - price) / position.entry_price;
        gain > SHORT_PROFIT_TARGET || gain < SHORT_STOP_LOSS
    }
}

impl Default for EnhancedStrategy {
    fn default() -> Self {
        EnhancedStrategy::new(EnhancedParams::default())
    }
}

impl Strategy for EnhancedStrategy {
    fn name(&self) -> &str {
        "enhanced"
    }

    fn update_market_data(&mut self, price: f64, volume: f64) {
        self.data.push(price, volume);
    }

    fn should_enter_long(&self) -> bool {
        if !self.has_history(LONG_WARMUP) {
            return false;
        }
        let Some(price) = self.data.last_price() else {
            return false;
        };

        let rsi = self.data.rsi(MOMENTUM_RSI_PERIOD);
        let macd = self.macd();
        let macd_vote = match (macd.last_line(), macd.last_signal()) {
            (Some(line), Some(signal)) => line > 0.0 && line > signal,
            _ => false,
        };

        let votes = [
            self.ema_alignment_vote(),
            rsi > RSI_FLOOR && rsi < RSI_ENTRY_CEILING,
            macd_vote,
            self.volume_vote(),
            self.higher_lows_vote(),
        ];
        let count = votes.iter().filter(|v| **v).count();

        debug!(
            price,
            count,
            rsi_kind = %IndicatorType::Rsi(MOMENTUM_RSI_PERIOD),
            rsi,
            macd_kind = %self.macd_kind(),
            ?votes,
            "long entry votes"
        );

        count >= MIN_VOTES
    }

    fn should_exit_long(&self, position: &Position) -> bool {
        if !self.has_history(LONG_WARMUP) {
            return false;
        }
        let Some(price) = self.data.last_price() else {
            return false;
        };

        let move_from_entry = price - position.entry_price;
        if let Some(atr) = self.data.atr(EXIT_ATR_PERIOD) {
            let stop = move_from_entry < -STOP_ATR_MULTIPLE * atr;
            let target = move_from_entry > TARGET_ATR_MULTIPLE * atr;
            if stop || target {
                debug!(
                    price,
                    entry = position.entry_price,
                    atr_kind = %IndicatorType::Atr(EXIT_ATR_PERIOD),
                    atr,
                    stop,
                    target,
                    "long exit on ATR band"
                );
                return true;
            }
        }

        let reversal = match (self.data.ema_last(ALIGN_FAST), self.data.ema_last(ALIGN_MID)) {
            (Some(fast), Some(mid)) => price < fast && fast < mid,
            _ => false,
        };
        if !reversal {
            return false;
        }

        let rsi = self.data.rsi(MOMENTUM_RSI_PERIOD);
        let rsi_exit = rsi > self.params.rsi_overbought || rsi < RSI_FLOOR;
        let macd = self.macd();
        let macd_falling = match macd.line.as_slice() {
            [.., prev, last] => *last < 0.0 && last < prev,
            _ => false,
        };

        rsi_exit || macd_falling
    }

    fn should_enter_short(&self) -> bool {
        if !self.has_history(SHORT_WARMUP) {
            return false;
        }

        let rsi = self.data.rsi(self.params.rsi_period);
        let rsi_ok = rsi > RSI_FLOOR && rsi < self.params.rsi_overbought;
        let cross = crossed_below(&self.macd());
        let trend = self.data.trend();
        let downtrend = trend == Trend::Downtrend;
        let volume = self.data.is_volume_increasing();
        let calm = !self.data.is_volatility_high();

        debug!(
            rsi,
            rsi_ok,
            cross,
            %trend,
            volume,
            calm,
            "short entry readings"
        );

        (downtrend && (cross || rsi_ok) && volume) || (cross && rsi_ok && calm)
    }

    fn should_exit_short(&self, position: &Position) -> bool {
        if !self.has_history(SHORT_WARMUP) {
            return false;
        }
        let Some(price) = self.data.last_price() else {
            return false;
        };

        self.is_oversold(self.data.rsi(self.params.rsi_period))
            || crossed_above(&self.macd())
            || self.data.trend() == Trend::Uptrend
            || Self::short_exit_on_price(position, price)
    }
}

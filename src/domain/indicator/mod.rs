//! Technical indicator implementations.
//!
//! Every function here is pure over a slice of samples plus parameters.
//! "Not enough data" is a designed return value (`None`, a neutral reading,
//! an empty or zero-filled series), never an error.

pub mod atr;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod trend;

pub use atr::{atr, atr_from_closes, true_range};
pub use ema::{ema_last, ema_series};
pub use macd::{MacdSeries, crossed_above, crossed_below, macd};
pub use rsi::rsi;
pub use sma::sma;
pub use trend::{
    Trend, classify_trend, is_level_confirmed, is_volume_increasing, support_touches,
};

use std::fmt;

/// Indicator identity and parameters, used for log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Rsi(usize),
    Atr(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

//! Price feed that replays historical bars one tick per poll.

use std::collections::VecDeque;

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Bar;
use crate::ports::feed_port::{PriceFeedPort, Tick};

#[derive(Debug, Clone)]
pub struct ReplayFeed {
    symbol: String,
    ticks: VecDeque<Tick>,
}

impl ReplayFeed {
    pub fn new(symbol: &str, ticks: impl IntoIterator<Item = Tick>) -> Self {
        ReplayFeed {
            symbol: symbol.to_string(),
            ticks: ticks.into_iter().collect(),
        }
    }

    /// Each bar becomes one tick at its close.
    pub fn from_bars(symbol: &str, bars: &[Bar]) -> Self {
        Self::new(
            symbol,
            bars.iter().map(|b| Tick {
                price: b.close,
                volume: b.volume,
            }),
        )
    }

    pub fn remaining(&self) -> usize {
        self.ticks.len()
    }
}

impl PriceFeedPort for ReplayFeed {
    fn latest_tick(&mut self, symbol: &str) -> Result<Tick, SigtraderError> {
        if symbol != self.symbol {
            return Err(SigtraderError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: format!("feed only serves {}", self.symbol),
            });
        }
        self.ticks
            .pop_front()
            .ok_or_else(|| SigtraderError::FeedUnavailable {
                symbol: symbol.to_string(),
                reason: "replay exhausted".into(),
            })
    }
}

//! Live price feed port trait.

use crate::domain::error::SigtraderError;

/// One observation from a price feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub price: f64,
    pub volume: f64,
}

pub trait PriceFeedPort {
    /// Latest tick for `symbol`, or `FeedUnavailable` when the feed cannot
    /// produce one right now.
    fn latest_tick(&mut self, symbol: &str) -> Result<Tick, SigtraderError>;
}

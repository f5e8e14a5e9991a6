//! OHLCV bar representation.

use crate::domain::indicator::atr::true_range;

/// One historical bar. The timestamp is an opaque token kept exactly as read;
/// bars are replayed in arrival order, never re-sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        true_range(self.high, self.low, prev_close)
    }
}

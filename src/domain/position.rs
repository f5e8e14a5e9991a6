//! Open positions and closed trades.

use std::fmt;

use crate::domain::risk::OrderSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Side of the order that opens a position in this direction.
    pub fn entry_side(self) -> OrderSide {
        match self {
            Direction::Long => OrderSide::Buy,
            Direction::Short => OrderSide::Sell,
        }
    }

    /// Side of the order that closes a position in this direction.
    pub fn exit_side(self) -> OrderSide {
        match self {
            Direction::Long => OrderSide::Sell,
            Direction::Short => OrderSide::Buy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// The single open position of a strategy instance. Being flat is the
/// absence of a `Position`.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub direction: Direction,
    pub entry_price: f64,
    pub quantity: f64,
    pub entry_time: String,
    /// Everything debited from capital on entry, fee included.
    pub entry_cost: f64,
}

impl Position {
    pub fn is_long(&self) -> bool {
        self.direction == Direction::Long
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity * price
    }

    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.direction {
            Direction::Long => self.quantity * (price - self.entry_price),
            Direction::Short => self.quantity * (self.entry_price - price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeResult {
    pub entry_price: f64,
    pub exit_price: f64,
    pub direction: Direction,
    pub entry_time: String,
    pub exit_time: String,
    pub quantity: f64,
    pub profit: f64,
}

impl TradeResult {
    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }
}

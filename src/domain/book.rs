//! Capital, the single position slot and the closed-trade ledger.
//!
//! The book is the only place capital changes. Entry debits
//! `quantity * price * (1 + fee)`; a long exit credits
//! `quantity * price * (1 - fee)`. A short entry escrows the same debit and
//! its exit returns the escrowed notional (the entry fee is not refunded) plus
//! the price difference, minus the exit fee. Realized profit is always exit
//! credit minus entry debit.

use tracing::info;

use super::position::{Direction, Position, TradeResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub capital: f64,
    pub initial_capital: f64,
    pub fee: f64,
    pub position: Option<Position>,
    pub ledger: Vec<TradeResult>,
}

impl Book {
    pub fn new(initial_capital: f64, fee: f64) -> Self {
        Book {
            capital: initial_capital,
            initial_capital,
            fee,
            position: None,
            ledger: Vec::new(),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.position.is_none()
    }

    pub fn direction(&self) -> Option<Direction> {
        self.position.as_ref().map(|p| p.direction)
    }

    /// Open a position. Returns `false`, leaving the book unchanged, when a
    /// position is already open or the quantity is not positive.
    pub fn open(&mut self, direction: Direction, price: f64, quantity: f64, time: &str) -> bool {
        if self.position.is_some() || !(quantity > 0.0) {
            return false;
        }

        let entry_cost = quantity * price * (1.0 + self.fee);
        self.capital -= entry_cost;

        info!(
            %direction,
            price,
            quantity,
            capital = self.capital,
            time,
            "opened position"
        );

        self.position = Some(Position {
            direction,
            entry_price: price,
            quantity,
            entry_time: time.to_string(),
            entry_cost,
        });
        true
    }

    /// Close the open position at `price` and append it to the ledger.
    pub fn close(&mut self, price: f64, time: &str) -> Option<&TradeResult> {
        let position = self.position.take()?;

        let exit_value = position.quantity * price;
        let exit_fee = exit_value * self.fee;
        let credit = match position.direction {
            Direction::Long => exit_value - exit_fee,
            Direction::Short => {
                let entry_notional = position.quantity * position.entry_price;
                let short_profit = entry_notional - exit_value;
                entry_notional + short_profit - exit_fee
            }
        };
        self.capital += credit;
        let profit = credit - position.entry_cost;

        info!(
            direction = %position.direction,
            price,
            profit,
            capital = self.capital,
            time,
            "closed position"
        );

        self.ledger.push(TradeResult {
            entry_price: position.entry_price,
            exit_price: price,
            direction: position.direction,
            entry_time: position.entry_time,
            exit_time: time.to_string(),
            quantity: position.quantity,
            profit,
        });
        self.ledger.last()
    }

    /// Capital plus what the open position would return if closed at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        match &self.position {
            None => self.capital,
            Some(pos) => {
                let exit_value = pos.market_value(price);
                let exit_fee = exit_value * self.fee;
                match pos.direction {
                    Direction::Long => self.capital + exit_value - exit_fee,
                    Direction::Short => {
                        let entry_notional = pos.quantity * pos.entry_price;
                        self.capital + entry_notional + pos.unrealized_pnl(price) - exit_fee
                    }
                }
            }
        }
    }

    pub fn realized_pnl(&self) -> f64 {
        self.ledger.iter().map(|t| t.profit).sum()
    }
}

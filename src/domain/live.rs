//! Live (polling) trading loop.
//!
//! Each iteration checks the stop flag, pulls one tick and feeds the
//! strategy. A flat book may enter and an open position may exit, never
//! both on one tick, the same rule the backtest uses.
//! Orders go out as MARKET requests and only touch the book once the broker
//! acknowledges them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::domain::book::Book;
use crate::domain::error::SigtraderError;
use crate::domain::indicator::atr_from_closes;
use crate::domain::position::Direction;
use crate::domain::risk::{OrderRequest, RiskManager};
use crate::domain::rolling::RollingSeries;
use crate::domain::strategy::Strategy;
use crate::ports::feed_port::PriceFeedPort;
use crate::ports::order_port::OrderPort;

#[derive(Debug, Clone, PartialEq)]
pub struct LiveConfig {
    pub symbol: String,
    pub initial_capital: f64,
    pub fee: f64,
    pub allow_shorting: bool,
    pub poll_interval: Duration,
    /// Stop after this many iterations; run until stopped when `None`.
    pub max_iterations: Option<usize>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        LiveConfig {
            symbol: "BTCUSDT".into(),
            initial_capital: 10_000.0,
            fee: 0.001,
            allow_shorting: false,
            poll_interval: Duration::from_millis(1000),
            max_iterations: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LiveSummary {
    pub iterations: usize,
    pub ticks: usize,
    pub skipped_ticks: usize,
    pub orders_submitted: usize,
    pub orders_rejected: usize,
}

pub struct LiveTrader<F: PriceFeedPort, O: OrderPort> {
    config: LiveConfig,
    strategy: Box<dyn Strategy>,
    risk: RiskManager,
    book: Book,
    closes: RollingSeries,
    feed: F,
    broker: O,
    stop: Arc<AtomicBool>,
    summary: LiveSummary,
}

impl<F: PriceFeedPort, O: OrderPort> LiveTrader<F, O> {
    pub fn new(
        config: LiveConfig,
        strategy: Box<dyn Strategy>,
        risk: RiskManager,
        feed: F,
        broker: O,
    ) -> Self {
        let book = Book::new(config.initial_capital, config.fee);
        let closes = RollingSeries::new(risk.config().atr_period + 1);
        LiveTrader {
            config,
            strategy,
            risk,
            book,
            closes,
            feed,
            broker,
            stop: Arc::new(AtomicBool::new(false)),
            summary: LiveSummary::default(),
        }
    }

    /// Flag that stops the loop before its next iteration when set.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn book(&self) -> &Book {
        &self.book
    }

    pub fn broker(&self) -> &O {
        &self.broker
    }

    pub fn summary(&self) -> &LiveSummary {
        &self.summary
    }

    pub fn run(&mut self) -> LiveSummary {
        info!(
            symbol = %self.config.symbol,
            strategy = self.strategy.name(),
            max_iterations = ?self.config.max_iterations,
            "starting live loop"
        );

        loop {
            if self.stop.load(Ordering::SeqCst) {
                info!("stop requested");
                break;
            }
            if let Some(max) = self.config.max_iterations {
                if self.summary.iterations >= max {
                    break;
                }
            }

            self.summary.iterations += 1;
            match self.poll_once() {
                Ok(()) => {}
                Err(e @ SigtraderError::FeedUnavailable { .. }) => {
                    self.summary.skipped_ticks += 1;
                    warn!("skipping tick: {e}");
                }
                Err(e) => {
                    warn!("iteration failed: {e}");
                }
            }

            if !self.config.poll_interval.is_zero() {
                thread::sleep(self.config.poll_interval);
            }
        }

        info!(
            iterations = self.summary.iterations,
            trades = self.book.ledger.len(),
            capital = self.book.capital,
            open = ?self.book.direction(),
            "live loop finished"
        );
        self.summary.clone()
    }

    /// One iteration without the stop check or sleep.
    pub fn poll_once(&mut self) -> Result<(), SigtraderError> {
        let tick = self.feed.latest_tick(&self.config.symbol)?;
        self.summary.ticks += 1;

        self.strategy.update_market_data(tick.price, tick.volume);
        self.closes.push(tick.price);
        debug!(price = tick.price, volume = tick.volume, "tick");

        if self.book.is_flat() {
            let direction = if self.strategy.should_enter_long() {
                Some(Direction::Long)
            } else if self.config.allow_shorting && self.strategy.should_enter_short() {
                Some(Direction::Short)
            } else {
                None
            };
            if let Some(direction) = direction {
                self.enter(direction, tick.price)?;
            }
        } else {
            let exit = match &self.book.position {
                Some(pos) if pos.is_long() => self.strategy.should_exit_long(pos),
                Some(pos) => self.strategy.should_exit_short(pos),
                None => false,
            };
            if exit {
                self.exit(tick.price)?;
            }
        }

        debug!(equity = self.book.equity(tick.price), "tick processed");
        Ok(())
    }

    fn enter(&mut self, direction: Direction, price: f64) -> Result<(), SigtraderError> {
        let atr = atr_from_closes(self.closes.as_slice(), self.risk.config().atr_period);
        let quantity = self.risk.position_size(self.book.capital, price, atr);
        let order = OrderRequest::market(&self.config.symbol, direction.entry_side(), quantity);
        let checked = self.risk.validate(&order, price);
        self.submit(&order, checked)?;
        self.book.open(direction, price, quantity, &Utc::now().to_rfc3339());
        Ok(())
    }

    fn exit(&mut self, price: f64) -> Result<(), SigtraderError> {
        let Some(pos) = &self.book.position else {
            return Ok(());
        };
        let order =
            OrderRequest::market(&self.config.symbol, pos.direction.exit_side(), pos.quantity);
        let checked = self.risk.validate_close(&order, price);
        self.submit(&order, checked)?;
        self.book.close(price, &Utc::now().to_rfc3339());
        Ok(())
    }

    /// Send an order that passed `checked` to the broker.
    fn submit(
        &mut self,
        order: &OrderRequest,
        checked: Result<(), SigtraderError>,
    ) -> Result<(), SigtraderError> {
        let result = checked.and_then(|()| self.broker.submit_order(order));
        match result {
            Ok(ack) => {
                self.summary.orders_submitted += 1;
                debug!(order_id = %ack.order_id, side = %order.side, "order acknowledged");
                Ok(())
            }
            Err(e) => {
                self.summary.orders_rejected += 1;
                warn!(side = %order.side, quantity = order.quantity, "order not placed: {e}");
                Err(e)
            }
        }
    }
}

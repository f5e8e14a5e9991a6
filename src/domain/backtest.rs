//! Backtest engine and event loop.
//!
//! Bars are replayed in arrival order. For each bar the strategy sees the
//! close and volume first. A book that is flat at the start of the bar may
//! enter; a book holding a position may exit. One bar never does both.
//! Positions still open after the last bar stay open.

use tracing::{debug, info, warn};

use crate::domain::book::Book;
use crate::domain::ohlcv::Bar;
use crate::domain::position::{Direction, Position, TradeResult};
use crate::domain::risk::{OrderRequest, RiskConfig, RiskManager};
use crate::domain::strategy::Strategy;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub initial_capital: f64,
    pub fee: f64,
    pub allow_shorting: bool,
    pub risk: RiskConfig,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            symbol: "BTCUSDT".into(),
            initial_capital: 10_000.0,
            fee: 0.001,
            allow_shorting: false,
            risk: RiskConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub symbol: String,
    pub initial_capital: f64,
    pub final_capital: f64,
    pub trades: Vec<TradeResult>,
    pub open_position: Option<Position>,
    pub bars_processed: usize,
    pub rejected_orders: usize,
}

impl BacktestResult {
    pub fn total_pnl(&self) -> f64 {
        self.final_capital - self.initial_capital
    }
}

#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
    risk: RiskManager,
}

impl BacktestEngine {
    pub fn new(config: BacktestConfig) -> Self {
        let risk = RiskManager::new(config.risk.clone());
        BacktestEngine { config, risk }
    }

    pub fn config(&self) -> &BacktestConfig {
        &self.config
    }

    pub fn run(&self, bars: &[Bar], strategy: &mut dyn Strategy) -> BacktestResult {
        info!(
            symbol = %self.config.symbol,
            strategy = strategy.name(),
            bars = bars.len(),
            initial_capital = self.config.initial_capital,
            "starting backtest"
        );

        let mut book = Book::new(self.config.initial_capital, self.config.fee);
        let mut rejected_orders = 0;

        for (i, bar) in bars.iter().enumerate() {
            strategy.update_market_data(bar.close, bar.volume);

            if book.is_flat() {
                let direction = if strategy.should_enter_long() {
                    Some(Direction::Long)
                } else if self.config.allow_shorting && strategy.should_enter_short() {
                    Some(Direction::Short)
                } else {
                    None
                };

                if let Some(direction) = direction {
                    let quantity = self.entry_quantity(&book, &bars[..=i]);
                    let order =
                        OrderRequest::market(&self.config.symbol, direction.entry_side(), quantity);
                    match self.risk.validate(&order, bar.close) {
                        Ok(()) => {
                            book.open(direction, bar.close, quantity, &bar.timestamp);
                        }
                        Err(e) => {
                            rejected_orders += 1;
                            warn!(
                                time = %bar.timestamp,
                                %direction,
                                quantity,
                                "order rejected: {e}"
                            );
                        }
                    }
                }
            } else {
                let exit = match &book.position {
                    Some(pos) if pos.is_long() => strategy.should_exit_long(pos),
                    Some(pos) => strategy.should_exit_short(pos),
                    None => false,
                };
                if exit {
                    book.close(bar.close, &bar.timestamp);
                }
            }

            debug!(
                time = %bar.timestamp,
                close = bar.close,
                capital = book.capital,
                equity = book.equity(bar.close),
                "bar processed"
            );
        }

        info!(
            symbol = %self.config.symbol,
            trades = book.ledger.len(),
            final_capital = book.capital,
            rejected_orders,
            open = !book.is_flat(),
            "backtest finished"
        );

        BacktestResult {
            symbol: self.config.symbol.clone(),
            initial_capital: book.initial_capital,
            final_capital: book.capital,
            trades: book.ledger,
            open_position: book.position,
            bars_processed: bars.len(),
            rejected_orders,
        }
    }

    /// Size off ATR of the real bar ranges seen so far: the mean true range
    /// of the last `atr_period` bars, `None` until `atr_period + 1` bars.
    fn entry_quantity(&self, book: &Book, history: &[Bar]) -> f64 {
        let Some(last) = history.last() else {
            return 0.0;
        };
        let period = self.risk.config().atr_period;
        let atr = (period > 0 && history.len() > period).then(|| {
            let window = &history[history.len() - period - 1..];
            let sum: f64 = window
                .windows(2)
                .map(|pair| pair[1].true_range(pair[0].close))
                .sum();
            sum / period as f64
        });
        self.risk.position_size(book.capital, last.close, atr)
    }
}

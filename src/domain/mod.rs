//! Core domain types and logic.

pub mod backtest;
pub mod book;
pub mod config_validation;
pub mod error;
pub mod indicator;
pub mod live;
pub mod market_data;
pub mod metrics;
pub mod ohlcv;
pub mod position;
pub mod risk;
pub mod rolling;
pub mod strategy;

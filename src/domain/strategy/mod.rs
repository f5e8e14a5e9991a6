//! Signal generation.
//!
//! Engines drive any [`Strategy`]: feed it one observation per bar or tick,
//! then ask the entry/exit predicates. Predicates are pure over the
//! strategy's own history and parameters and return `false` whenever there is
//! not enough history.

pub mod enhanced;
pub mod simple;

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SigtraderError;
use crate::domain::position::Position;

pub use enhanced::{EnhancedParams, EnhancedStrategy};
pub use simple::{SimpleParams, SmaCrossStrategy};

pub trait Strategy {
    fn name(&self) -> &str;

    fn update_market_data(&mut self, price: f64, volume: f64);

    fn should_enter_long(&self) -> bool;

    fn should_exit_long(&self, position: &Position) -> bool;

    fn should_enter_short(&self) -> bool;

    fn should_exit_short(&self, position: &Position) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Simple,
    Enhanced,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Simple => write!(f, "simple"),
            StrategyKind::Enhanced => write!(f, "enhanced"),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "simple" | "sma" => Ok(StrategyKind::Simple),
            "enhanced" => Ok(StrategyKind::Enhanced),
            other => Err(SigtraderError::ConfigInvalid {
                section: "strategy".into(),
                key: "kind".into(),
                reason: format!("unknown strategy kind '{}': expected simple or enhanced", other),
            }),
        }
    }
}

/// Parameters for whichever strategy variant is configured.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub kind: StrategyKind,
    pub simple: SimpleParams,
    pub enhanced: EnhancedParams,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        StrategyConfig {
            kind: StrategyKind::Enhanced,
            simple: SimpleParams::default(),
            enhanced: EnhancedParams::default(),
        }
    }
}

pub fn build_strategy(config: &StrategyConfig) -> Box<dyn Strategy> {
    match config.kind {
        StrategyKind::Simple => Box::new(SmaCrossStrategy::new(config.simple.clone())),
        StrategyKind::Enhanced => Box::new(EnhancedStrategy::new(config.enhanced.clone())),
    }
}

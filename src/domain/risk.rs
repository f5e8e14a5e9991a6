//! Volatility-based position sizing and order validation.
//!
//! quantity = floor(capital * risk_fraction / (atr_stop_multiplier * ATR), 3dp),
//! clamped so that quantity * price <= capital * max_position_fraction.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::SigtraderError;

/// Lower bound on the stop distance, as a fraction of price. Keeps sizing
/// finite when ATR is zero or unknown; the exposure cap then decides.
pub const MIN_STOP_FRACTION: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct RiskConfig {
    pub risk_fraction: f64,
    pub atr_period: usize,
    pub atr_stop_multiplier: f64,
    pub max_position_fraction: f64,
    pub min_order_size: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        RiskConfig {
            risk_fraction: 0.01,
            atr_period: 14,
            atr_stop_multiplier: 2.0,
            max_position_fraction: 0.10,
            min_order_size: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "BUY"),
            OrderSide::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            other => Err(SigtraderError::InvalidOrderParameters {
                reason: format!("invalid side '{}': must be BUY or SELL", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Limit => write!(f, "LIMIT"),
        }
    }
}

impl FromStr for OrderType {
    type Err = SigtraderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            other => Err(SigtraderError::InvalidOrderParameters {
                reason: format!("invalid order type '{}': must be MARKET or LIMIT", other),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    /// Required for LIMIT orders, ignored for MARKET orders.
    pub price: Option<f64>,
}

impl OrderRequest {
    pub fn market(symbol: &str, side: OrderSide, quantity: f64) -> Self {
        OrderRequest {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Market,
            quantity,
            price: None,
        }
    }

    pub fn limit(symbol: &str, side: OrderSide, quantity: f64, price: f64) -> Self {
        OrderRequest {
            symbol: symbol.to_string(),
            side,
            order_type: OrderType::Limit,
            quantity,
            price: Some(price),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskManager {
    config: RiskConfig,
}

impl RiskManager {
    pub fn new(config: RiskConfig) -> Self {
        RiskManager { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Quantity to trade at `price` given the current capital and an ATR
    /// estimate (`None` when not enough history for one).
    pub fn position_size(&self, capital: f64, price: f64, atr: Option<f64>) -> f64 {
        if !(capital > 0.0 && price > 0.0 && capital.is_finite() && price.is_finite()) {
            return 0.0;
        }

        let atr = atr.filter(|a| a.is_finite() && *a > 0.0).unwrap_or(0.0);
        let stop_distance = (atr * self.config.atr_stop_multiplier).max(price * MIN_STOP_FRACTION);
        let risk_amount = capital * self.config.risk_fraction;

        let mut quantity = (risk_amount / stop_distance * 1000.0).floor() / 1000.0;

        let max_notional = capital * self.config.max_position_fraction;
        if quantity * price > max_notional {
            quantity = max_notional / price;
        }

        quantity.max(0.0)
    }

    /// Reject orders that are empty, priceless LIMIT orders, or smaller than
    /// the configured minimum notional. MARKET orders are valued at
    /// `reference_price`.
    pub fn validate(
        &self,
        order: &OrderRequest,
        reference_price: f64,
    ) -> Result<(), SigtraderError> {
        let price = execution_price(order, reference_price)?;

        let notional = order.quantity * price;
        if !(notional >= self.config.min_order_size) {
            return Err(SigtraderError::InvalidOrderParameters {
                reason: format!(
                    "order size {:.2} below minimum {:.2}",
                    notional, self.config.min_order_size
                ),
            });
        }

        Ok(())
    }

    /// Checks for an order that flattens an open position. The minimum
    /// notional does not apply.
    pub fn validate_close(
        &self,
        order: &OrderRequest,
        reference_price: f64,
    ) -> Result<(), SigtraderError> {
        execution_price(order, reference_price).map(|_| ())
    }
}

fn execution_price(order: &OrderRequest, reference_price: f64) -> Result<f64, SigtraderError> {
    if !(order.quantity.is_finite() && order.quantity > 0.0) {
        return Err(SigtraderError::InvalidOrderParameters {
            reason: format!("quantity must be positive, got {}", order.quantity),
        });
    }

    match order.order_type {
        OrderType::Market => Ok(reference_price),
        OrderType::Limit => match order.price {
            Some(p) if p.is_finite() && p > 0.0 => Ok(p),
            _ => Err(SigtraderError::InvalidOrderParameters {
                reason: "LIMIT order requires a positive price".into(),
            }),
        },
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        RiskManager::new(RiskConfig::default())
    }
}

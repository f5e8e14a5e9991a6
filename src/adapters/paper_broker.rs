//! In-process broker that accepts orders without routing them anywhere.

use tracing::info;

use crate::domain::error::SigtraderError;
use crate::domain::risk::OrderRequest;
use crate::ports::order_port::{OrderAck, OrderPort};

#[derive(Debug, Clone, Default)]
pub struct PaperBroker {
    submitted: Vec<(String, OrderRequest)>,
    reject_all: bool,
}

impl PaperBroker {
    pub fn new() -> Self {
        PaperBroker::default()
    }

    /// A broker that refuses every order, for exercising failure paths.
    pub fn rejecting() -> Self {
        PaperBroker {
            submitted: Vec::new(),
            reject_all: true,
        }
    }

    /// Accepted orders with their ids, in submission order.
    pub fn submitted(&self) -> &[(String, OrderRequest)] {
        &self.submitted
    }
}

impl OrderPort for PaperBroker {
    fn submit_order(&mut self, order: &OrderRequest) -> Result<OrderAck, SigtraderError> {
        if self.reject_all {
            return Err(SigtraderError::OrderRejected {
                reason: "paper broker is rejecting orders".into(),
            });
        }

        let order_id = format!("paper-{}", self.submitted.len() + 1);
        info!(
            %order_id,
            symbol = %order.symbol,
            side = %order.side,
            order_type = %order.order_type,
            quantity = order.quantity,
            "paper order filled"
        );
        self.submitted.push((order_id.clone(), order.clone()));
        Ok(OrderAck { order_id })
    }
}

//! Order submission port trait.

use crate::domain::error::SigtraderError;
use crate::domain::risk::OrderRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: String,
}

pub trait OrderPort {
    /// Submit a validated order. A broker refusal is `OrderRejected`.
    fn submit_order(&mut self, order: &OrderRequest) -> Result<OrderAck, SigtraderError>;
}

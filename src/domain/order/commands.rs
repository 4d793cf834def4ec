use rust_decimal::Decimal;
use serde::Deserialize;

use super::errors::OrderError;

// ============================================================================
// Order Commands
// ============================================================================

/// Raw POST /orders body; every field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPayload {
    pub item: Option<String>,
    pub amount: Option<Decimal>,
    pub customer_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceOrder {
    pub item: String,
    pub amount: Decimal,
    pub customer_id: i64,
}

impl TryFrom<OrderPayload> for PlaceOrder {
    type Error = OrderError;

    fn try_from(payload: OrderPayload) -> Result<Self, Self::Error> {
        let (Some(item), Some(amount), Some(customer_id)) =
            (payload.item, payload.amount, payload.customer_id)
        else {
            return Err(OrderError::MissingFields);
        };

        let item = item.trim().to_string();
        if item.is_empty() {
            return Err(OrderError::EmptyItem);
        }
        if amount < Decimal::ZERO {
            return Err(OrderError::NegativeAmount(amount));
        }

        Ok(Self {
            item,
            amount,
            customer_id,
        })
    }
}

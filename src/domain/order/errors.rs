use rust_decimal::Decimal;

use crate::store::StoreError;

// ============================================================================
// Order Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("Item, amount, and customer_id are required")]
    MissingFields,

    #[error("Item cannot be empty")]
    EmptyItem,

    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),

    #[error("Customer not found")]
    CustomerNotFound(i64),

    /// Store write failed and was rolled back; no notification was attempted
    #[error("Could not save order")]
    Persistence(#[source] StoreError),
}

impl OrderError {
    /// Label for the order_placement_failures_total metric
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::MissingFields | OrderError::EmptyItem | OrderError::NegativeAmount(_) => "validation",
            OrderError::CustomerNotFound(_) => "customer_not_found",
            OrderError::Persistence(_) => "persistence",
        }
    }
}

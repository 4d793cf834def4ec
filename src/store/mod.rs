// ============================================================================
// Persistence Store
// ============================================================================
//
// Durable record of customers and orders. Every write runs inside its own
// transaction: committed on success, rolled back on any error.
//
// - postgres/ - sqlx-backed store used in production
// - memory/   - in-process store used by tests and local runs without a DB
//
// ============================================================================

mod memory;
mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::{Customer, NewCustomer, NewOrder, Order};

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type SharedStore = Arc<dyn Store>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.kind() {
                ErrorKind::UniqueViolation => return StoreError::UniqueViolation(constraint),
                ErrorKind::ForeignKeyViolation => return StoreError::ForeignKeyViolation(constraint),
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a customer; `code` must be unique across all customers
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StoreError>;

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Insert an order; `customer_id` must reference an existing customer
    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;

    fn backend_name(&self) -> &'static str;
}

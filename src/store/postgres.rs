use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;

use super::{Store, StoreError};
use crate::models::{Customer, NewCustomer, NewOrder, Order};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Apply pending migrations from ./migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Logs a failed rollback so the insert error stays the one returned
async fn rollback(tx: Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Transaction rollback failed");
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, code, number)
             VALUES ($1, $2, $3)
             RETURNING id, name, code, number",
        )
        .bind(&customer.name)
        .bind(&customer.code)
        .bind(&customer.number)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, code, number FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, code, number FROM customers ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, Order>(
            "INSERT INTO orders (item, amount, customer_id, time)
             VALUES ($1, $2, $3, $4)
             RETURNING id, item, amount, customer_id, time",
        )
        .bind(&order.item)
        .bind(order.amount)
        .bind(order.customer_id)
        .bind(order.time)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) => {
                rollback(tx).await;
                Err(e.into())
            }
        }
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT id, item, amount, customer_id, time FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

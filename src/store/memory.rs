use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Store, StoreError};
use crate::models::{Customer, NewCustomer, NewOrder, Order};

/// In-process store with the same constraints as the Postgres schema.
///
/// Ids start at 1 and are never reused. A write either lands completely or
/// leaves the tables untouched, which is all the rollback this store needs.
#[derive(Default, Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    orders: BTreeMap<i64, Order>,
    last_customer_id: i64,
    last_order_id: i64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.customers.values().any(|c| c.code == customer.code) {
            return Err(StoreError::UniqueViolation("customers_code_key".to_string()));
        }

        tables.last_customer_id += 1;
        let row = Customer {
            id: tables.last_customer_id,
            name: customer.name,
            code: customer.code,
            number: customer.number,
        };
        tables.customers.insert(row.id, row.clone());

        Ok(row)
    }

    async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.get(&id).cloned())
    }

    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.customers.values().cloned().collect())
    }

    async fn create_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.customers.contains_key(&order.customer_id) {
            return Err(StoreError::ForeignKeyViolation("orders_customer_id_fkey".to_string()));
        }

        tables.last_order_id += 1;
        let row = Order {
            id: tables.last_order_id,
            item: order.item,
            amount: order.amount,
            customer_id: order.customer_id,
            time: Some(order.time),
        };
        tables.orders.insert(row.id, row.clone());

        Ok(row)
    }

    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.orders.values().cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn john() -> NewCustomer {
        NewCustomer {
            name: "John Doe".to_string(),
            code: "JD123".to_string(),
            number: "+254100716916".to_string(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_from_one() {
        let store = MemoryStore::new();
        let first = store.create_customer(john()).await.unwrap();
        let second = store
            .create_customer(NewCustomer {
                code: "JS456".to_string(),
                ..john()
            })
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected_without_insert() {
        let store = MemoryStore::new();
        store.create_customer(john()).await.unwrap();

        let result = store.create_customer(john()).await;
        assert!(matches!(result, Err(StoreError::UniqueViolation(_))));
        assert_eq!(store.list_customers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_order_requires_existing_customer() {
        let store = MemoryStore::new();

        let result = store
            .create_order(NewOrder {
                item: "Laptop".to_string(),
                amount: dec!(1200.00),
                customer_id: 42,
                time: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(StoreError::ForeignKeyViolation(_))));
        assert!(store.list_orders().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_is_linked_to_customer() {
        let store = MemoryStore::new();
        let customer = store.create_customer(john()).await.unwrap();

        let order = store
            .create_order(NewOrder {
                item: "Laptop".to_string(),
                amount: dec!(1200.00),
                customer_id: customer.id,
                time: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.customer_id, customer.id);
        assert!(order.time.is_some());
        assert_eq!(store.list_orders().await.unwrap(), vec![order]);
    }
}

use chrono::Utc;
use std::sync::Arc;

use super::commands::{OrderPayload, PlaceOrder};
use super::errors::OrderError;
use crate::messaging::{NotificationError, Notifier};
use crate::metrics::Metrics;
use crate::models::{NewOrder, Order};
use crate::store::{SharedStore, StoreError};

// ============================================================================
// Order Command Handler - order placement flow
// ============================================================================
//
// validate -> resolve customer -> persist (own transaction) -> notify
//
// Nothing is written before validation and customer resolution succeed.
// The notification starts only after the order commit and its outcome never
// changes the result: the order is placed either way.
//
// ============================================================================

/// A committed order plus what happened to its notification
#[derive(Debug)]
pub struct PlacedOrder {
    pub order: Order,
    pub notification: Result<(), NotificationError>,
}

pub struct OrderCommandHandler {
    store: SharedStore,
    notifier: Notifier,
    metrics: Arc<Metrics>,
}

impl OrderCommandHandler {
    pub fn new(store: SharedStore, notifier: Notifier, metrics: Arc<Metrics>) -> Self {
        Self {
            store,
            notifier,
            metrics,
        }
    }

    #[tracing::instrument(skip_all, fields(customer_id = payload.customer_id))]
    pub async fn place_order(&self, payload: OrderPayload) -> Result<PlacedOrder, OrderError> {
        let result = self.place(payload).await;
        match &result {
            Ok(_) => self.metrics.record_order_placed(),
            Err(e) => self.metrics.record_order_failure(e.reason()),
        }
        result
    }

    async fn place(&self, payload: OrderPayload) -> Result<PlacedOrder, OrderError> {
        let command = PlaceOrder::try_from(payload)?;

        let customer = self
            .store
            .get_customer(command.customer_id)
            .await
            .map_err(|e| persistence_failure(e, "Failed to look up customer"))?
            .ok_or(OrderError::CustomerNotFound(command.customer_id))?;

        let order = self
            .store
            .create_order(NewOrder {
                item: command.item,
                amount: command.amount,
                customer_id: customer.id,
                time: Utc::now(),
            })
            .await
            .map_err(|e| match e {
                // Customer disappeared between lookup and insert
                StoreError::ForeignKeyViolation(_) => OrderError::CustomerNotFound(customer.id),
                other => persistence_failure(other, "Failed to persist order, transaction rolled back"),
            })?;

        tracing::info!(
            order_id = order.id,
            customer_id = customer.id,
            item = %order.item,
            amount = %order.amount,
            "✅ Order placed"
        );

        let notification = match self.notifier.notify_order_placed(&customer, &order).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(
                    order_id = order.id,
                    customer_id = customer.id,
                    error = %e,
                    "Order notification failed, order stays placed"
                );
                Err(e)
            }
        };

        Ok(PlacedOrder { order, notification })
    }

    pub async fn list(&self) -> Result<Vec<Order>, StoreError> {
        self.store.list_orders().await
    }
}

fn persistence_failure(err: StoreError, context: &'static str) -> OrderError {
    tracing::error!(error = %err, "{}", context);
    OrderError::Persistence(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::testing::RecordingGateway;
    use crate::models::{Customer, NewCustomer};
    use crate::store::{MemoryStore, Store};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    struct Fixture {
        handler: OrderCommandHandler,
        store: Arc<MemoryStore>,
        gateway: Arc<RecordingGateway>,
    }

    fn fixture(gateway: RecordingGateway) -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let metrics = Arc::new(Metrics::new().unwrap());
        let notifier = Notifier::new(gateway.clone(), Duration::from_millis(200), metrics.clone());

        Fixture {
            handler: OrderCommandHandler::new(store.clone(), notifier, metrics),
            store,
            gateway,
        }
    }

    async fn add_john(store: &MemoryStore) -> Customer {
        store
            .create_customer(NewCustomer {
                name: "John Doe".to_string(),
                code: "JD123".to_string(),
                number: "+254100716916".to_string(),
            })
            .await
            .unwrap()
    }

    fn laptop(customer_id: i64) -> OrderPayload {
        OrderPayload {
            item: Some("Laptop".to_string()),
            amount: Some(dec!(1200.00)),
            customer_id: Some(customer_id),
        }
    }

    #[actix_web::test]
    async fn test_valid_order_is_persisted_and_notified_once() {
        let f = fixture(RecordingGateway::default());
        let john = add_john(&f.store).await;

        let placed = f.handler.place_order(laptop(john.id)).await.unwrap();

        assert_eq!(placed.order.id, 1);
        assert_eq!(placed.order.customer_id, john.id);
        assert!(placed.notification.is_ok());
        assert_eq!(f.store.list_orders().await.unwrap(), vec![placed.order]);
        assert_eq!(
            f.gateway.calls(),
            vec![(
                "Hello, Your Order 1 has been placed.".to_string(),
                vec!["+254100716916".to_string()]
            )]
        );
    }

    #[actix_web::test]
    async fn test_missing_fields_have_no_side_effects() {
        let f = fixture(RecordingGateway::default());
        let john = add_john(&f.store).await;

        for payload in [
            OrderPayload { item: None, ..laptop(john.id) },
            OrderPayload { amount: None, ..laptop(john.id) },
            OrderPayload { customer_id: None, ..laptop(john.id) },
        ] {
            let result = f.handler.place_order(payload).await;
            assert!(matches!(result, Err(OrderError::MissingFields)));
        }

        assert!(f.store.list_orders().await.unwrap().is_empty());
        assert!(f.gateway.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_unknown_customer_has_no_side_effects() {
        let f = fixture(RecordingGateway::default());

        let result = f.handler.place_order(laptop(99)).await;

        assert!(matches!(result, Err(OrderError::CustomerNotFound(99))));
        assert!(f.store.list_orders().await.unwrap().is_empty());
        assert!(f.gateway.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_gateway_failure_does_not_fail_the_order() {
        let f = fixture(RecordingGateway::failing());
        let john = add_john(&f.store).await;

        let placed = f.handler.place_order(laptop(john.id)).await.unwrap();

        assert!(placed.notification.is_err());
        assert_eq!(f.store.list_orders().await.unwrap().len(), 1);
        assert_eq!(f.gateway.calls().len(), 1);
    }

    #[actix_web::test]
    async fn test_stalled_gateway_does_not_fail_the_order() {
        let f = fixture(RecordingGateway::stalling());
        let john = add_john(&f.store).await;

        let placed = f.handler.place_order(laptop(john.id)).await.unwrap();

        assert!(matches!(placed.notification, Err(NotificationError::Timeout(_))));
        assert_eq!(f.store.list_orders().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_identical_payloads_create_distinct_orders() {
        let f = fixture(RecordingGateway::default());
        let john = add_john(&f.store).await;

        let first = f.handler.place_order(laptop(john.id)).await.unwrap();
        let second = f.handler.place_order(laptop(john.id)).await.unwrap();

        assert_ne!(first.order.id, second.order.id);
        assert_eq!(f.gateway.calls().len(), 2);
    }

    /// Store whose order insert always fails
    struct BrokenOrders(MemoryStore);

    #[async_trait]
    impl Store for BrokenOrders {
        async fn create_customer(&self, c: NewCustomer) -> Result<Customer, StoreError> {
            self.0.create_customer(c).await
        }
        async fn get_customer(&self, id: i64) -> Result<Option<Customer>, StoreError> {
            self.0.get_customer(id).await
        }
        async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
            self.0.list_customers().await
        }
        async fn create_order(&self, _: NewOrder) -> Result<Order, StoreError> {
            Err(StoreError::Database(sqlx::Error::PoolTimedOut))
        }
        async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
            self.0.list_orders().await
        }
        async fn ping(&self) -> Result<(), StoreError> {
            Ok(())
        }
        fn backend_name(&self) -> &'static str {
            "broken"
        }
    }

    #[actix_web::test]
    async fn test_persistence_failure_skips_notification() {
        let inner = MemoryStore::new();
        let john = add_john(&inner).await;
        let gateway = Arc::new(RecordingGateway::default());
        let metrics = Arc::new(Metrics::new().unwrap());
        let handler = OrderCommandHandler::new(
            Arc::new(BrokenOrders(inner)),
            Notifier::new(gateway.clone(), Duration::from_millis(200), metrics.clone()),
            metrics,
        );

        let result = handler.place_order(laptop(john.id)).await;

        assert!(matches!(result, Err(OrderError::Persistence(_))));
        assert!(gateway.calls().is_empty());
    }
}

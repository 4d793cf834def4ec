use std::sync::Arc;

use super::commands::{CustomerPayload, RegisterCustomer};
use super::errors::CustomerError;
use crate::metrics::Metrics;
use crate::models::{Customer, NewCustomer};
use crate::store::{SharedStore, StoreError};

// ============================================================================
// Customer Command Handler
// ============================================================================
//
// Validate -> persist. No cross-entity lookups, no side effects.
//
// ============================================================================

pub struct CustomerCommandHandler {
    store: SharedStore,
    metrics: Arc<Metrics>,
}

impl CustomerCommandHandler {
    pub fn new(store: SharedStore, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    #[tracing::instrument(skip_all)]
    pub async fn register(&self, payload: CustomerPayload) -> Result<Customer, CustomerError> {
        let command = RegisterCustomer::try_from(payload)?;
        let code = command.code.clone();

        let customer = self
            .store
            .create_customer(NewCustomer {
                name: command.name,
                code: command.code,
                number: command.number.into_inner(),
            })
            .await
            .map_err(|e| {
                match &e {
                    StoreError::UniqueViolation(constraint) => tracing::warn!(
                        code = %code,
                        constraint = %constraint,
                        "Customer code already taken, insert rolled back"
                    ),
                    other => tracing::error!(
                        error = %other,
                        code = %code,
                        "Failed to persist customer, transaction rolled back"
                    ),
                }
                CustomerError::Persistence(e)
            })?;

        self.metrics.record_customer_registered();
        tracing::info!(customer_id = customer.id, code = %customer.code, "✅ Customer registered");

        Ok(customer)
    }

    pub async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        self.store.list_customers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, Store};

    fn handler() -> (CustomerCommandHandler, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(Metrics::new().unwrap());
        (CustomerCommandHandler::new(store.clone(), metrics), store)
    }

    fn john() -> CustomerPayload {
        CustomerPayload {
            name: Some("John Doe".to_string()),
            code: Some("JD123".to_string()),
            number: Some("+254100716916".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_persists_exactly_one_customer() {
        let (handler, store) = handler();

        let customer = handler.register(john()).await.unwrap();

        assert_eq!(customer.id, 1);
        assert_eq!(store.list_customers().await.unwrap(), vec![customer]);
    }

    #[tokio::test]
    async fn test_missing_field_persists_nothing() {
        let (handler, store) = handler();

        let result = handler
            .register(CustomerPayload {
                number: None,
                ..john()
            })
            .await;

        assert!(matches!(result, Err(CustomerError::MissingFields)));
        assert!(store.list_customers().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_code_is_a_persistence_error() {
        let (handler, store) = handler();
        handler.register(john()).await.unwrap();

        let result = handler.register(john()).await;

        assert!(matches!(
            result,
            Err(CustomerError::Persistence(StoreError::UniqueViolation(_)))
        ));
        assert_eq!(store.list_customers().await.unwrap().len(), 1);
    }
}

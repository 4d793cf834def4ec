use std::sync::Arc;
use std::time::{Duration, Instant};

use super::gateway::{DeliveryReport, NotificationError, NotificationGateway};
use crate::health::ComponentHealth;
use crate::metrics::Metrics;
use crate::models::{Customer, Order};

pub fn order_placed_message(order_id: i64) -> String {
    format!("Hello, Your Order {} has been placed.", order_id)
}

/// Sends the "order placed" SMS.
///
/// The result is returned, never raised: callers log it and move on. Every
/// attempt is bounded by `timeout` regardless of the gateway's own settings.
#[derive(Clone)]
pub struct Notifier {
    gateway: Arc<dyn NotificationGateway>,
    timeout: Duration,
    metrics: Arc<Metrics>,
}

impl Notifier {
    pub fn new(gateway: Arc<dyn NotificationGateway>, timeout: Duration, metrics: Arc<Metrics>) -> Self {
        Self {
            gateway,
            timeout,
            metrics,
        }
    }

    pub async fn notify_order_placed(
        &self,
        customer: &Customer,
        order: &Order,
    ) -> Result<DeliveryReport, NotificationError> {
        let message = order_placed_message(order.id);
        let recipients = [customer.number.clone()];
        let started = Instant::now();

        let outcome = match tokio::time::timeout(self.timeout, self.gateway.send(&message, &recipients)).await {
            Ok(result) => result.and_then(DeliveryReport::into_accepted),
            Err(_) => Err(NotificationError::Timeout(self.timeout)),
        };

        let elapsed = started.elapsed().as_secs_f64();
        match &outcome {
            Ok(_) => {
                self.metrics.record_notification("sent", elapsed);
                tracing::debug!(
                    order_id = order.id,
                    gateway = self.gateway.name(),
                    "Order notification delivered to gateway"
                );
            }
            Err(_) => self.metrics.record_notification("failed", elapsed),
        }

        outcome
    }

    pub async fn health(&self) -> ComponentHealth {
        self.gateway.health().await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use super::super::gateway::{DeliveryReport, NotificationError, NotificationGateway, RecipientStatus};

    /// Records every send; optionally fails or stalls
    #[derive(Default)]
    pub struct RecordingGateway {
        pub sent: Mutex<Vec<(String, Vec<String>)>>,
        pub fail: bool,
        pub stall: bool,
    }

    impl RecordingGateway {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn stalling() -> Self {
            Self {
                stall: true,
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<(String, Vec<String>)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait(?Send)]
    impl NotificationGateway for RecordingGateway {
        async fn send(&self, message: &str, recipients: &[String]) -> Result<DeliveryReport, NotificationError> {
            self.sent
                .lock()
                .unwrap()
                .push((message.to_string(), recipients.to_vec()));

            if self.stall {
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
            if self.fail {
                return Err(NotificationError::Http {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }

            Ok(DeliveryReport {
                recipients: recipients
                    .iter()
                    .map(|n| RecipientStatus {
                        number: n.clone(),
                        status: "Success".to_string(),
                        status_code: 101,
                        message_id: Some("ATPid_test".to_string()),
                        cost: None,
                    })
                    .collect(),
            })
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }
}

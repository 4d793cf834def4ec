use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

use crate::health::{ComponentHealth, HealthStatus};

/// Per-recipient outcome as reported by the gateway
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipientStatus {
    pub number: String,
    pub status: String,
    pub status_code: u16,
    pub message_id: Option<String>,
    pub cost: Option<String>,
}

impl RecipientStatus {
    /// 100 Processed, 101 Sent, 102 Queued
    pub fn is_accepted(&self) -> bool {
        (100..=102).contains(&self.status_code)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeliveryReport {
    pub recipients: Vec<RecipientStatus>,
}

impl DeliveryReport {
    /// Fail if the gateway took the request but refused any recipient
    pub fn into_accepted(self) -> Result<Self, NotificationError> {
        if self.recipients.is_empty() {
            return Err(NotificationError::InvalidResponse(
                "no recipients in delivery report".to_string(),
            ));
        }
        if let Some(rejected) = self.recipients.iter().find(|r| !r.is_accepted()) {
            return Err(NotificationError::Rejected {
                number: rejected.number.clone(),
                status: rejected.status.clone(),
            });
        }
        Ok(self)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("No recipients given")]
    NoRecipients,

    #[error("Gateway request failed: {0}")]
    Transport(String),

    #[error("Gateway returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),

    #[error("Recipient {number} rejected: {status}")]
    Rejected { number: String, status: String },

    #[error("Gateway did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Circuit breaker open for SMS gateway")]
    CircuitOpen,
}

/// Outbound SMS delivery.
///
/// Futures are `?Send` because the HTTP client runs on the actix worker
/// that owns the request.
#[async_trait(?Send)]
pub trait NotificationGateway: Send + Sync {
    async fn send(&self, message: &str, recipients: &[String]) -> Result<DeliveryReport, NotificationError>;

    fn name(&self) -> &'static str;

    async fn health(&self) -> ComponentHealth {
        ComponentHealth::new(format!("sms ({})", self.name()), HealthStatus::Healthy)
    }
}

/// Used when no SMS credentials are configured: writes the message to the log
pub struct LogOnlyGateway;

#[async_trait(?Send)]
impl NotificationGateway for LogOnlyGateway {
    async fn send(&self, message: &str, recipients: &[String]) -> Result<DeliveryReport, NotificationError> {
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }

        tracing::info!(
            to = %recipients.join(","),
            message = %message,
            "📨 SMS gateway not configured, logging notification instead"
        );

        Ok(DeliveryReport {
            recipients: recipients
                .iter()
                .map(|number| RecipientStatus {
                    number: number.clone(),
                    status: "Logged".to_string(),
                    status_code: 100,
                    message_id: None,
                    cost: None,
                })
                .collect(),
        })
    }

    fn name(&self) -> &'static str {
        "log-only"
    }
}

use async_trait::async_trait;
use awc::error::SendRequestError;
use awc::http::header;
use serde::Deserialize;
use std::time::Duration;

use super::gateway::{DeliveryReport, NotificationError, NotificationGateway, RecipientStatus};
use crate::health::{ComponentHealth, HealthStatus};
use crate::utils::{BreakerError, CircuitBreaker, CircuitState};

pub const DEFAULT_ENDPOINT: &str = "https://api.africastalking.com/version1/messaging";

#[derive(Clone, Debug)]
pub struct AfricasTalkingConfig {
    pub endpoint: String,
    pub username: String,
    pub api_key: String,
    pub sender_id: Option<String>,
    pub timeout: Duration,
}

/// SMS client for the Africa's Talking bulk messaging endpoint.
///
/// Transport and HTTP failures count against the circuit breaker. A
/// recipient the gateway refuses (bad number, blacklisted) does not: the
/// gateway itself answered fine.
pub struct AfricasTalkingGateway {
    config: AfricasTalkingConfig,
    circuit_breaker: CircuitBreaker,
}

impl AfricasTalkingGateway {
    pub fn new(config: AfricasTalkingConfig, circuit_breaker: CircuitBreaker) -> Self {
        Self {
            config,
            circuit_breaker,
        }
    }

    fn form<'a>(&'a self, message: &'a str, to: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut form = vec![
            ("username", self.config.username.as_str()),
            ("to", to),
            ("message", message),
        ];
        if let Some(from) = &self.config.sender_id {
            form.push(("from", from.as_str()));
        }
        form
    }

    async fn post(&self, message: &str, recipients: &[String]) -> Result<DeliveryReport, NotificationError> {
        let to = recipients.join(",");
        let client = awc::Client::builder().timeout(self.config.timeout).finish();

        let mut response = client
            .post(&self.config.endpoint)
            .insert_header(("apiKey", self.config.api_key.as_str()))
            .insert_header((header::ACCEPT, "application/json"))
            .send_form(&self.form(message, &to))
            .await
            .map_err(|e| match e {
                SendRequestError::Timeout => NotificationError::Timeout(self.config.timeout),
                other => NotificationError::Transport(other.to_string()),
            })?;

        let status = response.status();
        let body = response
            .body()
            .await
            .map_err(|e| NotificationError::InvalidResponse(e.to_string()))?;

        if !status.is_success() {
            return Err(NotificationError::Http {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_response(&body)
    }
}

#[async_trait(?Send)]
impl NotificationGateway for AfricasTalkingGateway {
    async fn send(&self, message: &str, recipients: &[String]) -> Result<DeliveryReport, NotificationError> {
        if recipients.is_empty() {
            return Err(NotificationError::NoRecipients);
        }

        match self.circuit_breaker.call(self.post(message, recipients)).await {
            Ok(report) => {
                tracing::info!(
                    to = %recipients.join(","),
                    accepted = report.recipients.iter().filter(|r| r.is_accepted()).count(),
                    "Submitted SMS to gateway"
                );
                Ok(report)
            }
            Err(BreakerError::Open) => {
                tracing::error!("Circuit breaker open - SMS gateway unavailable");
                Err(NotificationError::CircuitOpen)
            }
            Err(BreakerError::Inner(e)) => {
                tracing::error!(error = %e, "Failed to submit SMS to gateway");
                Err(e)
            }
        }
    }

    fn name(&self) -> &'static str {
        "africastalking"
    }

    async fn health(&self) -> ComponentHealth {
        let name = format!("sms ({})", self.name());
        let status = match self.circuit_breaker.state().await {
            CircuitState::Closed => HealthStatus::Healthy,
            state => HealthStatus::Degraded(format!("circuit breaker {}", state.as_str())),
        };
        ComponentHealth::new(name, status).with_details(format!("endpoint={}", self.config.endpoint))
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Deserialize)]
struct SmsResponse {
    #[serde(rename = "SMSMessageData")]
    data: SmsMessageData,
}

#[derive(Deserialize)]
struct SmsMessageData {
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "Recipients", default)]
    recipients: Vec<SmsRecipient>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SmsRecipient {
    number: String,
    status: String,
    status_code: u16,
    message_id: Option<String>,
    cost: Option<String>,
}

fn parse_response(body: &[u8]) -> Result<DeliveryReport, NotificationError> {
    let parsed: SmsResponse =
        serde_json::from_slice(body).map_err(|e| NotificationError::InvalidResponse(e.to_string()))?;

    tracing::debug!(summary = %parsed.data.message, "SMS gateway response");

    Ok(DeliveryReport {
        recipients: parsed
            .data
            .recipients
            .into_iter()
            .map(|r| RecipientStatus {
                number: r.number,
                status: r.status,
                status_code: r.status_code,
                message_id: r.message_id,
                cost: r.cost,
            })
            .collect(),
    })
}

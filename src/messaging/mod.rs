// ============================================================================
// Messaging - outbound SMS notifications
// ============================================================================
//
// - gateway         - NotificationGateway trait, delivery report, errors
// - africastalking  - HTTP client for the Africa's Talking messaging API
// - notifier        - best-effort "order placed" notification used by the
//                     order flow (bounded by a timeout, never fatal)
//
// ============================================================================

mod africastalking;
mod gateway;
mod notifier;

pub use africastalking::{AfricasTalkingConfig, AfricasTalkingGateway, DEFAULT_ENDPOINT as DEFAULT_SMS_ENDPOINT};
pub use gateway::{LogOnlyGateway, NotificationError, NotificationGateway};
pub use notifier::Notifier;

#[cfg(test)]
pub(crate) use notifier::testing;

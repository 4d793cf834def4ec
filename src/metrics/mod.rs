// Private module declaration
mod server;

use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry};

pub use server::configure;

// ============================================================================
// Metrics Module - Prometheus metrics for observability
// ============================================================================
//
// Covers:
// - Order placement outcomes
// - Customer registrations
// - SMS notification outcomes and latency
// - Circuit breaker state in front of the SMS gateway
//
// Scraped via GET /metrics
// ============================================================================

pub struct Metrics {
    registry: Registry,

    // Order / customer writes
    pub orders_placed: IntCounter,
    pub order_placement_failures: IntCounterVec,
    pub customers_registered: IntCounter,

    // Notifications
    pub notifications: IntCounterVec,
    pub notification_duration: Histogram,

    // Circuit Breaker
    pub circuit_breaker_state: IntGauge,
    pub circuit_breaker_transitions: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let orders_placed = IntCounter::new("orders_placed_total", "Total orders persisted")?;
        registry.register(Box::new(orders_placed.clone()))?;

        let order_placement_failures = IntCounterVec::new(
            Opts::new("order_placement_failures_total", "Order placements rejected or failed"),
            &["reason"],
        )?;
        registry.register(Box::new(order_placement_failures.clone()))?;

        let customers_registered =
            IntCounter::new("customers_registered_total", "Total customers persisted")?;
        registry.register(Box::new(customers_registered.clone()))?;

        let notifications = IntCounterVec::new(
            Opts::new("notifications_total", "Order notifications by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(notifications.clone()))?;

        let notification_duration = Histogram::with_opts(
            HistogramOpts::new("notification_duration_seconds", "SMS gateway call duration")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        )?;
        registry.register(Box::new(notification_duration.clone()))?;

        let circuit_breaker_state = IntGauge::new(
            "circuit_breaker_state",
            "SMS circuit breaker state (0=Closed, 1=Open, 2=HalfOpen)",
        )?;
        registry.register(Box::new(circuit_breaker_state.clone()))?;

        let circuit_breaker_transitions = IntCounterVec::new(
            Opts::new("circuit_breaker_transitions_total", "Circuit breaker state transitions"),
            &["from_state", "to_state"],
        )?;
        registry.register(Box::new(circuit_breaker_transitions.clone()))?;

        Ok(Self {
            registry,
            orders_placed,
            order_placement_failures,
            customers_registered,
            notifications,
            notification_duration,
            circuit_breaker_state,
            circuit_breaker_transitions,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_order_placed(&self) {
        self.orders_placed.inc();
    }

    pub fn record_order_failure(&self, reason: &str) {
        self.order_placement_failures.with_label_values(&[reason]).inc();
    }

    pub fn record_customer_registered(&self) {
        self.customers_registered.inc();
    }

    /// `outcome` is "sent" or "failed"
    pub fn record_notification(&self, outcome: &str, duration_secs: f64) {
        self.notifications.with_label_values(&[outcome]).inc();
        self.notification_duration.observe(duration_secs);
    }

    pub fn record_circuit_breaker_transition(&self, from_state: &str, to_state: &str, gauge: i64) {
        self.circuit_breaker_transitions.with_label_values(&[from_state, to_state]).inc();
        self.circuit_breaker_state.set(gauge);
    }
}

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

// ============================================================================
// Circuit Breaker
// ============================================================================
//
// Guards a flaky downstream (the SMS gateway) so repeated failures fail fast
// instead of holding every request for a full timeout.
//
// States:
// - Closed: calls pass through, consecutive failures are counted
// - Open: calls are rejected until `reset_timeout` has elapsed
// - HalfOpen: trial calls pass; enough successes close, any failure reopens
//
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "Closed",
            CircuitState::Open => "Open",
            CircuitState::HalfOpen => "HalfOpen",
        }
    }

    /// Gauge encoding: 0=Closed, 1=Open, 2=HalfOpen
    pub fn as_gauge(&self) -> i64 {
        match self {
            CircuitState::Closed => 0,
            CircuitState::Open => 1,
            CircuitState::HalfOpen => 2,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CircuitBreakerConfig {
    /// Consecutive failures before opening
    pub failure_threshold: u32,
    /// How long to stay open before letting a trial call through
    pub reset_timeout: Duration,
    /// Trial successes needed to close again
    pub success_threshold: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
            success_threshold: 1,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BreakerError<E: std::error::Error + 'static> {
    #[error("Circuit breaker is open")]
    Open,

    #[error(transparent)]
    Inner(E),
}

type TransitionHook = Arc<dyn Fn(CircuitState, CircuitState) + Send + Sync>;

struct BreakerState {
    state: CircuitState,
    consecutive_failures: u32,
    trial_successes: u32,
    opened_at: Option<Instant>,
}

#[derive(Clone)]
pub struct CircuitBreaker {
    inner: Arc<Mutex<BreakerState>>,
    config: CircuitBreakerConfig,
    on_transition: Option<TransitionHook>,
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BreakerState {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                trial_successes: 0,
                opened_at: None,
            })),
            config,
            on_transition: None,
        }
    }

    /// Register a callback fired on every state change, e.g. to feed metrics
    pub fn with_transition_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(CircuitState, CircuitState) + Send + Sync + 'static,
    {
        self.on_transition = Some(Arc::new(hook));
        self
    }

    /// Run `operation` unless the circuit is open
    pub async fn call<F, T, E>(&self, operation: F) -> Result<T, BreakerError<E>>
    where
        F: Future<Output = Result<T, E>>,
        E: std::error::Error + 'static,
    {
        if !self.admit().await {
            return Err(BreakerError::Open);
        }

        match operation.await {
            Ok(value) => {
                self.record_success().await;
                Ok(value)
            }
            Err(err) => {
                self.record_failure().await;
                Err(BreakerError::Inner(err))
            }
        }
    }

    async fn admit(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.state != CircuitState::Open {
            return true;
        }

        let cooled_down = inner
            .opened_at
            .map(|at| at.elapsed() >= self.config.reset_timeout)
            .unwrap_or(true);

        if cooled_down {
            inner.trial_successes = 0;
            self.transition(&mut inner, CircuitState::HalfOpen);
        }
        cooled_down
    }

    async fn record_success(&self) {
        let mut inner = self.inner.lock().await;
        inner.consecutive_failures = 0;

        if inner.state == CircuitState::HalfOpen {
            inner.trial_successes += 1;
            if inner.trial_successes >= self.config.success_threshold {
                inner.opened_at = None;
                self.transition(&mut inner, CircuitState::Closed);
            }
        }
    }

    async fn record_failure(&self) {
        let mut inner = self.inner.lock().await;
        inner.consecutive_failures += 1;

        let should_open = match inner.state {
            CircuitState::Closed => inner.consecutive_failures >= self.config.failure_threshold,
            CircuitState::HalfOpen => true,
            CircuitState::Open => false,
        };

        if should_open {
            inner.opened_at = Some(Instant::now());
            self.transition(&mut inner, CircuitState::Open);
        }
    }

    fn transition(&self, inner: &mut BreakerState, to: CircuitState) {
        let from = inner.state;
        if from == to {
            return;
        }
        inner.state = to;

        match to {
            CircuitState::Open => tracing::warn!(
                failures = inner.consecutive_failures,
                "Circuit breaker opened"
            ),
            _ => tracing::info!(from = from.as_str(), to = to.as_str(), "Circuit breaker transition"),
        }

        if let Some(hook) = &self.on_transition {
            hook(from, to);
        }
    }

    pub async fn state(&self) -> CircuitState {
        self.inner.lock().await.state
    }
}

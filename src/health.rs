use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::store::Store;

// ============================================================================
// Health Check Abstractions
// ============================================================================
//
// Each collaborator reports a ComponentHealth; the /health endpoint folds
// them into one SystemHealth.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }

    pub fn is_unhealthy(&self) -> bool {
        matches!(self, HealthStatus::Unhealthy(_))
    }

    fn label(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded(_) => "degraded",
            HealthStatus::Unhealthy(_) => "unhealthy",
        }
    }

    fn reason(&self) -> Option<&str> {
        match self {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded(r) | HealthStatus::Unhealthy(r) => Some(r),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub last_check: DateTime<Utc>,
    pub details: Option<String>,
}

impl ComponentHealth {
    pub fn new(name: impl Into<String>, status: HealthStatus) -> Self {
        Self {
            name: name.into(),
            status,
            last_check: Utc::now(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "status": self.status.label(),
            "reason": self.status.reason(),
            "details": self.details,
            "last_check": self.last_check,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SystemHealth {
    pub components: Vec<ComponentHealth>,
}

impl SystemHealth {
    /// Worst status wins: any unhealthy component makes the system unhealthy
    pub fn overall(&self) -> HealthStatus {
        if let Some(c) = self.components.iter().find(|c| c.status.is_unhealthy()) {
            return HealthStatus::Unhealthy(format!("{} is unhealthy", c.name));
        }
        if let Some(c) = self.components.iter().find(|c| !c.status.is_healthy()) {
            return HealthStatus::Degraded(format!("{} is degraded", c.name));
        }
        HealthStatus::Healthy
    }

    pub fn to_json(&self, service: &str) -> Value {
        json!({
            "status": self.overall().label(),
            "service": service,
            "components": self.components.iter().map(ComponentHealth::to_json).collect::<Vec<_>>(),
        })
    }
}

pub async fn check_store(store: &dyn Store) -> ComponentHealth {
    let name = format!("store ({})", store.backend_name());
    match store.ping().await {
        Ok(()) => ComponentHealth::new(name, HealthStatus::Healthy),
        Err(e) => ComponentHealth::new(name, HealthStatus::Unhealthy(e.to_string())),
    }
}

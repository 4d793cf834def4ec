use actix_web::cookie::Key;
use clap::Parser;
use std::time::Duration;

use crate::auth::OidcConfig;
use crate::messaging::{AfricasTalkingConfig, DEFAULT_SMS_ENDPOINT};
use crate::utils::CircuitBreakerConfig;

/// Minimum signing key length accepted by the cookie jar
const MIN_SECRET_LEN: usize = 64;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required unless AUTH_DISABLED is set")]
    MissingOidc(&'static str),

    #[error("SESSION_SECRET must be at least 64 bytes, got {0}")]
    WeakSessionSecret(usize),

    #[error("SMS_API_KEY is required when SMS_USERNAME is set")]
    MissingSmsApiKey,
}

/// Orders API server
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    #[arg(long = "bind", env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub bind_addr: String,

    /// Worker threads (actix default: one per core)
    #[arg(long, env = "HTTP_WORKERS")]
    pub workers: Option<usize>,

    /// Postgres URL. Without it, data lives in memory for the process lifetime
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub database_max_connections: u32,

    /// Skip the login gate on write endpoints
    #[arg(long, env = "AUTH_DISABLED")]
    pub auth_disabled: bool,

    #[arg(long, env = "OIDC_DOMAIN")]
    pub oidc_domain: Option<String>,

    #[arg(long, env = "OIDC_CLIENT_ID")]
    pub oidc_client_id: Option<String>,

    #[arg(long, env = "OIDC_CLIENT_SECRET", hide_env_values = true)]
    pub oidc_client_secret: Option<String>,

    #[arg(long, env = "OIDC_REDIRECT_URL", default_value = "http://localhost:8080/callback")]
    pub oidc_redirect_url: String,

    #[arg(long, env = "OIDC_POST_LOGOUT_URL", default_value = "http://localhost:8080/")]
    pub oidc_post_logout_url: String,

    #[arg(long, env = "OIDC_SCOPE", default_value = "openid profile email")]
    pub oidc_scope: String,

    /// Cookie signing key; random per process when absent
    #[arg(long, env = "SESSION_SECRET", hide_env_values = true)]
    pub session_secret: Option<String>,

    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 86_400)]
    pub session_ttl_secs: i64,

    /// Mark cookies Secure (serve over HTTPS)
    #[arg(long, env = "COOKIE_SECURE")]
    pub cookie_secure: bool,

    /// Africa's Talking username. Without it, notifications are only logged
    #[arg(long, env = "SMS_USERNAME")]
    pub sms_username: Option<String>,

    #[arg(long, env = "SMS_API_KEY", hide_env_values = true)]
    pub sms_api_key: Option<String>,

    #[arg(long, env = "SMS_SENDER_ID")]
    pub sms_sender_id: Option<String>,

    #[arg(long, env = "SMS_ENDPOINT", default_value = DEFAULT_SMS_ENDPOINT)]
    pub sms_endpoint: String,

    #[arg(long, env = "SMS_TIMEOUT_MS", default_value_t = 5_000)]
    pub sms_timeout_ms: u64,

    #[arg(long, env = "SMS_FAILURE_THRESHOLD", default_value_t = 5)]
    pub sms_failure_threshold: u32,

    #[arg(long, env = "SMS_RESET_TIMEOUT_SECS", default_value_t = 30)]
    pub sms_reset_timeout_secs: u64,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.auth_disabled {
            if self.oidc_domain.is_none() {
                return Err(ConfigError::MissingOidc("OIDC_DOMAIN"));
            }
            if self.oidc_client_id.is_none() {
                return Err(ConfigError::MissingOidc("OIDC_CLIENT_ID"));
            }
            if self.oidc_client_secret.is_none() {
                return Err(ConfigError::MissingOidc("OIDC_CLIENT_SECRET"));
            }
        }

        if let Some(secret) = &self.session_secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(ConfigError::WeakSessionSecret(secret.len()));
            }
        }

        if self.sms_username.is_some() && self.sms_api_key.is_none() {
            return Err(ConfigError::MissingSmsApiKey);
        }

        Ok(())
    }

    /// Signing key from SESSION_SECRET, or a fresh one. Sessions signed with a
    /// generated key do not survive a restart.
    pub fn session_key(&self) -> Key {
        match &self.session_secret {
            Some(secret) if secret.len() >= MIN_SECRET_LEN => Key::from(secret.as_bytes()),
            _ => {
                tracing::warn!("⚠️ SESSION_SECRET not set, sessions will not survive a restart");
                Key::generate()
            }
        }
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs)
    }

    /// None when auth is disabled or the provider is not fully configured
    pub fn oidc(&self) -> Option<OidcConfig> {
        if self.auth_disabled {
            return None;
        }

        Some(OidcConfig {
            domain: self.oidc_domain.clone()?,
            client_id: self.oidc_client_id.clone()?,
            client_secret: self.oidc_client_secret.clone()?,
            redirect_url: self.oidc_redirect_url.clone(),
            post_logout_url: self.oidc_post_logout_url.clone(),
            scope: self.oidc_scope.clone(),
            timeout: Duration::from_secs(10),
        })
    }

    /// None selects the log-only gateway
    pub fn sms(&self) -> Option<AfricasTalkingConfig> {
        Some(AfricasTalkingConfig {
            endpoint: self.sms_endpoint.clone(),
            username: self.sms_username.clone()?,
            api_key: self.sms_api_key.clone()?,
            sender_id: self.sms_sender_id.clone(),
            timeout: self.sms_timeout(),
        })
    }

    pub fn sms_timeout(&self) -> Duration {
        Duration::from_millis(self.sms_timeout_ms)
    }

    pub fn circuit_breaker(&self) -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            failure_threshold: self.sms_failure_threshold,
            reset_timeout: Duration::from_secs(self.sms_reset_timeout_secs),
            ..CircuitBreakerConfig::default()
        }
    }
}

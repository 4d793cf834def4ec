use actix_web::{middleware, web, App, HttpServer};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod auth;
mod config;
mod domain;
mod error;
mod health;
mod http;
mod messaging;
mod metrics;
mod models;
mod store;
mod utils;

use auth::{IdentityProvider, OidcProvider, SessionManager};
use config::AppConfig;
use domain::customer::CustomerCommandHandler;
use domain::order::OrderCommandHandler;
use http::AppState;
use messaging::{AfricasTalkingGateway, LogOnlyGateway, NotificationGateway, Notifier};
use store::{MemoryStore, PgStore, SharedStore};
use utils::CircuitBreaker;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Default to INFO level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,orders_api=debug"))
        )
        .init();

    let config = AppConfig::parse();
    config.validate()?;

    tracing::info!("🚀 Starting {}", http::SERVICE_NAME);

    // === 1. Store ===
    let store: SharedStore = match &config.database_url {
        Some(url) => {
            tracing::info!("Connecting to Postgres...");
            let pg = PgStore::connect(url, config.database_max_connections).await?;
            pg.migrate().await?;
            tracing::info!("✅ Postgres ready, migrations applied");
            Arc::new(pg)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    // === 2. Metrics ===
    let metrics = Arc::new(metrics::Metrics::new()?);
    tracing::info!("📊 Metrics registry created with {} metrics", metrics.registry().gather().len());

    // === 3. SMS gateway (behind a circuit breaker) ===
    let gateway: Arc<dyn NotificationGateway> = match config.sms() {
        Some(sms) => {
            let hook_metrics = metrics.clone();
            let breaker = CircuitBreaker::new(config.circuit_breaker()).with_transition_hook(move |from, to| {
                hook_metrics.record_circuit_breaker_transition(from.as_str(), to.as_str(), to.as_gauge());
            });
            tracing::info!(endpoint = %sms.endpoint, "📨 SMS notifications via Africa's Talking");
            Arc::new(AfricasTalkingGateway::new(sms, breaker))
        }
        None => {
            tracing::warn!("SMS_USERNAME not set, notifications will only be logged");
            Arc::new(LogOnlyGateway)
        }
    };
    let notifier = Notifier::new(gateway, config.sms_timeout(), metrics.clone());

    // === 4. Login ===
    let identity: Option<Arc<dyn IdentityProvider>> = match config.oidc() {
        Some(oidc) => {
            tracing::info!(domain = %oidc.domain, "🔐 Login via identity provider");
            Some(Arc::new(OidcProvider::new(oidc)))
        }
        None => {
            tracing::warn!("AUTH_DISABLED set, write endpoints are open");
            None
        }
    };
    let sessions = SessionManager::new(
        config.session_key(),
        config.session_ttl(),
        !config.auth_disabled,
        config.cookie_secure,
    );

    let state = web::Data::new(AppState {
        customers: CustomerCommandHandler::new(store.clone(), metrics.clone()),
        orders: OrderCommandHandler::new(store.clone(), notifier.clone(), metrics.clone()),
        sessions,
        identity,
        store,
        notifier,
        metrics,
    });

    // === 5. HTTP server ===
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(http::configure)
            .configure(metrics::configure)
    })
    .bind(&config.bind_addr)?;

    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    tracing::info!("🌐 Listening on http://{}", config.bind_addr);
    server.run().await?;

    tracing::info!("👋 Shutdown complete");
    Ok(())
}

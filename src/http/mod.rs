// ============================================================================
// HTTP Surface
// ============================================================================
//
// Thin actix-web layer: extract, call the domain handler, map the result.
//
// - customers - POST/GET /customers
// - orders    - POST/GET /orders
// - auth      - /login, /callback, /logout
// - home      - GET /
//
// Health and metrics routes live in crate::metrics.
//
// ============================================================================

mod auth;
mod customers;
mod home;
mod orders;

use actix_web::web;
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{IdentityProvider, SessionManager};
use crate::domain::customer::CustomerCommandHandler;
use crate::domain::order::OrderCommandHandler;
use crate::error::ApiError;
use crate::messaging::Notifier;
use crate::metrics::Metrics;
use crate::store::SharedStore;

pub const SERVICE_NAME: &str = "orders-api";

/// Shared by every worker; one instance per process
pub struct AppState {
    pub customers: CustomerCommandHandler,
    pub orders: OrderCommandHandler,
    pub sessions: SessionManager,
    pub identity: Option<Arc<dyn IdentityProvider>>,
    pub store: SharedStore,
    pub notifier: Notifier,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    fn identity(&self) -> Result<&dyn IdentityProvider, ApiError> {
        self.identity
            .as_deref()
            .ok_or_else(|| ApiError::NotFound("Login is not configured".to_string()))
    }
}

/// Body of every successful create
#[derive(Serialize)]
struct Created {
    message: &'static str,
    id: i64,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    let json = web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::Validation(format!("Invalid JSON body: {}", err)).into()
    });

    cfg.app_data(json)
        .route("/", web::get().to(home::index))
        .service(
            web::resource("/customers")
                .route(web::get().to(customers::list))
                .route(web::post().to(customers::create)),
        )
        .service(
            web::resource("/orders")
                .route(web::get().to(orders::list))
                .route(web::post().to(orders::create)),
        )
        .route("/login", web::get().to(auth::login))
        .service(
            web::resource("/callback")
                .route(web::get().to(auth::callback_query))
                .route(web::post().to(auth::callback_form)),
        )
        .route("/logout", web::get().to(auth::logout));
}

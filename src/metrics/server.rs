use actix_web::{web, HttpResponse, Responder};
use prometheus::{Encoder, TextEncoder};

use crate::health::{self, SystemHealth};
use crate::http::{AppState, SERVICE_NAME};

/// Mounts /metrics and /health on the main server
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/metrics", web::get().to(metrics_handler))
        .route("/health", web::get().to(health_handler));
}

async fn metrics_handler(state: web::Data<AppState>) -> impl Responder {
    let encoder = TextEncoder::new();
    let metric_families = state.metrics.registry().gather();

    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(encoder.format_type())
        .body(buffer)
}

async fn health_handler(state: web::Data<AppState>) -> impl Responder {
    let system = SystemHealth {
        components: vec![
            health::check_store(&*state.store).await,
            state.notifier.health().await,
        ],
    };

    let body = system.to_json(SERVICE_NAME);
    if system.overall().is_unhealthy() {
        tracing::warn!(status = %body["status"], "Health check failed");
        HttpResponse::ServiceUnavailable().json(body)
    } else {
        HttpResponse::Ok().json(body)
    }
}

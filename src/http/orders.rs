use actix_web::{web, HttpResponse};

use super::{AppState, Created};
use crate::auth::AuthContext;
use crate::domain::order::OrderPayload;
use crate::error::ApiError;

/// Responds 201 once the order is committed, whatever the SMS outcome
#[tracing::instrument(skip_all, fields(user = %auth.subject))]
pub async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<OrderPayload>,
) -> Result<HttpResponse, ApiError> {
    let placed = state.orders.place_order(body.into_inner()).await?;
    tracing::debug!(
        order_id = placed.order.id,
        notified = placed.notification.is_ok(),
        "Order request complete"
    );

    Ok(HttpResponse::Created().json(Created {
        message: "Order added successfully",
        id: placed.order.id,
    }))
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let orders = state.orders.list().await?;
    Ok(HttpResponse::Ok().json(orders))
}

use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;

use super::{AppState, SERVICE_NAME};

pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let user = state.sessions.current(&req).map(|s| s.subject);

    HttpResponse::Ok().json(json!({
        "message": format!("Welcome to {}", SERVICE_NAME),
        "user": user,
        "login": "/login",
        "logout": "/logout",
    }))
}

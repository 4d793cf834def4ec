use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use super::AppState;
use crate::auth::{AuthError, SESSION_COOKIE, STATE_COOKIE};
use crate::error::ApiError;

/// What the provider sends back, as query string (GET) or form (POST)
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

pub async fn login(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let provider = state.identity()?;
    let csrf = Uuid::new_v4().to_string();
    let cookie = state.sessions.issue_state(&csrf)?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, provider.authorize_url(&csrf)))
        .cookie(cookie)
        .finish())
}

pub async fn callback_query(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Query<CallbackParams>,
) -> Result<HttpResponse, ApiError> {
    complete_login(&req, &state, params.into_inner()).await
}

pub async fn callback_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    params: web::Form<CallbackParams>,
) -> Result<HttpResponse, ApiError> {
    complete_login(&req, &state, params.into_inner()).await
}

async fn complete_login(
    req: &HttpRequest,
    state: &AppState,
    params: CallbackParams,
) -> Result<HttpResponse, ApiError> {
    let provider = state.identity()?;

    if let Some(error) = params.error {
        tracing::warn!(error = %error, "Identity provider returned an error to the callback");
        return Err(AuthError::Denied(params.error_description.unwrap_or(error)).into());
    }

    let expected = req
        .cookie(STATE_COOKIE)
        .and_then(|c| state.sessions.verified_value(c, STATE_COOKIE));
    match (expected, params.state) {
        (Some(expected), Some(received)) if expected == received => {}
        _ => return Err(AuthError::StateMismatch.into()),
    }

    let code = params
        .code
        .ok_or_else(|| ApiError::Validation("Missing authorization code".to_string()))?;

    let identity = provider.exchange_code(&code).await?;
    let session = state.sessions.issue_session(&identity.sub)?;

    tracing::info!(subject = %identity.sub, "🔐 User logged in");

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(session)
        .cookie(state.sessions.removal(STATE_COOKIE))
        .finish())
}

pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(session) = state.sessions.current(&req) {
        tracing::info!(subject = %session.subject, "User logged out");
    }

    let target = state
        .identity
        .as_ref()
        .map(|p| p.logout_url())
        .unwrap_or_else(|| "/".to_string());

    HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .cookie(state.sessions.removal(SESSION_COOKIE))
        .finish()
}

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

use crate::auth::AuthError;
use crate::domain::customer::CustomerError;
use crate::domain::order::OrderError;
use crate::store::StoreError;

// ============================================================================
// HTTP Error Mapping
// ============================================================================
//
// Every failure leaves the API as `{"error": "..."}`. Store details are
// logged where they happen and replaced with a generic message here.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::MissingFields | OrderError::EmptyItem | OrderError::NegativeAmount(_) => {
                ApiError::Validation(err.to_string())
            }
            OrderError::CustomerNotFound(_) => ApiError::NotFound(err.to_string()),
            OrderError::Persistence(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::MissingFields => ApiError::Validation(err.to_string()),
            CustomerError::Persistence(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "Store read failed");
        ApiError::Internal("Could not read from store".to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::StateMismatch => ApiError::Validation(err.to_string()),
            AuthError::Denied(_) => ApiError::Unauthorized(err.to_string()),
            AuthError::Provider(_) => {
                tracing::error!(error = %err, "Identity provider failure");
                ApiError::BadGateway("Identity provider unavailable".to_string())
            }
            AuthError::Session => ApiError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_error_body_shape() {
        let response = ApiError::NotFound("Customer not found".to_string()).error_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "error": "Customer not found" }));
    }

    #[test]
    fn test_order_error_mapping() {
        assert_eq!(
            ApiError::from(OrderError::MissingFields).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(OrderError::CustomerNotFound(3)).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(OrderError::Persistence(StoreError::UniqueViolation("x".into()))).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_persistence_detail_is_not_leaked() {
        let err = ApiError::from(CustomerError::Persistence(StoreError::UniqueViolation(
            "customers_code_key".into(),
        )));
        assert_eq!(err.to_string(), "Could not save customer");
    }
}

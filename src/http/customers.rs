use actix_web::{web, HttpResponse};

use super::{AppState, Created};
use crate::auth::AuthContext;
use crate::domain::customer::CustomerPayload;
use crate::error::ApiError;

#[tracing::instrument(skip_all, fields(user = %auth.subject))]
pub async fn create(
    state: web::Data<AppState>,
    auth: AuthContext,
    body: web::Json<CustomerPayload>,
) -> Result<HttpResponse, ApiError> {
    let customer = state.customers.register(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(Created {
        message: "Customer added successfully",
        id: customer.id,
    }))
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let customers = state.customers.list().await?;
    Ok(HttpResponse::Ok().json(customers))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::http::testing::test_app;
    use crate::messaging::testing::RecordingGateway;
    use crate::store::Store;

    fn john() -> Value {
        json!({ "name": "John Doe", "code": "JD123", "number": "+254100716916" })
    }

    #[actix_web::test]
    async fn test_created_customer_is_listed() {
        let t = test_app(RecordingGateway::default(), false);
        let app = test::init_service(App::new().app_data(t.state.clone()).configure(crate::http::configure)).await;

        let req = test::TestRequest::post().uri("/customers").set_json(john()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "message": "Customer added successfully", "id": 1 }));

        let req = test::TestRequest::get().uri("/customers").to_request();
        let listed: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            listed,
            json!([{ "id": 1, "name": "John Doe", "code": "JD123", "number": "+254100716916" }])
        );
    }

    #[actix_web::test]
    async fn test_missing_number_is_bad_request() {
        let t = test_app(RecordingGateway::default(), false);
        let app = test::init_service(App::new().app_data(t.state.clone()).configure(crate::http::configure)).await;

        let req = test::TestRequest::post()
            .uri("/customers")
            .set_json(json!({ "name": "John Doe", "code": "JD123" }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Name, code, and number are required");
        assert!(t.store.list_customers().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_duplicate_code_is_server_error() {
        let t = test_app(RecordingGateway::default(), false);
        let app = test::init_service(App::new().app_data(t.state.clone()).configure(crate::http::configure)).await;

        for expected in [StatusCode::CREATED, StatusCode::INTERNAL_SERVER_ERROR] {
            let req = test::TestRequest::post().uri("/customers").set_json(john()).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        assert_eq!(t.store.list_customers().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_bad_request() {
        let t = test_app(RecordingGateway::default(), false);
        let app = test::init_service(App::new().app_data(t.state.clone()).configure(crate::http::configure)).await;

        let req = test::TestRequest::post()
            .uri("/customers")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));
    }
}

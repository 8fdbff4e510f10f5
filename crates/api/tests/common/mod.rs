#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use gigbridge_api::config::{ServerConfig, StorageBackend};
use gigbridge_api::peer::{ContractPeer, StoreContractPeer};
use gigbridge_api::router::build_app_router;
use gigbridge_api::state::AppState;
use gigbridge_db::{AgreementStore, MemoryAgreementStore};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        storage: StorageBackend::Memory,
        database_url: None,
        db_max_connections: 1,
        contract_service: None,
    }
}

/// Full application router over a fresh in-memory store, with contracts
/// created in the same store.
///
/// The returned router is cheap to clone; clones share the store.
pub fn build_test_app() -> Router {
    let store: Arc<dyn AgreementStore> = Arc::new(MemoryAgreementStore::new());
    let peer: Arc<dyn ContractPeer> = Arc::new(StoreContractPeer::new(Arc::clone(&store)));
    build_test_app_with(store, peer)
}

pub fn build_test_app_with(store: Arc<dyn AgreementStore>, peer: Arc<dyn ContractPeer>) -> Router {
    build_app_router(AppState::new(test_config(), store, peer))
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: Router, uri: &str) -> Response {
    send(app, Method::POST, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

/// `data` of a 200 response.
pub async fn ok_data(response: Response) -> Value {
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

/// Create a company request with the given terms and return its JSON.
pub async fn create_company_request(
    app: &Router,
    company_id: &str,
    hours_per_week: i32,
    total_hours: i32,
    rate_per_hour: f64,
) -> Value {
    let body = serde_json::json!({
        "companyId": company_id,
        "hoursPerWeek": hours_per_week,
        "totalHours": total_hours,
        "ratePerHour": rate_per_hour,
        "requirements": ["rust"],
    });
    let response = post_json(app.clone(), "/api/v1/company-requests", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Create a student request with the given terms and return its JSON.
pub async fn create_student_request(
    app: &Router,
    student_id: &str,
    hours_per_week: i32,
    total_hours: i32,
    rate_per_hour: f64,
    expertise: &[&str],
) -> Value {
    let body = serde_json::json!({
        "studentId": student_id,
        "hoursPerWeek": hours_per_week,
        "totalHours": total_hours,
        "ratePerHour": rate_per_hour,
        "expertise": expertise,
    });
    let response = post_json(app.clone(), "/api/v1/student-requests", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Drive a student request through to a contract and return the contract.
pub async fn contract_between(app: &Router, student_id: &str, company_id: &str) -> Value {
    let request = create_student_request(app, student_id, 10, 200, 25.0, &["rust"]).await;
    let service_id = request["serviceId"].as_i64().expect("serviceId");

    let accepted = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/student-requests/{service_id}/accept/{company_id}"),
        )
        .await,
    )
    .await;
    assert_eq!(accepted["companyId"], company_id);

    let converted = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/student-requests/{service_id}/accept-own/{student_id}"),
        )
        .await,
    )
    .await;
    converted["contract"].clone()
}

//! One instance acting as the contract service of another over HTTP.

mod common;

use std::sync::Arc;
use std::time::Duration;

use gigbridge_api::peer::HttpContractPeer;
use gigbridge_db::{AgreementStore, MemoryAgreementStore};
use serde_json::json;

use common::{create_company_request, get, ok_data, post};

/// Serve a co-located app on an ephemeral port and return its base URL.
async fn spawn_contract_service() -> (String, axum::Router) {
    let app = common::build_test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().unwrap();
    let served = app.clone();
    tokio::spawn(async move {
        axum::serve(listener, served).await.unwrap();
    });
    (format!("http://{addr}"), app)
}

#[tokio::test]
async fn owner_acceptance_creates_the_contract_remotely() {
    let (base_url, contracts_app) = spawn_contract_service().await;

    let store: Arc<dyn AgreementStore> = Arc::new(MemoryAgreementStore::new());
    let peer = HttpContractPeer::new(&base_url, Duration::from_secs(5), 0).unwrap();
    let app = common::build_test_app_with(store, Arc::new(peer));

    let request = create_company_request(&app, "c1", 10, 200, 25.0).await;
    let id = request["serviceId"].as_i64().unwrap();
    post(app.clone(), &format!("/api/v1/company-requests/{id}/candidates/s1")).await;

    let accepted = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/company-requests/{id}/accept-own/c1/s1"),
        )
        .await,
    )
    .await;
    assert_eq!(accepted["contract"]["studentId"], "s1");

    // The contract lives on the remote side only.
    let remote = ok_data(get(contracts_app, "/api/v1/contracts").await).await;
    assert_eq!(remote.as_array().unwrap().len(), 1);
    let local = ok_data(get(app, "/api/v1/contracts").await).await;
    assert_eq!(local, json!([]));
}

#[tokio::test]
async fn unreachable_contract_service_keeps_the_request_open() {
    let store: Arc<dyn AgreementStore> = Arc::new(MemoryAgreementStore::new());
    let peer = HttpContractPeer::new("http://127.0.0.1:9", Duration::from_secs(1), 0).unwrap();
    let app = common::build_test_app_with(store, Arc::new(peer));

    let request = create_company_request(&app, "c1", 10, 200, 25.0).await;
    let id = request["serviceId"].as_i64().unwrap();
    post(app.clone(), &format!("/api/v1/company-requests/{id}/candidates/s1")).await;

    let response = post(
        app.clone(),
        &format!("/api/v1/company-requests/{id}/accept-own/c1/s1"),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::BAD_GATEWAY);

    let still_open = ok_data(get(app, &format!("/api/v1/company-requests/{id}")).await).await;
    assert_eq!(still_open["isAcceptedByCompany"], false);
}

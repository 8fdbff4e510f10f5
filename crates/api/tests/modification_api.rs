//! HTTP-level integration tests for the contract modification protocol.

mod common;

use axum::http::StatusCode;
use common::{body_json, contract_between, get, ok_data, post, post_json};
use serde_json::{json, Value};

async fn propose(app: &axum::Router, body: Value) -> Value {
    ok_data(post_json(app.clone(), "/api/v1/modifications", body).await).await
}

#[tokio::test]
async fn extension_applies_once_the_counterpart_accepts() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let contract_id = contract["contractId"].as_i64().unwrap();

    let proposal = propose(
        &app,
        json!({
            "modificationType": "EXTENSION",
            "contractId": contract_id,
            "proposedBy": "student",
            "totalHours": 240,
        }),
    )
    .await;
    let modification_id = proposal["modificationId"].as_i64().unwrap();
    assert_eq!(proposal["acceptedByStudent"], true);
    assert_eq!(proposal["acceptedByCompany"], false);
    assert_eq!(proposal["finished"], false);
    assert_eq!(proposal["hoursPerWeek"], 10);
    assert_eq!(proposal["totalHours"], 240);

    // The company sees it as awaiting, the student does not.
    let awaiting = ok_data(get(app.clone(), "/api/v1/companies/c1/modifications").await).await;
    assert_eq!(awaiting.as_array().unwrap().len(), 1);
    let awaiting = ok_data(get(app.clone(), "/api/v1/students/s1/modifications").await).await;
    assert_eq!(awaiting, json!([]));

    let resolution = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/companies/c1/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert_eq!(resolution["outcome"], "applied");
    assert_eq!(resolution["contract"]["totalHours"], 240);
    assert_eq!(resolution["contract"]["terminated"], false);

    let finished = ok_data(
        get(app.clone(), &format!("/api/v1/modifications/{modification_id}")).await,
    )
    .await;
    assert_eq!(finished["finished"], true);

    // A finished proposal is inert.
    let again = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/companies/c1/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert!(again.is_null());

    let history = ok_data(get(app, "/api/v1/students/s1/modifications/all").await).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn the_proposer_accepting_again_leaves_the_proposal_awaiting() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let proposal = propose(
        &app,
        json!({
            "modificationType": "MODIFICATION",
            "contractId": contract["contractId"],
            "proposedBy": "company",
            "hoursPerWeek": 8,
            "totalHours": 160,
            "pricePerHour": 30.0,
        }),
    )
    .await;
    let modification_id = proposal["modificationId"].as_i64().unwrap();

    let resolution = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/companies/c1/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert_eq!(resolution["outcome"], "awaiting");
    assert_eq!(resolution["modification"]["finished"], false);

    let resolution = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/students/s1/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert_eq!(resolution["outcome"], "applied");
    assert_eq!(resolution["contract"]["hoursPerWeek"], 8);
    assert_eq!(resolution["contract"]["totalHours"], 160);
    assert_eq!(resolution["contract"]["pricePerHour"], 30.0);
}

#[tokio::test]
async fn decline_finishes_without_touching_the_contract() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let contract_id = contract["contractId"].as_i64().unwrap();
    let proposal = propose(
        &app,
        json!({
            "modificationType": "TERMINATION",
            "contractId": contract_id,
            "proposedBy": "company",
        }),
    )
    .await;
    let modification_id = proposal["modificationId"].as_i64().unwrap();

    let resolution = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/students/s1/modifications/{modification_id}/decline"),
        )
        .await,
    )
    .await;
    assert_eq!(resolution["outcome"], "declined");
    assert_eq!(resolution["modification"]["finished"], true);

    let unchanged = ok_data(get(app, &format!("/api/v1/contracts/{contract_id}")).await).await;
    assert_eq!(unchanged["terminated"], false);
    assert_eq!(unchanged["totalHours"], 200);
}

#[tokio::test]
async fn termination_blocks_further_proposals() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let contract_id = contract["contractId"].as_i64().unwrap();
    let proposal = propose(
        &app,
        json!({
            "modificationType": "TERMINATION",
            "contractId": contract_id,
            "proposedBy": "student",
        }),
    )
    .await;
    let modification_id = proposal["modificationId"].as_i64().unwrap();

    let resolution = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/companies/c1/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert_eq!(resolution["outcome"], "applied");
    assert_eq!(resolution["contract"]["terminated"], true);
    assert_eq!(resolution["contract"]["totalHours"], 200);

    let refused = propose(
        &app,
        json!({
            "modificationType": "EXTENSION",
            "contractId": contract_id,
            "proposedBy": "student",
            "totalHours": 220,
        }),
    )
    .await;
    assert!(refused.is_null());
}

#[tokio::test]
async fn invalid_proposals_persist_nothing() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let contract_id = contract["contractId"].as_i64().unwrap();

    // Unknown contract.
    let refused = propose(
        &app,
        json!({
            "modificationType": "EXTENSION",
            "contractId": 999,
            "proposedBy": "student",
            "totalHours": 220,
        }),
    )
    .await;
    assert!(refused.is_null());

    // Extension without a new total.
    let refused = propose(
        &app,
        json!({
            "modificationType": "EXTENSION",
            "contractId": contract_id,
            "proposedBy": "student",
        }),
    )
    .await;
    assert!(refused.is_null());

    // 400 hours at 10 per week is 40 weeks.
    let refused = propose(
        &app,
        json!({
            "modificationType": "EXTENSION",
            "contractId": contract_id,
            "proposedBy": "student",
            "totalHours": 400,
        }),
    )
    .await;
    assert!(refused.is_null());

    let history = ok_data(get(app, "/api/v1/companies/c1/modifications/all").await).await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn unknown_modification_type_is_a_bad_request() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;

    let response = post_json(
        app,
        "/api/v1/modifications",
        json!({
            "modificationType": "PAUSE",
            "contractId": contract["contractId"],
            "proposedBy": "student",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn a_stranger_cannot_respond() {
    let app = common::build_test_app();
    let contract = contract_between(&app, "s1", "c1").await;
    let proposal = propose(
        &app,
        json!({
            "modificationType": "TERMINATION",
            "contractId": contract["contractId"],
            "proposedBy": "student",
        }),
    )
    .await;
    let modification_id = proposal["modificationId"].as_i64().unwrap();

    let refused = ok_data(
        post(
            app.clone(),
            &format!("/api/v1/companies/c2/modifications/{modification_id}/accept"),
        )
        .await,
    )
    .await;
    assert!(refused.is_null());

    let still_open = ok_data(
        get(app, &format!("/api/v1/modifications/{modification_id}")).await,
    )
    .await;
    assert_eq!(still_open["finished"], false);
    assert_eq!(still_open["acceptedByCompany"], false);
}

#[tokio::test]
async fn unknown_modification_returns_404_on_lookup_and_null_on_response() {
    let app = common::build_test_app();

    let response = get(app.clone(), "/api/v1/modifications/42").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let none = ok_data(post(app, "/api/v1/students/s1/modifications/42/accept").await).await;
    assert!(none.is_null());
}

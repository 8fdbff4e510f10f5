//! Integration tests for the PostgreSQL store.
//!
//! These need a reachable database via `DATABASE_URL`; run them with
//! `cargo test -p gigbridge-db -- --ignored`.

use gigbridge_core::matching::{FilterField, FilterRange};
use gigbridge_core::modification::{Consent, ModificationType};
use gigbridge_core::party::Party;
use gigbridge_core::terms::{TermsChange, WorkTerms};
use gigbridge_db::models::amendment::CreateCompanyRequestModification;
use gigbridge_db::models::contract::CreateContract;
use gigbridge_db::models::modification::CreateContractModification;
use gigbridge_db::models::request::{CreateCompanyRequest, CreateStudentRequest};
use gigbridge_db::{AgreementStore, PgAgreementStore};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_company_request(company_id: &str, total_hours: i32) -> CreateCompanyRequest {
    CreateCompanyRequest {
        company_id: company_id.to_string(),
        hours_per_week: 10,
        total_hours,
        rate_per_hour: 25.0,
        requirements: vec!["rust".into()],
        target_student_id: None,
    }
}

fn new_student_request(student_id: &str, expertise: &[&str]) -> CreateStudentRequest {
    CreateStudentRequest {
        student_id: student_id.to_string(),
        hours_per_week: 10,
        total_hours: 200,
        rate_per_hour: 25.0,
        expertise: expertise.iter().map(|s| s.to_string()).collect(),
    }
}

fn new_contract() -> CreateContract {
    CreateContract::new(WorkTerms::new(10, 200, 25.0), "s1".into(), "c1".into())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn request_kinds_share_the_service_id_sequence(pool: PgPool) {
    let store = PgAgreementStore::new(pool);

    let company = store
        .create_company_request(&new_company_request("c1", 200))
        .await
        .unwrap();
    let student = store
        .create_student_request(&new_student_request("s1", &["rust"]))
        .await
        .unwrap();

    assert_eq!(student.service_id, company.service_id + 1);
    assert!(store.find_student_request(company.service_id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn stale_request_update_is_rejected(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let created = store
        .create_company_request(&new_company_request("c1", 200))
        .await
        .unwrap();

    let mut first = created.clone();
    first.student_id_candidates.push("s1".into());
    let written = store.update_company_request(&first).await.unwrap().unwrap();
    assert_eq!(written.version, created.version + 1);

    let mut stale = created;
    stale.student_id_candidates.push("s2".into());
    assert!(store.update_company_request(&stale).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn filter_and_search(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    store.create_company_request(&new_company_request("c1", 200)).await.unwrap();
    store.create_company_request(&new_company_request("c1", 400)).await.unwrap();
    store.create_student_request(&new_student_request("s1", &["rust", "sql"])).await.unwrap();
    store.create_student_request(&new_student_request("s2", &["design"])).await.unwrap();

    let range = FilterRange::new(150.0, 250.0).unwrap();
    let matched = store
        .filter_company_requests(FilterField::TotalHours, range)
        .await
        .unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].total_hours, 200);

    let found = store.search_student_requests("sql").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].student_id, "s1");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn delete_by_company_returns_the_removed_rows(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    store.create_company_request(&new_company_request("c1", 200)).await.unwrap();
    store.create_company_request(&new_company_request("c2", 200)).await.unwrap();

    let deleted = store.delete_company_requests_by_company("c1").await.unwrap();
    assert_eq!(deleted.len(), 1);
    assert_eq!(store.list_company_requests().await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Contracts and modifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn terminated_contract_is_never_rewritten(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let mut contract = store.create_contract(&new_contract()).await.unwrap();

    contract.terminated = true;
    let terminated = store.update_contract(&contract).await.unwrap().unwrap();
    assert!(terminated.terminated);

    let mut revived = terminated.clone();
    revived.terminated = false;
    revived.total_hours = 100;
    assert!(store.update_contract(&revived).await.unwrap().is_none());
    let stored = store.find_contract(contract.contract_id).await.unwrap().unwrap();
    assert_eq!(stored.total_hours, 200);
    assert!(stored.terminated);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn request_converts_into_exactly_one_contract(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let request = store
        .create_student_request(&new_student_request("s1", &["rust"]))
        .await
        .unwrap();
    let id = request.service_id;

    // The remote-style insert happened first; the request is still here.
    let first = store.create_contract(&new_contract().for_request(id)).await.unwrap();
    assert!(store.find_student_request(id).await.unwrap().is_some());

    let converted = store.create_contract_for_request(id, &new_contract()).await.unwrap();
    assert_eq!(converted.contract_id, first.contract_id);
    assert_eq!(converted.source_service_id, Some(id));
    assert!(store.find_student_request(id).await.unwrap().is_none());
    assert_eq!(store.list_contracts().await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn finish_and_apply_rolls_back_on_a_stale_contract(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let contract = store.create_contract(&new_contract()).await.unwrap();
    let proposal = store
        .create_modification(&CreateContractModification {
            contract_id: contract.contract_id,
            modification_type: ModificationType::Extension,
            student_id: "s1".into(),
            company_id: "c1".into(),
            terms: WorkTerms::new(10, 240, 25.0),
            consent: Consent::proposed_by(Party::Student),
        })
        .await
        .unwrap();

    let mut repriced = contract.clone();
    repriced.price_per_hour = 30.0;
    store.update_contract(&repriced).await.unwrap().unwrap();

    let mut finished = proposal.clone();
    finished.accepted_by_company = true;
    finished.finished = true;
    let mut extended = contract.clone();
    extended.total_hours = 240;
    assert!(store.finish_and_apply(&finished, &extended).await.unwrap().is_none());

    let open = store.find_modification(proposal.modification_id).await.unwrap().unwrap();
    assert!(!open.finished);
    let stored = store.find_contract(contract.contract_id).await.unwrap().unwrap();
    assert_eq!((stored.total_hours, stored.price_per_hour), (200, 30.0));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn finish_and_apply_happens_once(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let contract = store.create_contract(&new_contract()).await.unwrap();
    let proposal = store
        .create_modification(&CreateContractModification {
            contract_id: contract.contract_id,
            modification_type: ModificationType::Extension,
            student_id: "s1".into(),
            company_id: "c1".into(),
            terms: WorkTerms::new(10, 240, 25.0),
            consent: Consent::proposed_by(Party::Student),
        })
        .await
        .unwrap();

    let awaiting = store
        .list_modifications_awaiting(Party::Company, "c1")
        .await
        .unwrap();
    assert_eq!(awaiting.len(), 1);

    let mut finished = proposal.clone();
    finished.accepted_by_company = true;
    finished.finished = true;
    let mut extended = contract.clone();
    extended.total_hours = 240;

    let (modification, applied) = store
        .finish_and_apply(&finished, &extended)
        .await
        .unwrap()
        .unwrap();
    assert!(modification.finished);
    assert_eq!(applied.unwrap().total_hours, 240);

    // Replaying the same write loses on the version guard.
    assert!(store.finish_and_apply(&finished, &extended).await.unwrap().is_none());
    let history = store
        .list_modifications_involving(Party::Student, "s1")
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn amendment_stores_unchanged_sentinel(pool: PgPool) {
    let store = PgAgreementStore::new(pool);
    let request = store
        .create_company_request(&new_company_request("c1", 200))
        .await
        .unwrap();

    let amendment = store
        .create_amendment(&CreateCompanyRequestModification {
            service_id: request.service_id,
            student_id: "s1".into(),
            company_id: "c1".into(),
            change: TermsChange {
                total_hours: Some(150),
                ..TermsChange::default()
            },
        })
        .await
        .unwrap();
    assert_eq!(amendment.hours_per_week, -1);
    assert_eq!(amendment.total_hours, 150);

    assert!(store.delete_amendment(amendment.modification_id).await.unwrap());
    assert!(store.list_amendments_for_company("c1").await.unwrap().is_empty());
}

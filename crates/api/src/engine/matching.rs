//! Request matching: open job requests, their candidates, and conversion
//! into a contract once both sides agree.
//!
//! A company request collects interested students as candidates; the
//! company then accepts its own request for one of them. A student request
//! is accepted by one company; the student then accepts their own request.
//! The owner's acceptance claims the request, hands a contract draft to the
//! [`ContractPeer`], and deletes the request only after the peer
//! acknowledged the contract. The draft carries the request's service id,
//! so the peer stores at most one contract per request.
//!
//! A refused draft, or a failure that certainly never reached the peer,
//! releases the claim and the request stays open. Any other failure keeps
//! the claim: the contract may exist already, and the owner's next
//! acceptance resumes the same hand-off.

use std::sync::Arc;

use gigbridge_core::matching::{self, FilterTag};
use gigbridge_core::types::DbId;
use gigbridge_db::models::contract::{Contract, CreateContract};
use gigbridge_db::models::request::{
    CompanyRequest, CreateCompanyRequest, CreateStudentRequest, Request, StudentRequest,
    UpdateCompanyRequest, UpdateStudentRequest,
};
use gigbridge_db::AgreementStore;
use serde::Serialize;

use super::{edit_company_request, edit_student_request, Edit};
use crate::error::AppResult;
use crate::peer::{ContractPeer, PeerError};

/// A consumed request together with the contract that replaced it.
///
/// `request` no longer exists in storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedRequest<R> {
    pub request: R,
    pub contract: Contract,
}

#[derive(Clone)]
pub struct RequestMatching {
    store: Arc<dyn AgreementStore>,
    peer: Arc<dyn ContractPeer>,
}

impl RequestMatching {
    pub fn new(store: Arc<dyn AgreementStore>, peer: Arc<dyn ContractPeer>) -> Self {
        Self { store, peer }
    }

    // -----------------------------------------------------------------------
    // Catalogue
    // -----------------------------------------------------------------------

    pub async fn create_company_request(
        &self,
        input: &CreateCompanyRequest,
    ) -> AppResult<CompanyRequest> {
        input.terms().ensure_positive()?;
        let request = self.store.create_company_request(input).await?;
        tracing::info!(
            service_id = request.service_id,
            company_id = %request.company_id,
            target_student_id = ?request.target_student_id,
            "Company request created"
        );
        Ok(request)
    }

    /// Create a company request addressed to a single student.
    pub async fn create_targeted_request(
        &self,
        student_id: &str,
        input: CreateCompanyRequest,
    ) -> AppResult<CompanyRequest> {
        let input = CreateCompanyRequest {
            target_student_id: Some(student_id.to_string()),
            ..input
        };
        self.create_company_request(&input).await
    }

    pub async fn create_student_request(
        &self,
        input: &CreateStudentRequest,
    ) -> AppResult<StudentRequest> {
        input.terms().ensure_positive()?;
        let request = self.store.create_student_request(input).await?;
        tracing::info!(
            service_id = request.service_id,
            student_id = %request.student_id,
            "Student request created"
        );
        Ok(request)
    }

    /// Look up a request of either kind.
    pub async fn get_request(&self, service_id: DbId) -> AppResult<Option<Request>> {
        if let Some(request) = self.store.find_company_request(service_id).await? {
            return Ok(Some(Request::Company(request)));
        }
        Ok(self
            .store
            .find_student_request(service_id)
            .await?
            .map(Request::Student))
    }

    pub async fn get_company_request(&self, service_id: DbId) -> AppResult<Option<CompanyRequest>> {
        Ok(self.store.find_company_request(service_id).await?)
    }

    pub async fn get_student_request(&self, service_id: DbId) -> AppResult<Option<StudentRequest>> {
        Ok(self.store.find_student_request(service_id).await?)
    }

    pub async fn list_company_requests(&self) -> AppResult<Vec<CompanyRequest>> {
        Ok(self.store.list_company_requests().await?)
    }

    pub async fn list_for_company(&self, company_id: &str) -> AppResult<Vec<CompanyRequest>> {
        Ok(self.store.list_company_requests_by_company(company_id).await?)
    }

    /// Company requests addressed to `student_id`.
    pub async fn list_targeting(&self, student_id: &str) -> AppResult<Vec<CompanyRequest>> {
        Ok(self.store.list_company_requests_targeting(student_id).await?)
    }

    /// Candidate student ids of a company request.
    pub async fn list_candidates(&self, service_id: DbId) -> AppResult<Option<Vec<String>>> {
        Ok(self
            .store
            .find_company_request(service_id)
            .await?
            .map(|r| r.student_id_candidates))
    }

    pub async fn list_student_requests(&self) -> AppResult<Vec<StudentRequest>> {
        Ok(self.store.list_student_requests().await?)
    }

    pub async fn list_for_student(&self, student_id: &str) -> AppResult<Vec<StudentRequest>> {
        Ok(self.store.list_student_requests_by_student(student_id).await?)
    }

    pub async fn search_expertise(&self, tag: &str) -> AppResult<Vec<StudentRequest>> {
        Ok(self.store.search_student_requests(tag).await?)
    }

    /// Range filter over company requests. An unknown field or an invalid
    /// range yields an empty result without touching storage.
    pub async fn filter_company_requests(&self, tag: &FilterTag) -> AppResult<Vec<CompanyRequest>> {
        let Some((field, range)) = tag.resolve() else {
            return Ok(Vec::new());
        };
        Ok(self.store.filter_company_requests(field, range).await?)
    }

    pub async fn filter_student_requests(&self, tag: &FilterTag) -> AppResult<Vec<StudentRequest>> {
        let Some((field, range)) = tag.resolve() else {
            return Ok(Vec::new());
        };
        Ok(self.store.filter_student_requests(field, range).await?)
    }

    /// Overwrite the fields present in `update`.
    ///
    /// `None` if the request is gone or its owner is converting it.
    pub async fn update_company_request(
        &self,
        service_id: DbId,
        update: &UpdateCompanyRequest,
    ) -> AppResult<Option<CompanyRequest>> {
        let terms = match self.store.find_company_request(service_id).await? {
            Some(current) => update.terms_change().apply(current.terms()),
            None => return Ok(None),
        };
        terms.ensure_positive()?;

        let updated = edit_company_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_company {
                return Edit::Refuse;
            }
            request.set_terms(update.terms_change().apply(request.terms()));
            if let Some(requirements) = &update.requirements {
                request.requirements = requirements.clone();
            }
            Edit::Write
        })
        .await?;
        match &updated {
            Some(_) => tracing::info!(service_id, "Company request updated"),
            None => tracing::info!(service_id, "Company request update refused"),
        }
        Ok(updated)
    }

    pub async fn update_student_request(
        &self,
        service_id: DbId,
        update: &UpdateStudentRequest,
    ) -> AppResult<Option<StudentRequest>> {
        let terms = match self.store.find_student_request(service_id).await? {
            Some(current) => update.terms_change().apply(current.terms()),
            None => return Ok(None),
        };
        terms.ensure_positive()?;

        let updated = edit_student_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_student {
                return Edit::Refuse;
            }
            request.set_terms(update.terms_change().apply(request.terms()));
            if let Some(expertise) = &update.expertise {
                request.expertise = expertise.clone();
            }
            Edit::Write
        })
        .await?;
        match &updated {
            Some(_) => tracing::info!(service_id, "Student request updated"),
            None => tracing::info!(service_id, "Student request update refused"),
        }
        Ok(updated)
    }

    pub async fn delete_company_request(&self, service_id: DbId) -> AppResult<Option<CompanyRequest>> {
        let deleted = self.store.delete_company_request(service_id).await?;
        if deleted.is_some() {
            tracing::info!(service_id, "Company request deleted");
        }
        Ok(deleted)
    }

    pub async fn delete_student_request(&self, service_id: DbId) -> AppResult<Option<StudentRequest>> {
        let deleted = self.store.delete_student_request(service_id).await?;
        if deleted.is_some() {
            tracing::info!(service_id, "Student request deleted");
        }
        Ok(deleted)
    }

    /// Delete every request a company posted, returning what was removed.
    pub async fn delete_all_for_company(&self, company_id: &str) -> AppResult<Vec<CompanyRequest>> {
        let deleted = self.store.delete_company_requests_by_company(company_id).await?;
        tracing::info!(company_id, count = deleted.len(), "Company requests deleted");
        Ok(deleted)
    }

    // -----------------------------------------------------------------------
    // Candidates and counterpart acceptance
    // -----------------------------------------------------------------------

    /// Record a student's interest in a company request.
    ///
    /// Refused for a request addressed to another student and for a request
    /// its company is already converting. Adding an existing candidate is a
    /// no-op.
    pub async fn add_candidate(
        &self,
        service_id: DbId,
        student_id: &str,
    ) -> AppResult<Option<CompanyRequest>> {
        let updated = edit_company_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_company
                || !matching::may_become_candidate(request.target_student_id.as_deref(), student_id)
            {
                return Edit::Refuse;
            }
            if matching::add_candidate(&mut request.student_id_candidates, student_id) {
                Edit::Write
            } else {
                Edit::Keep
            }
        })
        .await?;

        match &updated {
            Some(_) => tracing::info!(service_id, student_id, "Candidate added"),
            None => tracing::info!(service_id, student_id, "Candidate refused"),
        }
        Ok(updated)
    }

    /// Withdraw a student's interest. Removing a non-member is a no-op.
    pub async fn remove_candidate(
        &self,
        service_id: DbId,
        student_id: &str,
    ) -> AppResult<Option<CompanyRequest>> {
        let updated = edit_company_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_company {
                return Edit::Refuse;
            }
            if matching::remove_candidate(&mut request.student_id_candidates, student_id) {
                Edit::Write
            } else {
                Edit::Keep
            }
        })
        .await?;

        if updated.is_some() {
            tracing::info!(service_id, student_id, "Candidate removed");
        }
        Ok(updated)
    }

    /// A company accepts a student request, linking itself to it.
    ///
    /// Refused when a different company is already linked or the student is
    /// converting the request.
    pub async fn accept_student_request(
        &self,
        service_id: DbId,
        company_id: &str,
    ) -> AppResult<Option<StudentRequest>> {
        let updated = edit_student_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_student {
                return Edit::Refuse;
            }
            match request.company_id.as_deref() {
                Some(linked) if linked == company_id => Edit::Keep,
                Some(linked) if !linked.is_empty() => Edit::Refuse,
                _ => {
                    request.company_id = Some(company_id.to_string());
                    Edit::Write
                }
            }
        })
        .await?;

        match &updated {
            Some(_) => tracing::info!(service_id, company_id, "Student request accepted by company"),
            None => tracing::info!(service_id, company_id, "Company acceptance refused"),
        }
        Ok(updated)
    }

    /// Undo a counterpart's interest in a request of either kind.
    ///
    /// For a company request `party_id` is removed from the candidates; for a
    /// student request the linked company is cleared if it is `party_id`.
    pub async fn reject(&self, service_id: DbId, party_id: &str) -> AppResult<Option<Request>> {
        if self.store.find_company_request(service_id).await?.is_some() {
            return Ok(self
                .remove_candidate(service_id, party_id)
                .await?
                .map(Request::Company));
        }

        let updated = edit_student_request(self.store.as_ref(), service_id, |request| {
            if request.is_accepted_by_student {
                return Edit::Refuse;
            }
            if request.company_id.as_deref() != Some(party_id) {
                return Edit::Keep;
            }
            request.company_id = None;
            Edit::Write
        })
        .await?;

        if updated.is_some() {
            tracing::info!(service_id, party_id, "Student request reopened");
        }
        Ok(updated.map(Request::Student))
    }

    // -----------------------------------------------------------------------
    // Owner acceptance: request -> contract
    // -----------------------------------------------------------------------

    /// The company accepts its own request for one of its candidates.
    ///
    /// Repeating the call for the same student after an inconclusive
    /// hand-off resumes it.
    pub async fn accept_own_company_request(
        &self,
        company_id: &str,
        service_id: DbId,
        student_id: &str,
    ) -> AppResult<Option<AcceptedRequest<CompanyRequest>>> {
        let claimed = edit_company_request(self.store.as_ref(), service_id, |request| {
            if request.company_id != company_id
                || !request.student_id_candidates.iter().any(|c| c == student_id)
            {
                return Edit::Refuse;
            }
            if request.is_accepted_by_company {
                return match request.student_id.as_deref() {
                    Some(chosen) if chosen == student_id => Edit::Keep,
                    _ => Edit::Refuse,
                };
            }
            request.is_accepted_by_company = true;
            request.student_id = Some(student_id.to_string());
            Edit::Write
        })
        .await?;
        let Some(claimed) = claimed else {
            tracing::info!(service_id, company_id, student_id, "Owner acceptance refused");
            return Ok(None);
        };

        let draft = CreateContract::new(
            claimed.terms(),
            student_id.to_string(),
            company_id.to_string(),
        )
        .for_request(service_id);
        let contract = match self.peer.send_contract(&draft).await {
            Ok(Some(contract)) => contract,
            outcome => {
                if claim_is_released(service_id, &outcome) {
                    self.release_company_claim(service_id).await;
                }
                return Ok(outcome.map(|_| None)?);
            }
        };

        // A co-located peer has already deleted it.
        self.store.delete_company_request(service_id).await?;
        tracing::info!(
            service_id,
            contract_id = contract.contract_id,
            company_id,
            student_id,
            "Company request consumed"
        );
        Ok(Some(AcceptedRequest {
            request: claimed,
            contract,
        }))
    }

    /// The student accepts their own request after a company accepted it.
    pub async fn accept_own_student_request(
        &self,
        student_id: &str,
        service_id: DbId,
    ) -> AppResult<Option<AcceptedRequest<StudentRequest>>> {
        let claimed = edit_student_request(self.store.as_ref(), service_id, |request| {
            let has_company = request.company_id.as_deref().is_some_and(|c| !c.is_empty());
            if request.student_id != student_id || !has_company {
                return Edit::Refuse;
            }
            if request.is_accepted_by_student {
                return Edit::Keep;
            }
            request.is_accepted_by_student = true;
            Edit::Write
        })
        .await?;
        let Some(claimed) = claimed else {
            tracing::info!(service_id, student_id, "Owner acceptance refused");
            return Ok(None);
        };

        let company_id = claimed.company_id.clone().unwrap_or_default();
        let draft = CreateContract::new(claimed.terms(), student_id.to_string(), company_id)
            .for_request(service_id);
        let contract = match self.peer.send_contract(&draft).await {
            Ok(Some(contract)) => contract,
            outcome => {
                if claim_is_released(service_id, &outcome) {
                    self.release_student_claim(service_id).await;
                }
                return Ok(outcome.map(|_| None)?);
            }
        };

        self.store.delete_student_request(service_id).await?;
        tracing::info!(
            service_id,
            contract_id = contract.contract_id,
            student_id,
            company_id = %contract.company_id,
            "Student request consumed"
        );
        Ok(Some(AcceptedRequest {
            request: claimed,
            contract,
        }))
    }

    async fn release_company_claim(&self, service_id: DbId) {
        let released = edit_company_request(self.store.as_ref(), service_id, |request| {
            if !request.is_accepted_by_company {
                return Edit::Keep;
            }
            request.is_accepted_by_company = false;
            request.student_id = None;
            Edit::Write
        })
        .await;
        if let Err(e) = released {
            tracing::error!(service_id, error = %e, "Failed to release company request claim");
        }
    }

    async fn release_student_claim(&self, service_id: DbId) {
        let released = edit_student_request(self.store.as_ref(), service_id, |request| {
            if !request.is_accepted_by_student {
                return Edit::Keep;
            }
            request.is_accepted_by_student = false;
            Edit::Write
        })
        .await;
        if let Err(e) = released {
            tracing::error!(service_id, error = %e, "Failed to release student request claim");
        }
    }
}

/// Whether a hand-off that produced no contract gives up the owner's claim.
fn claim_is_released(service_id: DbId, outcome: &Result<Option<Contract>, PeerError>) -> bool {
    match outcome {
        Ok(_) => {
            tracing::warn!(service_id, "Contract peer refused the draft; request stays open");
            true
        }
        Err(e) if e.never_delivered() => {
            tracing::warn!(service_id, error = %e, "Contract hand-off not delivered; request stays open");
            true
        }
        Err(e) => {
            tracing::warn!(
                service_id,
                error = %e,
                "Contract hand-off outcome unknown; request stays claimed until the owner retries"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use assert_matches::assert_matches;
    use gigbridge_core::matching::RequestStatus;

    use super::*;
    use crate::engine::testing::{local_peer, memory_store, PeerAnswer, ScriptedPeer};
    use crate::error::AppError;

    fn matching() -> (RequestMatching, Arc<dyn AgreementStore>) {
        let store = memory_store();
        let peer = local_peer(&store);
        (RequestMatching::new(Arc::clone(&store), peer), store)
    }

    fn company_input(company_id: &str) -> CreateCompanyRequest {
        CreateCompanyRequest {
            company_id: company_id.to_string(),
            hours_per_week: 10,
            total_hours: 200,
            rate_per_hour: 22.5,
            requirements: vec!["rust".into()],
            target_student_id: None,
        }
    }

    fn student_input(student_id: &str) -> CreateStudentRequest {
        CreateStudentRequest {
            student_id: student_id.to_string(),
            hours_per_week: 15,
            total_hours: 300,
            rate_per_hour: 18.0,
            expertise: vec!["sql".into(), "rust".into()],
        }
    }

    #[tokio::test]
    async fn non_positive_terms_are_rejected() {
        let (matching, _) = matching();
        let input = CreateCompanyRequest {
            hours_per_week: 0,
            ..company_input("c1")
        };
        let err = matching.create_company_request(&input).await.unwrap_err();
        assert_matches!(err, AppError::Core(gigbridge_core::error::CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn candidate_set_moves_request_between_open_and_pending() {
        let (matching, _) = matching();
        let request = matching.create_company_request(&company_input("c1")).await.unwrap();
        assert_eq!(request.status(), RequestStatus::Open);

        let id = request.service_id;
        let pending = matching.add_candidate(id, "s1").await.unwrap().unwrap();
        assert_eq!(pending.status(), RequestStatus::PendingOwnerAccept);

        let again = matching.add_candidate(id, "s1").await.unwrap().unwrap();
        assert_eq!(again.student_id_candidates, vec!["s1".to_string()]);
        assert_eq!(again.version, pending.version);

        let untouched = matching.remove_candidate(id, "nobody").await.unwrap().unwrap();
        assert_eq!(untouched.version, pending.version);

        let reopened = matching.reject(id, "s1").await.unwrap().unwrap();
        assert_eq!(reopened.status(), RequestStatus::Open);
    }

    #[tokio::test]
    async fn targeted_request_admits_only_its_target() {
        let (matching, _) = matching();
        let request = matching
            .create_targeted_request("s1", company_input("c1"))
            .await
            .unwrap();
        let id = request.service_id;

        assert!(matching.add_candidate(id, "s2").await.unwrap().is_none());
        assert!(matching.add_candidate(id, "s1").await.unwrap().is_some());
        assert_eq!(matching.list_targeting("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn company_owner_accept_replaces_request_with_contract() {
        let (matching, store) = matching();
        let request = matching.create_company_request(&company_input("c1")).await.unwrap();
        let id = request.service_id;
        matching.add_candidate(id, "s1").await.unwrap();

        // Only a candidate can be chosen, and only by the owning company.
        assert!(matching.accept_own_company_request("c1", id, "s2").await.unwrap().is_none());
        assert!(matching.accept_own_company_request("c2", id, "s1").await.unwrap().is_none());

        let accepted = matching
            .accept_own_company_request("c1", id, "s1")
            .await
            .unwrap()
            .unwrap();
        assert!(accepted.request.is_accepted_by_company);
        assert!(matching.get_request(id).await.unwrap().is_none());

        let contracts = store.list_contracts().await.unwrap();
        assert_eq!(contracts.len(), 1);
        let contract = &contracts[0];
        assert_eq!(contract, &accepted.contract);
        assert_eq!(
            (contract.hours_per_week, contract.total_hours, contract.price_per_hour),
            (10, 200, 22.5)
        );
        assert_eq!((contract.student_id.as_str(), contract.company_id.as_str()), ("s1", "c1"));
        assert!(!contract.terminated);
    }

    #[tokio::test]
    async fn student_request_flow_requires_a_linked_company() {
        let (matching, store) = matching();
        let request = matching.create_student_request(&student_input("s1")).await.unwrap();
        let id = request.service_id;

        assert!(matching.accept_own_student_request("s1", id).await.unwrap().is_none());

        matching.accept_student_request(id, "c1").await.unwrap().unwrap();
        assert!(matching.accept_student_request(id, "c2").await.unwrap().is_none());

        let accepted = matching.accept_own_student_request("s1", id).await.unwrap().unwrap();
        assert_eq!(accepted.contract.company_id, "c1");
        assert!(matching.get_student_request(id).await.unwrap().is_none());
        assert_eq!(store.list_contracts_by_student("s1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejecting_a_student_request_clears_only_the_linked_company() {
        let (matching, _) = matching();
        let id = matching
            .create_student_request(&student_input("s1"))
            .await
            .unwrap()
            .service_id;
        matching.accept_student_request(id, "c1").await.unwrap();

        let kept = matching.reject(id, "c2").await.unwrap().unwrap();
        assert_matches!(&kept, Request::Student(r) if r.company_id.as_deref() == Some("c1"));

        let reopened = matching.reject(id, "c1").await.unwrap().unwrap();
        assert_eq!(reopened.status(), RequestStatus::Open);
    }

    #[tokio::test]
    async fn illegal_duration_keeps_request_open() {
        let (matching, store) = matching();
        // 6 h/week for 154 h is 6.25 months.
        let input = CreateStudentRequest {
            hours_per_week: 6,
            total_hours: 154,
            ..student_input("s1")
        };
        let id = matching.create_student_request(&input).await.unwrap().service_id;
        matching.accept_student_request(id, "c1").await.unwrap();

        assert!(matching.accept_own_student_request("s1", id).await.unwrap().is_none());

        let request = matching.get_student_request(id).await.unwrap().unwrap();
        assert!(!request.is_accepted_by_student);
        assert_eq!(request.company_id.as_deref(), Some("c1"));
        assert!(store.list_contracts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inconclusive_hand_off_keeps_the_claim_until_the_owner_retries() {
        let store = memory_store();
        let peer = ScriptedPeer::new(PeerAnswer::Fail);
        let matching = RequestMatching::new(Arc::clone(&store), peer.clone());

        let id = matching.create_company_request(&company_input("c1")).await.unwrap().service_id;
        matching.add_candidate(id, "s1").await.unwrap();
        matching.add_candidate(id, "s2").await.unwrap();

        let err = matching.accept_own_company_request("c1", id, "s1").await.unwrap_err();
        assert_matches!(err, AppError::Peer(_));
        assert_eq!(peer.calls.load(Ordering::SeqCst), 1);

        let request = matching.get_company_request(id).await.unwrap().unwrap();
        assert!(request.is_accepted_by_company);
        assert_eq!(request.student_id.as_deref(), Some("s1"));

        // The claimed request is frozen for everyone else.
        let update = UpdateCompanyRequest {
            total_hours: Some(120),
            ..UpdateCompanyRequest::default()
        };
        assert!(matching.update_company_request(id, &update).await.unwrap().is_none());
        assert!(matching.add_candidate(id, "s3").await.unwrap().is_none());
        assert!(matching.accept_own_company_request("c1", id, "s2").await.unwrap().is_none());

        let healthy = RequestMatching::new(Arc::clone(&store), local_peer(&store));
        let accepted = healthy
            .accept_own_company_request("c1", id, "s1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(accepted.contract.total_hours, 200);
        assert!(healthy.get_request(id).await.unwrap().is_none());
        assert_eq!(store.list_contracts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lost_acknowledgement_does_not_duplicate_the_contract() {
        let store = memory_store();
        let lossy = RequestMatching::new(Arc::clone(&store), ScriptedPeer::losing_acks(&store));
        let id = lossy.create_student_request(&student_input("s1")).await.unwrap().service_id;
        lossy.accept_student_request(id, "c1").await.unwrap();

        assert!(lossy.accept_own_student_request("s1", id).await.is_err());
        assert!(lossy.get_student_request(id).await.unwrap().is_some());
        assert_eq!(store.list_contracts().await.unwrap().len(), 1);

        let healthy = RequestMatching::new(Arc::clone(&store), local_peer(&store));
        let accepted = healthy.accept_own_student_request("s1", id).await.unwrap().unwrap();

        let contracts = store.list_contracts().await.unwrap();
        assert_eq!(contracts, vec![accepted.contract]);
        assert_eq!(contracts[0].source_service_id, Some(id));
        assert!(healthy.get_student_request(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn undelivered_hand_off_releases_the_claim() {
        let store = memory_store();
        let matching =
            RequestMatching::new(Arc::clone(&store), ScriptedPeer::new(PeerAnswer::StoreDown));

        let id = matching.create_company_request(&company_input("c1")).await.unwrap().service_id;
        matching.add_candidate(id, "s1").await.unwrap();

        let err = matching.accept_own_company_request("c1", id, "s1").await.unwrap_err();
        assert_matches!(err, AppError::Peer(_));

        let request = matching.get_company_request(id).await.unwrap().unwrap();
        assert!(!request.is_accepted_by_company);
        assert_eq!(request.student_id, None);
        assert_eq!(request.student_id_candidates, vec!["s1".to_string()]);
    }

    #[tokio::test]
    async fn claimed_student_request_refuses_updates() {
        let store = memory_store();
        let matching =
            RequestMatching::new(Arc::clone(&store), ScriptedPeer::new(PeerAnswer::Fail));
        let id = matching.create_student_request(&student_input("s1")).await.unwrap().service_id;
        matching.accept_student_request(id, "c1").await.unwrap();
        matching.accept_own_student_request("s1", id).await.unwrap_err();

        let update = UpdateStudentRequest {
            hours_per_week: Some(5),
            ..UpdateStudentRequest::default()
        };
        assert!(matching.update_student_request(id, &update).await.unwrap().is_none());
        let stored = matching.get_student_request(id).await.unwrap().unwrap();
        assert_eq!(stored.hours_per_week, 15);
    }

    #[tokio::test]
    async fn refused_hand_off_allows_a_later_attempt() {
        let store = memory_store();
        let refusing = RequestMatching::new(
            Arc::clone(&store),
            ScriptedPeer::new(PeerAnswer::Refuse),
        );
        let id = refusing.create_company_request(&company_input("c1")).await.unwrap().service_id;
        refusing.add_candidate(id, "s1").await.unwrap();
        assert!(refusing.accept_own_company_request("c1", id, "s1").await.unwrap().is_none());

        let accepting = RequestMatching::new(Arc::clone(&store), local_peer(&store));
        assert!(accepting.accept_own_company_request("c1", id, "s1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_applies_present_fields_only() {
        let (matching, _) = matching();
        let id = matching.create_company_request(&company_input("c1")).await.unwrap().service_id;

        let update = UpdateCompanyRequest {
            total_hours: Some(120),
            requirements: Some(vec!["go".into()]),
            ..UpdateCompanyRequest::default()
        };
        let updated = matching.update_company_request(id, &update).await.unwrap().unwrap();
        assert_eq!(updated.terms().total_hours, 120);
        assert_eq!(updated.hours_per_week, 10);
        assert_eq!(updated.requirements, vec!["go".to_string()]);

        assert!(matching.update_company_request(999, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filters_and_search() {
        let (matching, _) = matching();
        matching.create_student_request(&student_input("s1")).await.unwrap();
        matching
            .create_student_request(&CreateStudentRequest {
                rate_per_hour: 40.0,
                expertise: vec!["design".into()],
                ..student_input("s2")
            })
            .await
            .unwrap();

        let tag = |field: &str, lower: f64, upper: f64| FilterTag {
            type_of_filtering: field.to_string(),
            start_of_the_interval: lower,
            end_of_the_interval: upper,
        };
        assert_eq!(matching.filter_student_requests(&tag("salary", 30.0, 50.0)).await.unwrap().len(), 1);
        assert!(matching.filter_student_requests(&tag("salary", 50.0, 30.0)).await.unwrap().is_empty());
        assert!(matching.filter_student_requests(&tag("salary", -1.0, 30.0)).await.unwrap().is_empty());
        assert!(matching.filter_student_requests(&tag("bonus", 0.0, 99.0)).await.unwrap().is_empty());

        let found = matching.search_expertise("rust").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].student_id, "s1");
    }
}

//! Amendments: changes a student proposes to an open company request
//! before any contract exists. The company accepts (the positive fields
//! overwrite the request) or rejects; either way the amendment is removed.

use std::sync::Arc;

use gigbridge_core::types::DbId;
use gigbridge_db::models::amendment::{
    CompanyRequestModification, CreateCompanyRequestModification, ProposeAmendment,
};
use gigbridge_db::models::request::CompanyRequest;
use gigbridge_db::AgreementStore;

use super::{edit_company_request, Edit};
use crate::error::AppResult;

#[derive(Clone)]
pub struct Amendments {
    store: Arc<dyn AgreementStore>,
}

impl Amendments {
    pub fn new(store: Arc<dyn AgreementStore>) -> Self {
        Self { store }
    }

    /// Propose a change to company request `service_id`.
    pub async fn propose(
        &self,
        service_id: DbId,
        input: &ProposeAmendment,
    ) -> AppResult<Option<CompanyRequestModification>> {
        let Some(request) = self.store.find_company_request(service_id).await? else {
            return Ok(None);
        };

        let amendment = self
            .store
            .create_amendment(&CreateCompanyRequestModification {
                service_id,
                student_id: input.student_id.clone(),
                company_id: request.company_id,
                change: input.change,
            })
            .await?;
        tracing::info!(
            modification_id = amendment.modification_id,
            service_id,
            student_id = %amendment.student_id,
            "Request amendment proposed"
        );
        Ok(Some(amendment))
    }

    pub async fn list_for_company(
        &self,
        company_id: &str,
    ) -> AppResult<Vec<CompanyRequestModification>> {
        Ok(self.store.list_amendments_for_company(company_id).await?)
    }

    /// Fetch an amendment if it belongs to `company_id`.
    async fn owned(
        &self,
        company_id: &str,
        modification_id: DbId,
    ) -> AppResult<Option<CompanyRequestModification>> {
        let amendment = self
            .store
            .find_amendment(modification_id)
            .await?
            .filter(|a| a.company_id == company_id);
        Ok(amendment)
    }

    /// Apply the amendment's positive fields to its request and discard it.
    ///
    /// Returns the updated request. If the request no longer exists the
    /// amendment is discarded and `None` returned. A request that is being
    /// converted into a contract is left alone and the amendment kept.
    pub async fn accept(
        &self,
        company_id: &str,
        modification_id: DbId,
    ) -> AppResult<Option<CompanyRequest>> {
        let Some(amendment) = self.owned(company_id, modification_id).await? else {
            return Ok(None);
        };

        let change = amendment.change();
        let mut claimed = false;
        let updated = edit_company_request(self.store.as_ref(), amendment.service_id, |request| {
            if request.is_accepted_by_company {
                claimed = true;
                return Edit::Refuse;
            }
            request.set_terms(change.apply_positive(request.terms()));
            Edit::Write
        })
        .await?;

        if claimed {
            tracing::info!(
                modification_id,
                service_id = amendment.service_id,
                "Request amendment deferred: request is being converted"
            );
            return Ok(None);
        }

        self.store.delete_amendment(modification_id).await?;
        match &updated {
            Some(_) => tracing::info!(
                modification_id,
                service_id = amendment.service_id,
                "Request amendment accepted"
            ),
            None => tracing::warn!(
                modification_id,
                service_id = amendment.service_id,
                "Request amendment discarded: request no longer exists"
            ),
        }
        Ok(updated)
    }

    /// Discard the amendment, returning the unchanged request.
    pub async fn reject(
        &self,
        company_id: &str,
        modification_id: DbId,
    ) -> AppResult<Option<CompanyRequest>> {
        let Some(amendment) = self.owned(company_id, modification_id).await? else {
            return Ok(None);
        };

        self.store.delete_amendment(modification_id).await?;
        tracing::info!(
            modification_id,
            service_id = amendment.service_id,
            "Request amendment rejected"
        );
        Ok(self.store.find_company_request(amendment.service_id).await?)
    }
}

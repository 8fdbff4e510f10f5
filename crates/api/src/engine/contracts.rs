use std::sync::Arc;

use gigbridge_core::types::DbId;
use gigbridge_db::models::contract::{Contract, CreateContract};
use gigbridge_db::{AgreementStore, StoreError};

fn admissible(draft: &CreateContract) -> bool {
    let terms = draft.terms();
    if terms.is_contractable() {
        return true;
    }
    tracing::info!(
        student_id = %draft.student_id,
        company_id = %draft.company_id,
        hours_per_week = terms.hours_per_week,
        total_hours = terms.total_hours,
        "Contract draft rejected: illegal terms"
    );
    false
}

/// The contract-owning side of peer notification.
#[derive(Clone)]
pub struct ContractRegistry {
    store: Arc<dyn AgreementStore>,
}

impl ContractRegistry {
    pub fn new(store: Arc<dyn AgreementStore>) -> Self {
        Self { store }
    }

    /// Store a new contract if its terms are positive and its duration legal.
    ///
    /// The draft's `contractId` and `terminated` are ignored. A draft tied to
    /// a request that already has a contract returns that contract.
    pub async fn create(&self, draft: &CreateContract) -> Result<Option<Contract>, StoreError> {
        if !admissible(draft) {
            return Ok(None);
        }
        let contract = self.store.create_contract(draft).await?;
        tracing::info!(
            contract_id = contract.contract_id,
            source_service_id = ?contract.source_service_id,
            student_id = %contract.student_id,
            company_id = %contract.company_id,
            "Contract recorded"
        );
        Ok(Some(contract))
    }

    /// Store the contract agreed on co-located request `service_id` and
    /// delete the request in the same step.
    pub async fn create_for_request(
        &self,
        service_id: DbId,
        draft: &CreateContract,
    ) -> Result<Option<Contract>, StoreError> {
        if !admissible(draft) {
            return Ok(None);
        }
        let contract = self.store.create_contract_for_request(service_id, draft).await?;
        tracing::info!(
            contract_id = contract.contract_id,
            service_id,
            student_id = %contract.student_id,
            company_id = %contract.company_id,
            "Contract recorded, request consumed"
        );
        Ok(Some(contract))
    }

    pub async fn get(&self, contract_id: DbId) -> Result<Option<Contract>, StoreError> {
        self.store.find_contract(contract_id).await
    }

    pub async fn list(&self) -> Result<Vec<Contract>, StoreError> {
        self.store.list_contracts().await
    }

    pub async fn list_for_student(&self, student_id: &str) -> Result<Vec<Contract>, StoreError> {
        self.store.list_contracts_by_student(student_id).await
    }

    pub async fn list_for_company(&self, company_id: &str) -> Result<Vec<Contract>, StoreError> {
        self.store.list_contracts_by_company(company_id).await
    }

    /// Delete a contract. Modifications referencing it are left dangling.
    pub async fn delete(&self, contract_id: DbId) -> Result<bool, StoreError> {
        let deleted = self.store.delete_contract(contract_id).await?;
        if deleted {
            tracing::info!(contract_id, "Contract deleted");
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use gigbridge_core::terms::WorkTerms;

    use super::*;
    use crate::engine::testing::memory_store;

    fn draft(hours_per_week: i32, total_hours: i32) -> CreateContract {
        CreateContract::new(
            WorkTerms::new(hours_per_week, total_hours, 25.0),
            "s1".into(),
            "c1".into(),
        )
    }

    #[tokio::test]
    async fn legal_draft_is_stored_unterminated() {
        let registry = ContractRegistry::new(memory_store());
        let mut input = draft(20, 400);
        input.terminated = true;
        input.contract_id = Some(99);

        let contract = registry.create(&input).await.unwrap().unwrap();
        assert!(!contract.terminated);
        assert_eq!(contract.contract_id, 1);
        assert_eq!(registry.get(1).await.unwrap(), Some(contract));
    }

    #[tokio::test]
    async fn illegal_drafts_store_nothing() {
        let registry = ContractRegistry::new(memory_store());
        for (h, t) in [(21, 154), (6, 154), (0, 100), (10, -5)] {
            assert!(registry.create(&draft(h, t)).await.unwrap().is_none(), "({h}, {t})");
        }
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_are_scoped_by_party() {
        let registry = ContractRegistry::new(memory_store());
        registry.create(&draft(10, 100)).await.unwrap();
        let other = CreateContract {
            student_id: "s2".into(),
            ..draft(10, 100)
        };
        registry.create(&other).await.unwrap();

        assert_eq!(registry.list_for_student("s2").await.unwrap().len(), 1);
        assert_eq!(registry.list_for_company("c1").await.unwrap().len(), 2);
        assert!(registry.delete(1).await.unwrap());
        assert!(!registry.delete(1).await.unwrap());
    }

    #[tokio::test]
    async fn repeated_draft_for_a_request_returns_the_first_contract() {
        let registry = ContractRegistry::new(memory_store());
        let first = registry.create(&draft(10, 100).for_request(5)).await.unwrap().unwrap();
        let again = registry.create(&draft(10, 100).for_request(5)).await.unwrap().unwrap();
        assert_eq!(again, first);
        assert_eq!(registry.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn illegal_draft_for_a_request_keeps_the_request() {
        let store = memory_store();
        let registry = ContractRegistry::new(Arc::clone(&store));
        let request = store
            .create_student_request(&gigbridge_db::models::request::CreateStudentRequest {
                student_id: "s1".into(),
                hours_per_week: 6,
                total_hours: 154,
                rate_per_hour: 20.0,
                expertise: Vec::new(),
            })
            .await
            .unwrap();

        let refused = registry
            .create_for_request(request.service_id, &draft(6, 154))
            .await
            .unwrap();
        assert!(refused.is_none());
        assert!(store.find_student_request(request.service_id).await.unwrap().is_some());
    }
}

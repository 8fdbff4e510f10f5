//! [`AgreementStore`] kept in process memory.
//!
//! All tables live behind one lock, so each method is atomic with respect to
//! every other. Rows are kept in `BTreeMap`s keyed by id, which makes every
//! list come back in ascending id order like the SQL queries.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use gigbridge_core::matching::{FilterField, FilterRange};
use gigbridge_core::party::Party;
use gigbridge_core::types::DbId;

use crate::models::amendment::{CompanyRequestModification, CreateCompanyRequestModification};
use crate::models::contract::{Contract, CreateContract};
use crate::models::modification::{ContractModification, CreateContractModification};
use crate::models::request::{
    CompanyRequest, CreateCompanyRequest, CreateStudentRequest, StudentRequest,
};

use super::{AgreementStore, StoreError};

#[derive(Default)]
struct Tables {
    /// Shared by both request kinds, like `request_service_id_seq`.
    next_service_id: DbId,
    next_contract_id: DbId,
    next_modification_id: DbId,
    next_amendment_id: DbId,
    company_requests: BTreeMap<DbId, CompanyRequest>,
    student_requests: BTreeMap<DbId, StudentRequest>,
    contracts: BTreeMap<DbId, Contract>,
    modifications: BTreeMap<DbId, ContractModification>,
    amendments: BTreeMap<DbId, CompanyRequestModification>,
}

fn next(counter: &mut DbId) -> DbId {
    *counter += 1;
    *counter
}

impl Tables {
    /// Write `contract` if the stored row exists, is not terminated, and
    /// still has the same version.
    fn update_contract(&mut self, contract: &Contract) -> Option<Contract> {
        let stored = self.contracts.get_mut(&contract.contract_id)?;
        if stored.terminated || stored.version != contract.version {
            return None;
        }
        stored.hours_per_week = contract.hours_per_week;
        stored.total_hours = contract.total_hours;
        stored.price_per_hour = contract.price_per_hour;
        stored.terminated = contract.terminated;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Some(stored.clone())
    }

    /// Insert a contract, or return the one already recorded for the
    /// draft's request.
    fn insert_contract(&mut self, input: &CreateContract) -> Contract {
        if let Some(source) = input.source_service_id {
            let existing = self
                .contracts
                .values()
                .find(|c| c.source_service_id == Some(source));
            if let Some(existing) = existing {
                tracing::debug!(
                    source_service_id = source,
                    contract_id = existing.contract_id,
                    "Contract already recorded for request"
                );
                return existing.clone();
            }
        }
        let now = Utc::now();
        let row = Contract {
            contract_id: next(&mut self.next_contract_id),
            hours_per_week: input.hours_per_week,
            total_hours: input.total_hours,
            price_per_hour: input.price_per_hour,
            student_id: input.student_id.clone(),
            company_id: input.company_id.clone(),
            terminated: false,
            source_service_id: input.source_service_id,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        self.contracts.insert(row.contract_id, row.clone());
        row
    }

    fn update_modification(
        &mut self,
        modification: &ContractModification,
    ) -> Option<ContractModification> {
        let stored = self.modifications.get_mut(&modification.modification_id)?;
        if stored.version != modification.version || stored.finished {
            return None;
        }
        stored.accepted_by_company = modification.accepted_by_company;
        stored.accepted_by_student = modification.accepted_by_student;
        stored.finished = modification.finished;
        stored.version += 1;
        stored.updated_at = Utc::now();
        Some(stored.clone())
    }
}

/// In-memory store used by tests and by `STORAGE_BACKEND=memory`.
#[derive(Default)]
pub struct MemoryAgreementStore {
    tables: Mutex<Tables>,
}

impl MemoryAgreementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgreementStore for MemoryAgreementStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_company_request(
        &self,
        input: &CreateCompanyRequest,
    ) -> Result<CompanyRequest, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let row = CompanyRequest {
            service_id: next(&mut tables.next_service_id),
            company_id: input.company_id.clone(),
            hours_per_week: input.hours_per_week,
            total_hours: input.total_hours,
            rate_per_hour: input.rate_per_hour,
            requirements: input.requirements.clone(),
            is_accepted_by_company: false,
            student_id_candidates: Vec::new(),
            student_id: None,
            target_student_id: input.target_student_id.clone(),
            version: 0,
            created_at: now,
            updated_at: now,
        };
        tables.company_requests.insert(row.service_id, row.clone());
        Ok(row)
    }

    async fn find_company_request(&self, id: DbId) -> Result<Option<CompanyRequest>, StoreError> {
        Ok(self.tables.lock().await.company_requests.get(&id).cloned())
    }

    async fn list_company_requests(&self) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(self.tables.lock().await.company_requests.values().cloned().collect())
    }

    async fn list_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .company_requests
            .values()
            .filter(|r| r.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn list_company_requests_targeting(
        &self,
        student_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .company_requests
            .values()
            .filter(|r| r.target_student_id.as_deref() == Some(student_id))
            .cloned()
            .collect())
    }

    async fn filter_company_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .company_requests
            .values()
            .filter(|r| range.contains(field.value(&r.terms())))
            .cloned()
            .collect())
    }

    async fn update_company_request(
        &self,
        request: &CompanyRequest,
    ) -> Result<Option<CompanyRequest>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(stored) = tables.company_requests.get_mut(&request.service_id) else {
            return Ok(None);
        };
        if stored.version != request.version {
            return Ok(None);
        }
        *stored = CompanyRequest {
            version: stored.version + 1,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..request.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_company_request(
        &self,
        id: DbId,
    ) -> Result<Option<CompanyRequest>, StoreError> {
        Ok(self.tables.lock().await.company_requests.remove(&id))
    }

    async fn delete_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        let mut tables = self.tables.lock().await;
        let ids: Vec<DbId> = tables
            .company_requests
            .values()
            .filter(|r| r.company_id == company_id)
            .map(|r| r.service_id)
            .collect();
        Ok(ids
            .into_iter()
            .filter_map(|id| tables.company_requests.remove(&id))
            .collect())
    }

    async fn create_student_request(
        &self,
        input: &CreateStudentRequest,
    ) -> Result<StudentRequest, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let row = StudentRequest {
            service_id: next(&mut tables.next_service_id),
            student_id: input.student_id.clone(),
            hours_per_week: input.hours_per_week,
            total_hours: input.total_hours,
            rate_per_hour: input.rate_per_hour,
            expertise: input.expertise.clone(),
            is_accepted_by_student: false,
            company_id: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        tables.student_requests.insert(row.service_id, row.clone());
        Ok(row)
    }

    async fn find_student_request(&self, id: DbId) -> Result<Option<StudentRequest>, StoreError> {
        Ok(self.tables.lock().await.student_requests.get(&id).cloned())
    }

    async fn list_student_requests(&self) -> Result<Vec<StudentRequest>, StoreError> {
        Ok(self.tables.lock().await.student_requests.values().cloned().collect())
    }

    async fn list_student_requests_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .student_requests
            .values()
            .filter(|r| r.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn search_student_requests(
        &self,
        tag: &str,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .student_requests
            .values()
            .filter(|r| r.expertise.iter().any(|e| e == tag))
            .cloned()
            .collect())
    }

    async fn filter_student_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .student_requests
            .values()
            .filter(|r| range.contains(field.value(&r.terms())))
            .cloned()
            .collect())
    }

    async fn update_student_request(
        &self,
        request: &StudentRequest,
    ) -> Result<Option<StudentRequest>, StoreError> {
        let mut tables = self.tables.lock().await;
        let Some(stored) = tables.student_requests.get_mut(&request.service_id) else {
            return Ok(None);
        };
        if stored.version != request.version {
            return Ok(None);
        }
        *stored = StudentRequest {
            version: stored.version + 1,
            created_at: stored.created_at,
            updated_at: Utc::now(),
            ..request.clone()
        };
        Ok(Some(stored.clone()))
    }

    async fn delete_student_request(
        &self,
        id: DbId,
    ) -> Result<Option<StudentRequest>, StoreError> {
        Ok(self.tables.lock().await.student_requests.remove(&id))
    }

    async fn create_contract(&self, input: &CreateContract) -> Result<Contract, StoreError> {
        Ok(self.tables.lock().await.insert_contract(input))
    }

    async fn create_contract_for_request(
        &self,
        service_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, StoreError> {
        let input = CreateContract {
            source_service_id: Some(service_id),
            ..input.clone()
        };
        let mut tables = self.tables.lock().await;
        let contract = tables.insert_contract(&input);
        tables.company_requests.remove(&service_id);
        tables.student_requests.remove(&service_id);
        Ok(contract)
    }

    async fn find_contract(&self, id: DbId) -> Result<Option<Contract>, StoreError> {
        Ok(self.tables.lock().await.contracts.get(&id).cloned())
    }

    async fn list_contracts(&self) -> Result<Vec<Contract>, StoreError> {
        Ok(self.tables.lock().await.contracts.values().cloned().collect())
    }

    async fn list_contracts_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<Contract>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .contracts
            .values()
            .filter(|c| c.student_id == student_id)
            .cloned()
            .collect())
    }

    async fn list_contracts_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<Contract>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .contracts
            .values()
            .filter(|c| c.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn update_contract(&self, contract: &Contract) -> Result<Option<Contract>, StoreError> {
        Ok(self.tables.lock().await.update_contract(contract))
    }

    async fn delete_contract(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.lock().await.contracts.remove(&id).is_some())
    }

    async fn create_modification(
        &self,
        input: &CreateContractModification,
    ) -> Result<ContractModification, StoreError> {
        let mut tables = self.tables.lock().await;
        let now = Utc::now();
        let row = ContractModification {
            modification_id: next(&mut tables.next_modification_id),
            contract_id: input.contract_id,
            modification_type: input.modification_type.as_str().to_string(),
            student_id: input.student_id.clone(),
            company_id: input.company_id.clone(),
            hours_per_week: input.terms.hours_per_week,
            total_hours: input.terms.total_hours,
            price_per_hour: input.terms.price_per_hour,
            accepted_by_company: input.consent.accepted_by_company,
            accepted_by_student: input.consent.accepted_by_student,
            finished: input.consent.finished,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        tables.modifications.insert(row.modification_id, row.clone());
        Ok(row)
    }

    async fn find_modification(
        &self,
        id: DbId,
    ) -> Result<Option<ContractModification>, StoreError> {
        Ok(self.tables.lock().await.modifications.get(&id).cloned())
    }

    async fn update_modification(
        &self,
        modification: &ContractModification,
    ) -> Result<Option<ContractModification>, StoreError> {
        Ok(self.tables.lock().await.update_modification(modification))
    }

    async fn list_modifications_awaiting(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .modifications
            .values()
            .filter(|m| {
                !m.finished
                    && m.party_id(party) == party_id
                    && m.consent().accepted_by(party.counterpart())
            })
            .cloned()
            .collect())
    }

    async fn list_modifications_involving(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .modifications
            .values()
            .filter(|m| m.party_id(party) == party_id)
            .cloned()
            .collect())
    }

    async fn finish_and_apply(
        &self,
        modification: &ContractModification,
        contract: &Contract,
    ) -> Result<Option<(ContractModification, Option<Contract>)>, StoreError> {
        let mut tables = self.tables.lock().await;
        let stale = tables
            .contracts
            .get(&contract.contract_id)
            .is_some_and(|c| !c.terminated && c.version != contract.version);
        if stale {
            tracing::debug!(
                modification_id = modification.modification_id,
                contract_id = contract.contract_id,
                "Contract changed concurrently"
            );
            return Ok(None);
        }
        let Some(finished) = tables.update_modification(modification) else {
            return Ok(None);
        };
        let updated = tables.update_contract(contract);
        Ok(Some((finished, updated)))
    }

    async fn create_amendment(
        &self,
        input: &CreateCompanyRequestModification,
    ) -> Result<CompanyRequestModification, StoreError> {
        let mut tables = self.tables.lock().await;
        let row = CompanyRequestModification {
            modification_id: next(&mut tables.next_amendment_id),
            service_id: input.service_id,
            student_id: input.student_id.clone(),
            company_id: input.company_id.clone(),
            hours_per_week: input.hours_per_week(),
            total_hours: input.total_hours(),
            price_per_hour: input.price_per_hour(),
            accepted_by_company: false,
            created_at: Utc::now(),
        };
        tables.amendments.insert(row.modification_id, row.clone());
        Ok(row)
    }

    async fn find_amendment(
        &self,
        id: DbId,
    ) -> Result<Option<CompanyRequestModification>, StoreError> {
        Ok(self.tables.lock().await.amendments.get(&id).cloned())
    }

    async fn list_amendments_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequestModification>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .amendments
            .values()
            .filter(|a| a.company_id == company_id)
            .cloned()
            .collect())
    }

    async fn delete_amendment(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(self.tables.lock().await.amendments.remove(&id).is_some())
    }
}

//! [`AgreementStore`] backed by PostgreSQL through the repositories.

use async_trait::async_trait;

use gigbridge_core::matching::{FilterField, FilterRange};
use gigbridge_core::party::Party;
use gigbridge_core::types::DbId;

use crate::models::amendment::{CompanyRequestModification, CreateCompanyRequestModification};
use crate::models::contract::{Contract, CreateContract};
use crate::models::modification::{ContractModification, CreateContractModification};
use crate::models::request::{
    CompanyRequest, CreateCompanyRequest, CreateStudentRequest, StudentRequest,
};
use crate::repositories::{
    AmendmentRepo, CompanyRequestRepo, ContractRepo, ModificationRepo, StudentRequestRepo,
};
use crate::DbPool;

use super::{AgreementStore, StoreError};

#[derive(Clone)]
pub struct PgAgreementStore {
    pool: DbPool,
}

impl PgAgreementStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl AgreementStore for PgAgreementStore {
    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_company_request(
        &self,
        input: &CreateCompanyRequest,
    ) -> Result<CompanyRequest, StoreError> {
        Ok(CompanyRequestRepo::create(&self.pool, input).await?)
    }

    async fn find_company_request(&self, id: DbId) -> Result<Option<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_company_requests(&self) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::list(&self.pool).await?)
    }

    async fn list_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn list_company_requests_targeting(
        &self,
        student_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::list_targeting(&self.pool, student_id).await?)
    }

    async fn filter_company_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::filter(&self.pool, field, range).await?)
    }

    async fn update_company_request(
        &self,
        request: &CompanyRequest,
    ) -> Result<Option<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::update_guarded(&self.pool, request).await?)
    }

    async fn delete_company_request(
        &self,
        id: DbId,
    ) -> Result<Option<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::delete(&self.pool, id).await?)
    }

    async fn delete_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError> {
        Ok(CompanyRequestRepo::delete_by_company(&self.pool, company_id).await?)
    }

    async fn create_student_request(
        &self,
        input: &CreateStudentRequest,
    ) -> Result<StudentRequest, StoreError> {
        Ok(StudentRequestRepo::create(&self.pool, input).await?)
    }

    async fn find_student_request(&self, id: DbId) -> Result<Option<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_student_requests(&self) -> Result<Vec<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::list(&self.pool).await?)
    }

    async fn list_student_requests_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::list_by_student(&self.pool, student_id).await?)
    }

    async fn search_student_requests(
        &self,
        tag: &str,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::search_expertise(&self.pool, tag).await?)
    }

    async fn filter_student_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::filter(&self.pool, field, range).await?)
    }

    async fn update_student_request(
        &self,
        request: &StudentRequest,
    ) -> Result<Option<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::update_guarded(&self.pool, request).await?)
    }

    async fn delete_student_request(
        &self,
        id: DbId,
    ) -> Result<Option<StudentRequest>, StoreError> {
        Ok(StudentRequestRepo::delete(&self.pool, id).await?)
    }

    async fn create_contract(&self, input: &CreateContract) -> Result<Contract, StoreError> {
        Ok(ContractRepo::create(&self.pool, input).await?)
    }

    async fn create_contract_for_request(
        &self,
        service_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, StoreError> {
        Ok(ContractRepo::create_for_request(&self.pool, service_id, input).await?)
    }

    async fn find_contract(&self, id: DbId) -> Result<Option<Contract>, StoreError> {
        Ok(ContractRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_contracts(&self) -> Result<Vec<Contract>, StoreError> {
        Ok(ContractRepo::list(&self.pool).await?)
    }

    async fn list_contracts_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<Contract>, StoreError> {
        Ok(ContractRepo::list_by_student(&self.pool, student_id).await?)
    }

    async fn list_contracts_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<Contract>, StoreError> {
        Ok(ContractRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn update_contract(&self, contract: &Contract) -> Result<Option<Contract>, StoreError> {
        Ok(ContractRepo::update(&self.pool, contract).await?)
    }

    async fn delete_contract(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(ContractRepo::delete(&self.pool, id).await?)
    }

    async fn create_modification(
        &self,
        input: &CreateContractModification,
    ) -> Result<ContractModification, StoreError> {
        Ok(ModificationRepo::create(&self.pool, input).await?)
    }

    async fn find_modification(
        &self,
        id: DbId,
    ) -> Result<Option<ContractModification>, StoreError> {
        Ok(ModificationRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update_modification(
        &self,
        modification: &ContractModification,
    ) -> Result<Option<ContractModification>, StoreError> {
        Ok(ModificationRepo::update_guarded(&self.pool, modification).await?)
    }

    async fn list_modifications_awaiting(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError> {
        let rows = match party {
            Party::Company => ModificationRepo::list_awaiting_company(&self.pool, party_id).await?,
            Party::Student => ModificationRepo::list_awaiting_student(&self.pool, party_id).await?,
        };
        Ok(rows)
    }

    async fn list_modifications_involving(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError> {
        let rows = match party {
            Party::Company => ModificationRepo::list_by_company(&self.pool, party_id).await?,
            Party::Student => ModificationRepo::list_by_student(&self.pool, party_id).await?,
        };
        Ok(rows)
    }

    async fn finish_and_apply(
        &self,
        modification: &ContractModification,
        contract: &Contract,
    ) -> Result<Option<(ContractModification, Option<Contract>)>, StoreError> {
        Ok(ModificationRepo::finish_and_apply(&self.pool, modification, contract).await?)
    }

    async fn create_amendment(
        &self,
        input: &CreateCompanyRequestModification,
    ) -> Result<CompanyRequestModification, StoreError> {
        Ok(AmendmentRepo::create(&self.pool, input).await?)
    }

    async fn find_amendment(
        &self,
        id: DbId,
    ) -> Result<Option<CompanyRequestModification>, StoreError> {
        Ok(AmendmentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_amendments_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequestModification>, StoreError> {
        Ok(AmendmentRepo::list_by_company(&self.pool, company_id).await?)
    }

    async fn delete_amendment(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(AmendmentRepo::delete(&self.pool, id).await?)
    }
}

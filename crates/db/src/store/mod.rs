//! Storage behind a trait, so the engine runs against PostgreSQL in
//! production and an in-memory backend in tests.
//!
//! Every `update_*` method is guarded by the row's `version` column: it
//! writes only if the stored version still equals the one read, and returns
//! `None` otherwise. Callers re-read and retry on `None`.

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

mod memory;
mod postgres;

pub use memory::MemoryAgreementStore;
pub use postgres::PgAgreementStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Persistence for every record the agreement lifecycle touches.
#[async_trait]
pub trait AgreementStore: Send + Sync {
    /// Verify the backing storage is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;

    // -- Company requests ---------------------------------------------------

    async fn create_company_request(
        &self,
        input: &CreateCompanyRequest,
    ) -> Result<CompanyRequest, StoreError>;

    async fn find_company_request(&self, id: DbId) -> Result<Option<CompanyRequest>, StoreError>;

    async fn list_company_requests(&self) -> Result<Vec<CompanyRequest>, StoreError>;

    async fn list_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError>;

    /// Requests addressed to one student.
    async fn list_company_requests_targeting(
        &self,
        student_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError>;

    async fn filter_company_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<CompanyRequest>, StoreError>;

    async fn update_company_request(
        &self,
        request: &CompanyRequest,
    ) -> Result<Option<CompanyRequest>, StoreError>;

    async fn delete_company_request(&self, id: DbId)
        -> Result<Option<CompanyRequest>, StoreError>;

    async fn delete_company_requests_by_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequest>, StoreError>;

    // -- Student requests ---------------------------------------------------

    async fn create_student_request(
        &self,
        input: &CreateStudentRequest,
    ) -> Result<StudentRequest, StoreError>;

    async fn find_student_request(&self, id: DbId) -> Result<Option<StudentRequest>, StoreError>;

    async fn list_student_requests(&self) -> Result<Vec<StudentRequest>, StoreError>;

    async fn list_student_requests_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<StudentRequest>, StoreError>;

    async fn search_student_requests(&self, tag: &str)
        -> Result<Vec<StudentRequest>, StoreError>;

    async fn filter_student_requests(
        &self,
        field: FilterField,
        range: FilterRange,
    ) -> Result<Vec<StudentRequest>, StoreError>;

    async fn update_student_request(
        &self,
        request: &StudentRequest,
    ) -> Result<Option<StudentRequest>, StoreError>;

    async fn delete_student_request(&self, id: DbId)
        -> Result<Option<StudentRequest>, StoreError>;

    // -- Contracts ----------------------------------------------------------

    /// Insert a contract. A draft whose `source_service_id` already has a
    /// contract returns the existing one.
    async fn create_contract(&self, input: &CreateContract) -> Result<Contract, StoreError>;

    /// Record the contract agreed on request `service_id` and delete that
    /// request, atomically. Repeating the call returns the same contract.
    async fn create_contract_for_request(
        &self,
        service_id: DbId,
        input: &CreateContract,
    ) -> Result<Contract, StoreError>;

    async fn find_contract(&self, id: DbId) -> Result<Option<Contract>, StoreError>;

    async fn list_contracts(&self) -> Result<Vec<Contract>, StoreError>;

    async fn list_contracts_by_student(&self, student_id: &str)
        -> Result<Vec<Contract>, StoreError>;

    async fn list_contracts_by_company(&self, company_id: &str)
        -> Result<Vec<Contract>, StoreError>;

    /// Overwrite a contract unless it is gone, terminated, or its `version`
    /// is stale.
    async fn update_contract(&self, contract: &Contract) -> Result<Option<Contract>, StoreError>;

    async fn delete_contract(&self, id: DbId) -> Result<bool, StoreError>;

    // -- Contract modifications ---------------------------------------------

    async fn create_modification(
        &self,
        input: &CreateContractModification,
    ) -> Result<ContractModification, StoreError>;

    async fn find_modification(
        &self,
        id: DbId,
    ) -> Result<Option<ContractModification>, StoreError>;

    /// Write consent flags of an unfinished modification.
    async fn update_modification(
        &self,
        modification: &ContractModification,
    ) -> Result<Option<ContractModification>, StoreError>;

    /// Unfinished modifications where the counterpart of `party` has
    /// accepted and `party_id` must answer.
    async fn list_modifications_awaiting(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError>;

    /// Every modification on a contract where `party_id` is the `party` side.
    async fn list_modifications_involving(
        &self,
        party: Party,
        party_id: &str,
    ) -> Result<Vec<ContractModification>, StoreError>;

    /// Atomically finish `modification` and write `contract`.
    ///
    /// `None` means the modification or the contract lost a concurrent
    /// update and nothing was written. The inner option is `None` if the contract was gone or
    /// terminated; the modification is still finished in that case.
    async fn finish_and_apply(
        &self,
        modification: &ContractModification,
        contract: &Contract,
    ) -> Result<Option<(ContractModification, Option<Contract>)>, StoreError>;

    // -- Company request amendments -----------------------------------------

    async fn create_amendment(
        &self,
        input: &CreateCompanyRequestModification,
    ) -> Result<CompanyRequestModification, StoreError>;

    async fn find_amendment(
        &self,
        id: DbId,
    ) -> Result<Option<CompanyRequestModification>, StoreError>;

    async fn list_amendments_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<CompanyRequestModification>, StoreError>;

    async fn delete_amendment(&self, id: DbId) -> Result<bool, StoreError>;
}

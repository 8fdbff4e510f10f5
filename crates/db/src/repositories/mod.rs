pub mod amendment_repo;
pub mod company_request_repo;
pub mod contract_repo;
pub mod modification_repo;
pub mod student_request_repo;

pub use amendment_repo::AmendmentRepo;
pub use company_request_repo::CompanyRequestRepo;
pub use contract_repo::ContractRepo;
pub use modification_repo::ModificationRepo;
pub use student_request_repo::StudentRequestRepo;

//! The agreement lifecycle services.
//!
//! Each service wraps the shared [`AgreementStore`] and implements one part
//! of the lifecycle:
//!
//! - [`RequestMatching`]: open requests, candidates, and conversion of a
//!   mutually accepted request into a contract.
//! - [`Amendments`]: student-proposed changes to open company requests.
//! - [`ModificationProtocol`]: dual-consent changes to signed contracts.
//! - [`ContractRegistry`]: the contract records themselves.
//!
//! Business-rule refusals are `Ok(None)`. Only infrastructure failures and
//! malformed input are errors.

mod amendments;
mod contracts;
mod matching;
mod protocol;

pub use amendments::Amendments;
pub use contracts::ContractRegistry;
pub use matching::{AcceptedRequest, RequestMatching};
pub use protocol::{ModificationProtocol, Resolution};

use gigbridge_core::error::CoreError;
use gigbridge_core::types::DbId;
use gigbridge_db::models::request::{CompanyRequest, StudentRequest};
use gigbridge_db::AgreementStore;

use crate::error::AppResult;

/// Attempts at a version-guarded write before giving up with a conflict.
pub const MAX_CAS_ATTEMPTS: usize = 3;

/// What an edit closure decided about the current row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Edit {
    /// Persist the mutated row.
    Write,
    /// Return the row as read. The closure must not have mutated it.
    Keep,
    /// Refuse the operation; the caller gets `None`.
    Refuse,
}

fn conflict(entity: &str, id: DbId) -> CoreError {
    CoreError::Conflict(format!(
        "{entity} {id} kept changing concurrently; gave up after {MAX_CAS_ATTEMPTS} attempts"
    ))
}

/// Read-modify-write a company request under its version guard.
///
/// Re-reads and re-runs `edit` when a concurrent writer wins.
pub(crate) async fn edit_company_request<F>(
    store: &dyn AgreementStore,
    service_id: DbId,
    mut edit: F,
) -> AppResult<Option<CompanyRequest>>
where
    F: FnMut(&mut CompanyRequest) -> Edit + Send,
{
    for _ in 0..MAX_CAS_ATTEMPTS {
        let Some(mut request) = store.find_company_request(service_id).await? else {
            return Ok(None);
        };
        match edit(&mut request) {
            Edit::Refuse => return Ok(None),
            Edit::Keep => return Ok(Some(request)),
            Edit::Write => {}
        }
        if let Some(saved) = store.update_company_request(&request).await? {
            return Ok(Some(saved));
        }
        tracing::debug!(service_id, "Company request changed concurrently, retrying");
    }
    Err(conflict("Company request", service_id).into())
}

/// Read-modify-write a student request under its version guard.
pub(crate) async fn edit_student_request<F>(
    store: &dyn AgreementStore,
    service_id: DbId,
    mut edit: F,
) -> AppResult<Option<StudentRequest>>
where
    F: FnMut(&mut StudentRequest) -> Edit + Send,
{
    for _ in 0..MAX_CAS_ATTEMPTS {
        let Some(mut request) = store.find_student_request(service_id).await? else {
            return Ok(None);
        };
        match edit(&mut request) {
            Edit::Refuse => return Ok(None),
            Edit::Keep => return Ok(Some(request)),
            Edit::Write => {}
        }
        if let Some(saved) = store.update_student_request(&request).await? {
            return Ok(Some(saved));
        }
        tracing::debug!(service_id, "Student request changed concurrently, retrying");
    }
    Err(conflict("Student request", service_id).into())
}

//! Contract modification proposal models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gigbridge_core::error::CoreError;
use gigbridge_core::modification::{Consent, ModificationType};
use gigbridge_core::party::Party;
use gigbridge_core::terms::{TermsChange, WorkTerms};
use gigbridge_core::types::{DbId, Timestamp};

/// A row from the `contract_modifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractModification {
    pub modification_id: DbId,
    pub contract_id: DbId,
    /// Stored as text; parsed with [`ContractModification::kind`].
    pub modification_type: String,
    pub student_id: String,
    pub company_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub price_per_hour: f64,
    pub accepted_by_company: bool,
    pub accepted_by_student: bool,
    pub finished: bool,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ContractModification {
    pub fn kind(&self) -> Result<ModificationType, CoreError> {
        self.modification_type.parse()
    }

    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.price_per_hour)
    }

    pub fn consent(&self) -> Consent {
        Consent {
            accepted_by_company: self.accepted_by_company,
            accepted_by_student: self.accepted_by_student,
            finished: self.finished,
        }
    }

    pub fn set_consent(&mut self, consent: Consent) {
        self.accepted_by_company = consent.accepted_by_company;
        self.accepted_by_student = consent.accepted_by_student;
        self.finished = consent.finished;
    }

    /// The id of the given side of the underlying contract.
    pub fn party_id(&self, party: Party) -> &str {
        match party {
            Party::Company => &self.company_id,
            Party::Student => &self.student_id,
        }
    }
}

/// Insert payload for a new proposal, built by the modification protocol.
#[derive(Debug, Clone)]
pub struct CreateContractModification {
    pub contract_id: DbId,
    pub modification_type: ModificationType,
    pub student_id: String,
    pub company_id: String,
    pub terms: WorkTerms,
    pub consent: Consent,
}

/// Request body for proposing a change to a contract.
///
/// `modificationType` is kept as a string so an unknown value can be
/// reported as a validation error instead of a deserialisation failure.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeModification {
    pub modification_type: String,
    pub contract_id: DbId,
    pub proposed_by: Party,
    #[serde(flatten)]
    pub terms: TermsChange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propose_body_accepts_partial_terms() {
        let body: ProposeModification = serde_json::from_str(
            r#"{"modificationType": "EXTENSION", "contractId": 7, "proposedBy": "student",
                "totalHours": 300}"#,
        )
        .unwrap();
        assert_eq!(body.contract_id, 7);
        assert_eq!(body.proposed_by, Party::Student);
        assert_eq!(body.terms.total_hours, Some(300));
        assert_eq!(body.terms.hours_per_week, None);
    }
}

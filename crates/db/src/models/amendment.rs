//! Pre-contract amendments proposed by students against company requests.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gigbridge_core::terms::TermsChange;
use gigbridge_core::types::{DbId, Timestamp};

/// Sentinel stored in numeric columns for "leave unchanged".
pub const UNCHANGED: i32 = -1;

/// A row from the `company_request_modifications` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequestModification {
    pub modification_id: DbId,
    pub service_id: DbId,
    pub student_id: String,
    pub company_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub price_per_hour: f64,
    pub accepted_by_company: bool,
    pub created_at: Timestamp,
}

impl CompanyRequestModification {
    pub fn change(&self) -> TermsChange {
        TermsChange {
            hours_per_week: Some(self.hours_per_week).filter(|v| *v != UNCHANGED),
            total_hours: Some(self.total_hours).filter(|v| *v != UNCHANGED),
            price_per_hour: Some(self.price_per_hour).filter(|v| *v != f64::from(UNCHANGED)),
        }
    }
}

/// Request body for proposing an amendment to a company request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposeAmendment {
    pub student_id: String,
    #[serde(flatten)]
    pub change: TermsChange,
}

/// Insert payload for a new amendment.
#[derive(Debug, Clone)]
pub struct CreateCompanyRequestModification {
    pub service_id: DbId,
    pub student_id: String,
    pub company_id: String,
    pub change: TermsChange,
}

impl CreateCompanyRequestModification {
    pub fn hours_per_week(&self) -> i32 {
        self.change.hours_per_week.unwrap_or(UNCHANGED)
    }

    pub fn total_hours(&self) -> i32 {
        self.change.total_hours.unwrap_or(UNCHANGED)
    }

    pub fn price_per_hour(&self) -> f64 {
        self.change.price_per_hour.unwrap_or(f64::from(UNCHANGED))
    }
}

//! Company and student job request models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gigbridge_core::matching::{company_request_status, student_request_status, RequestStatus};
use gigbridge_core::terms::{TermsChange, WorkTerms};
use gigbridge_core::types::{DbId, Timestamp};

/// A row from the `company_requests` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRequest {
    pub service_id: DbId,
    pub company_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub rate_per_hour: f64,
    pub requirements: Vec<String>,
    pub is_accepted_by_company: bool,
    pub student_id_candidates: Vec<String>,
    /// The candidate chosen by the company, set when it accepts its own request.
    pub student_id: Option<String>,
    /// Set when the request is addressed to a single student.
    pub target_student_id: Option<String>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CompanyRequest {
    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.rate_per_hour)
    }

    pub fn set_terms(&mut self, terms: WorkTerms) {
        self.hours_per_week = terms.hours_per_week;
        self.total_hours = terms.total_hours;
        self.rate_per_hour = terms.price_per_hour;
    }

    pub fn status(&self) -> RequestStatus {
        company_request_status(&self.student_id_candidates)
    }
}

/// A row from the `student_requests` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRequest {
    pub service_id: DbId,
    pub student_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub rate_per_hour: f64,
    pub expertise: Vec<String>,
    pub is_accepted_by_student: bool,
    /// The company that accepted the request, if any.
    pub company_id: Option<String>,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StudentRequest {
    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.rate_per_hour)
    }

    pub fn set_terms(&mut self, terms: WorkTerms) {
        self.hours_per_week = terms.hours_per_week;
        self.total_hours = terms.total_hours;
        self.rate_per_hour = terms.price_per_hour;
    }

    pub fn status(&self) -> RequestStatus {
        student_request_status(self.company_id.as_deref())
    }
}

/// Either kind of open request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Request {
    Company(CompanyRequest),
    Student(StudentRequest),
}

impl Request {
    pub fn service_id(&self) -> DbId {
        match self {
            Request::Company(r) => r.service_id,
            Request::Student(r) => r.service_id,
        }
    }

    pub fn status(&self) -> RequestStatus {
        match self {
            Request::Company(r) => r.status(),
            Request::Student(r) => r.status(),
        }
    }
}

/// DTO for creating a company request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub company_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub rate_per_hour: f64,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub target_student_id: Option<String>,
}

impl CreateCompanyRequest {
    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.rate_per_hour)
    }
}

/// DTO for creating a student request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub rate_per_hour: f64,
    #[serde(default)]
    pub expertise: Vec<String>,
}

impl CreateStudentRequest {
    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.rate_per_hour)
    }
}

/// Partial update of a company request. Absent fields (or `-1`) are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[serde(default)]
    pub requirements: Option<Vec<String>>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub hours_per_week: Option<i32>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub total_hours: Option<i32>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub rate_per_hour: Option<f64>,
}

impl UpdateCompanyRequest {
    pub fn terms_change(&self) -> TermsChange {
        TermsChange {
            hours_per_week: self.hours_per_week,
            total_hours: self.total_hours,
            price_per_hour: self.rate_per_hour,
        }
    }
}

/// Partial update of a student request. Absent fields (or `-1`) are unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(default)]
    pub expertise: Option<Vec<String>>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub hours_per_week: Option<i32>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub total_hours: Option<i32>,
    #[serde(default, deserialize_with = "gigbridge_core::terms::sentinel")]
    pub rate_per_hour: Option<f64>,
}

impl UpdateStudentRequest {
    pub fn terms_change(&self) -> TermsChange {
        TermsChange {
            hours_per_week: self.hours_per_week,
            total_hours: self.total_hours,
            price_per_hour: self.rate_per_hour,
        }
    }
}

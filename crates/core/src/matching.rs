//! Request matching rules: candidate sets, request status, and range filters.
//!
//! A request moves `Open -> PendingOwnerAccept` when a counterpart shows
//! interest, back to `Open` when that interest is rejected, and is consumed
//! (deleted and replaced by a contract) once its owner accepts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::terms::WorkTerms;

// ---------------------------------------------------------------------------
// Candidate sets
// ---------------------------------------------------------------------------

/// Add `party_id` to `candidates` with set semantics.
///
/// Returns `true` if the set changed.
pub fn add_candidate(candidates: &mut Vec<String>, party_id: &str) -> bool {
    if candidates.iter().any(|c| c == party_id) {
        return false;
    }
    candidates.push(party_id.to_string());
    true
}

/// Remove `party_id` from `candidates`. Removing a non-member is a no-op.
///
/// Returns `true` if the set changed.
pub fn remove_candidate(candidates: &mut Vec<String>, party_id: &str) -> bool {
    let before = candidates.len();
    candidates.retain(|c| c != party_id);
    candidates.len() != before
}

/// Whether a student may become a candidate for a company request.
///
/// A targeted request only admits its target.
pub fn may_become_candidate(target_student_id: Option<&str>, student_id: &str) -> bool {
    target_student_id.map_or(true, |target| target == student_id)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Derived lifecycle status of an unresolved request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Open,
    PendingOwnerAccept,
}

pub fn company_request_status(candidates: &[String]) -> RequestStatus {
    if candidates.is_empty() {
        RequestStatus::Open
    } else {
        RequestStatus::PendingOwnerAccept
    }
}

pub fn student_request_status(company_id: Option<&str>) -> RequestStatus {
    match company_id {
        Some(id) if !id.is_empty() => RequestStatus::PendingOwnerAccept,
        _ => RequestStatus::Open,
    }
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// The numeric request field a range filter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    HoursPerWeek,
    TotalHours,
    /// Hourly rate.
    Salary,
}

impl FilterField {
    /// Column name in both request tables.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::HoursPerWeek => "hours_per_week",
            FilterField::TotalHours => "total_hours",
            FilterField::Salary => "rate_per_hour",
        }
    }

    /// The value of this field in `terms`.
    pub fn value(self, terms: &WorkTerms) -> f64 {
        match self {
            FilterField::HoursPerWeek => f64::from(terms.hours_per_week),
            FilterField::TotalHours => f64::from(terms.total_hours),
            FilterField::Salary => terms.price_per_hour,
        }
    }
}

impl FromStr for FilterField {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hoursPerWeek" => Ok(FilterField::HoursPerWeek),
            "totalHours" => Ok(FilterField::TotalHours),
            "salary" => Ok(FilterField::Salary),
            other => Err(CoreError::Validation(format!(
                "Invalid filter type '{other}'. Must be one of: hoursPerWeek, totalHours, salary"
            ))),
        }
    }
}

/// An inclusive, non-negative range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterRange {
    pub lower: f64,
    pub upper: f64,
}

impl FilterRange {
    /// `None` when `lower > upper` or `lower < 0`; callers return an empty
    /// result without touching storage.
    pub fn new(lower: f64, upper: f64) -> Option<Self> {
        if lower > upper || lower < 0.0 {
            return None;
        }
        Some(Self { lower, upper })
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// A filter request as posted by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTag {
    pub type_of_filtering: String,
    pub start_of_the_interval: f64,
    pub end_of_the_interval: f64,
}

impl FilterTag {
    /// Resolve into a field and range; `None` means "empty result".
    pub fn resolve(&self) -> Option<(FilterField, FilterRange)> {
        let range = FilterRange::new(self.start_of_the_interval, self.end_of_the_interval)?;
        let field = self.type_of_filtering.parse().ok()?;
        Some((field, range))
    }
}

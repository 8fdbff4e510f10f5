//! Contract models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use gigbridge_core::modification::ContractState;
use gigbridge_core::terms::WorkTerms;
use gigbridge_core::types::{DbId, Timestamp};

/// A row from the `contracts` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub contract_id: DbId,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub price_per_hour: f64,
    pub student_id: String,
    pub company_id: String,
    pub terminated: bool,
    /// The request this contract was agreed on, if it came from one.
    #[serde(default)]
    pub source_service_id: Option<DbId>,
    #[serde(default)]
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Contract {
    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.price_per_hour)
    }

    pub fn state(&self) -> ContractState {
        ContractState {
            terms: self.terms(),
            terminated: self.terminated,
        }
    }

    /// Overwrite hours, price, and the terminated flag from `state`.
    pub fn set_state(&mut self, state: ContractState) {
        self.hours_per_week = state.terms.hours_per_week;
        self.total_hours = state.terms.total_hours;
        self.price_per_hour = state.terms.price_per_hour;
        self.terminated = state.terminated;
    }
}

/// A contract to be created, in the contract service's wire format.
///
/// `contract_id` is assigned by the contract store and ignored on input.
/// A draft carrying `source_service_id` is stored at most once per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContract {
    #[serde(default)]
    pub contract_id: Option<DbId>,
    pub hours_per_week: i32,
    pub total_hours: i32,
    pub price_per_hour: f64,
    pub student_id: String,
    pub company_id: String,
    #[serde(default)]
    pub terminated: bool,
    #[serde(default)]
    pub source_service_id: Option<DbId>,
}

impl CreateContract {
    pub fn new(terms: WorkTerms, student_id: String, company_id: String) -> Self {
        Self {
            contract_id: None,
            hours_per_week: terms.hours_per_week,
            total_hours: terms.total_hours,
            price_per_hour: terms.price_per_hour,
            student_id,
            company_id,
            terminated: false,
            source_service_id: None,
        }
    }

    /// Tie the draft to the request it converts.
    pub fn for_request(self, service_id: DbId) -> Self {
        Self {
            source_service_id: Some(service_id),
            ..self
        }
    }

    pub fn terms(&self) -> WorkTerms {
        WorkTerms::new(self.hours_per_week, self.total_hours, self.price_per_hour)
    }
}

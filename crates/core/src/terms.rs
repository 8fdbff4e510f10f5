//! Numeric work terms shared by requests, contracts, and proposals.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::duration::is_legal_duration;
use crate::error::CoreError;

/// Hours and pay of a job offer, contract, or proposed change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WorkTerms {
    #[validate(range(min = 1, message = "hoursPerWeek must be positive"))]
    pub hours_per_week: i32,
    #[validate(range(min = 1, message = "totalHours must be positive"))]
    pub total_hours: i32,
    #[validate(range(exclusive_min = 0.0, message = "pricePerHour must be positive"))]
    pub price_per_hour: f64,
}

impl WorkTerms {
    pub fn new(hours_per_week: i32, total_hours: i32, price_per_hour: f64) -> Self {
        Self {
            hours_per_week,
            total_hours,
            price_per_hour,
        }
    }

    /// Reject non-positive hours or pay with a [`CoreError::Validation`].
    pub fn ensure_positive(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }

    /// Positive and within the legal contract duration.
    pub fn is_contractable(&self) -> bool {
        self.validate().is_ok() && is_legal_duration(self.hours_per_week, self.total_hours)
    }
}

/// A partial change to [`WorkTerms`]. `None` leaves the field unchanged.
///
/// Deserialises both an absent field and the legacy `-1` sentinel as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermsChange {
    #[serde(default, deserialize_with = "sentinel")]
    pub hours_per_week: Option<i32>,
    #[serde(default, deserialize_with = "sentinel")]
    pub total_hours: Option<i32>,
    #[serde(default, deserialize_with = "sentinel")]
    pub price_per_hour: Option<f64>,
}

impl TermsChange {
    /// Overwrite every present field.
    pub fn apply(&self, terms: WorkTerms) -> WorkTerms {
        WorkTerms {
            hours_per_week: self.hours_per_week.unwrap_or(terms.hours_per_week),
            total_hours: self.total_hours.unwrap_or(terms.total_hours),
            price_per_hour: self.price_per_hour.unwrap_or(terms.price_per_hour),
        }
    }

    /// Overwrite only the fields that are strictly positive; zero and
    /// negative values count as "leave unchanged".
    pub fn apply_positive(&self, terms: WorkTerms) -> WorkTerms {
        TermsChange {
            hours_per_week: self.hours_per_week.filter(|v| *v > 0),
            total_hours: self.total_hours.filter(|v| *v > 0),
            price_per_hour: self.price_per_hour.filter(|v| *v > 0.0),
        }
        .apply(terms)
    }
}

/// Deserialise an optional number where `-1` means "absent".
pub fn sentinel<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + PartialEq + From<i8>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.filter(|v| *v != T::from(-1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> WorkTerms {
        WorkTerms::new(10, 200, 25.0)
    }

    #[test]
    fn positive_terms_pass_validation() {
        assert!(base().ensure_positive().is_ok());
    }

    #[test]
    fn zero_hours_fail_validation() {
        let err = WorkTerms::new(0, 200, 25.0).ensure_positive().unwrap_err();
        assert!(err.to_string().contains("hoursPerWeek must be positive"));
    }

    #[test]
    fn zero_rate_fails_validation() {
        assert!(WorkTerms::new(10, 200, 0.0).ensure_positive().is_err());
    }

    #[test]
    fn contractable_requires_legal_duration() {
        assert!(base().is_contractable());
        assert!(!WorkTerms::new(25, 200, 25.0).is_contractable());
        assert!(!WorkTerms::new(5, 200, 25.0).is_contractable()); // 40 weeks
    }

    #[test]
    fn sentinel_and_absent_fields_mean_no_change() {
        let change: TermsChange =
            serde_json::from_str(r#"{"hoursPerWeek": -1, "pricePerHour": 30.5}"#).unwrap();
        assert_eq!(change.hours_per_week, None);
        assert_eq!(change.total_hours, None);
        assert_eq!(change.price_per_hour, Some(30.5));

        let updated = change.apply(base());
        assert_eq!(updated, WorkTerms::new(10, 200, 30.5));
    }

    #[test]
    fn all_sentinels_leave_terms_unchanged() {
        let change: TermsChange =
            serde_json::from_str(r#"{"hoursPerWeek": -1, "totalHours": -1}"#).unwrap();
        assert_eq!(change.price_per_hour, None);
        assert_eq!(change.apply(base()), base());
    }

    #[test]
    fn apply_positive_ignores_zero_values() {
        let change = TermsChange {
            hours_per_week: Some(0),
            total_hours: Some(300),
            price_per_hour: Some(0.0),
        };
        assert_eq!(change.apply_positive(base()), WorkTerms::new(10, 300, 25.0));
    }
}

//! Contract duration legality.
//!
//! A contract (or a proposed extension/modification of one) is legal when
//! it lasts at most six months and asks for at most twenty hours a week.
//! Months are derived from whole weeks: `total_hours / hours_per_week` is
//! integer division, truncated *before* dividing by four weeks per month.
//! Existing agreements were validated with exactly this arithmetic, so it
//! must not be "improved" into a floating-point division.

/// Maximum weekly workload a student may be contracted for.
pub const MAX_HOURS_PER_WEEK: i32 = 20;

/// Maximum contract length in months.
pub const MAX_CONTRACT_MONTHS: f64 = 6.0;

/// Weeks per month used by the duration calculation.
pub const WEEKS_PER_MONTH: f64 = 4.0;

/// Contract length in months, or `None` when `hours_per_week` is not positive.
pub fn contract_months(hours_per_week: i32, total_hours: i32) -> Option<f64> {
    if hours_per_week <= 0 {
        return None;
    }
    let whole_weeks = total_hours / hours_per_week;
    Some(f64::from(whole_weeks) / WEEKS_PER_MONTH)
}

/// Whether `(hours_per_week, total_hours)` may be used for a contract.
///
/// A non-positive `hours_per_week` is always illegal.
pub fn is_legal_duration(hours_per_week: i32, total_hours: i32) -> bool {
    match contract_months(hours_per_week, total_hours) {
        Some(months) => months <= MAX_CONTRACT_MONTHS && hours_per_week <= MAX_HOURS_PER_WEEK,
        None => false,
    }
}

//! Input validation for analytics queries and logged entries

use crate::errors::{AnalyticsError, AnalyticsResult};
use chrono::NaiveDate;

/// Widest range accepted by daily summary queries
pub const MAX_RANGE_DAYS: i64 = 92;

/// Smallest storable load; weights are kept to two decimal places
pub const MIN_WEIGHT_USED: f64 = 0.01;

/// Validate an inclusive date range before any store call is made
pub fn validate_range(start: NaiveDate, end: NaiveDate) -> AnalyticsResult<()> {
    if end < start {
        return Err(AnalyticsError::InvalidRange {
            start,
            end,
            reason: "end is before start".to_string(),
        });
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(AnalyticsError::InvalidRange {
            start,
            end,
            reason: format!("range spans {} days, at most {} allowed", days, MAX_RANGE_DAYS),
        });
    }
    Ok(())
}

/// Validate an optional load; absent means an unweighted set
pub fn validate_weight_used(weight: Option<f64>) -> AnalyticsResult<()> {
    match weight {
        Some(w) if w.is_nan() || w.is_infinite() => Err(AnalyticsError::Validation(
            "Weight must be a valid number".to_string(),
        )),
        Some(w) if w <= 0.0 => Err(AnalyticsError::Validation(
            "Weight must be positive".to_string(),
        )),
        Some(w) if w < MIN_WEIGHT_USED => Err(AnalyticsError::Validation(format!(
            "Weight must be at least {}",
            MIN_WEIGHT_USED
        ))),
        _ => Ok(()),
    }
}

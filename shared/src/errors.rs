//! Error types for the progress analytics engine

use chrono::NaiveDate;
use thiserror::Error;

/// Errors surfaced by the analytics engine and its session store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A referenced user or record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// The session store failed to answer; never retried by the engine
    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    /// A requested date window is malformed
    #[error("Invalid range {start}..={end}: {reason}")]
    InvalidRange {
        start: NaiveDate,
        end: NaiveDate,
        reason: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AnalyticsError {
    pub fn store_unavailable(err: impl std::fmt::Display) -> Self {
        AnalyticsError::StoreUnavailable(err.to_string())
    }
}

/// Result alias used across the engine
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_range_message_names_both_ends() {
        let err = AnalyticsError::InvalidRange {
            start: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            end: NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
            reason: "end is before start".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("2025-03-10"));
        assert!(message.contains("2025-03-02"));
        assert!(message.contains("end is before start"));
    }

    #[test]
    fn test_store_unavailable_wraps_display() {
        let err = AnalyticsError::store_unavailable("connection refused");
        assert_eq!(
            err,
            AnalyticsError::StoreUnavailable("connection refused".to_string())
        );
    }
}

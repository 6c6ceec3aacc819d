//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while aggregating, persisting and
//! reporting payroll data.

use chrono::NaiveDate;
use thiserror::Error;

use crate::store::StoreError;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "payslip",
///     id: 42,
/// };
/// assert_eq!(error.to_string(), "payslip 42 not found");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An employee, payslip or referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: &'static str,
        /// The identifier that was not found.
        id: u64,
    },

    /// A payslip already exists for the employee and period.
    #[error(
        "payslip already processed for employee {employee_id} for period {period_start} to {period_end}"
    )]
    AlreadyProcessed {
        /// The employee the payslip belongs to.
        employee_id: u64,
        /// First day of the period.
        period_start: NaiveDate,
        /// Last day of the period.
        period_end: NaiveDate,
    },

    /// An underlying read failed.
    #[error("failed to fetch {what}: {source}")]
    FetchFailed {
        /// Which fetch failed (e.g. "attendance records").
        what: &'static str,
        /// The originating store error.
        #[source]
        source: StoreError,
    },

    /// The final write of a record failed.
    #[error("failed to persist {what}: {source}")]
    PersistFailed {
        /// What was being written.
        what: &'static str,
        /// The originating store error.
        #[source]
        source: StoreError,
    },

    /// The acting identity may not access the target employee's data.
    #[error("actor {actor_id} may not access records of employee {employee_id}")]
    Forbidden {
        /// The acting user.
        actor_id: u64,
        /// The employee whose records were requested.
        employee_id: u64,
    },

    /// The operation spans all employees and needs the admin role.
    #[error("actor {actor_id} requires the admin role")]
    AdminRequired {
        /// The acting user.
        actor_id: u64,
    },

    /// A pay period whose end precedes its start.
    #[error("invalid pay period: end {end} is before start {start}")]
    InvalidPeriod {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// Request input failed validation.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what was wrong.
        message: String,
    },

    /// The run was cancelled before it could complete.
    #[error("payroll run cancelled")]
    Cancelled,

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_already_processed_displays_employee_and_period() {
        let error = EngineError::AlreadyProcessed {
            employee_id: 2,
            period_start: date(2026, 1, 1),
            period_end: date(2026, 1, 31),
        };
        assert_eq!(
            error.to_string(),
            "payslip already processed for employee 2 for period 2026-01-01 to 2026-01-31"
        );
    }

    #[test]
    fn test_fetch_failed_names_the_fetch_and_cause() {
        let error = EngineError::FetchFailed {
            what: "attendance records",
            source: StoreError::Backend("connection reset".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "failed to fetch attendance records: store backend error: connection reset"
        );
    }

    #[test]
    fn test_fetch_failed_exposes_source() {
        use std::error::Error;

        let error = EngineError::FetchFailed {
            what: "overtime requests",
            source: StoreError::Backend("timeout".to_string()),
        };
        assert!(error.source().is_some());
    }

    #[test]
    fn test_forbidden_displays_actor_and_target() {
        let error = EngineError::Forbidden {
            actor_id: 5,
            employee_id: 6,
        };
        assert_eq!(
            error.to_string(),
            "actor 5 may not access records of employee 6"
        );
    }

    #[test]
    fn test_validation_helper() {
        let error = EngineError::validation("amount", "must be greater than zero");
        assert_eq!(error.to_string(), "invalid amount: must be greater than zero");
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/payroll.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/payroll.yaml"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_cancelled() -> EngineResult<()> {
            Err(EngineError::Cancelled)
        }

        fn propagates_error() -> EngineResult<()> {
            returns_cancelled()?;
            Ok(())
        }

        assert!(matches!(propagates_error(), Err(EngineError::Cancelled)));
    }
}

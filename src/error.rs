//! Error types for the leave engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during accrual, settlement, and
//! reconciliation.

use rust_decimal::Decimal;
use thiserror::Error;

/// The main error type for the leave engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use leave_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Leave type code was not found in the policy configuration.
    #[error("Unknown leave type: {leave_type}")]
    UnknownLeaveType {
        /// The leave type code that was not found.
        leave_type: String,
    },

    /// The requested leave-year is invalid for the operation.
    #[error("Invalid leave-year {year}: {message}")]
    InvalidLeaveYear {
        /// The offending leave-year.
        year: i32,
        /// A description of what made the year invalid.
        message: String,
    },

    /// A leave request carried a non-positive day count.
    #[error("Invalid day count {days} on request '{request_id}'")]
    InvalidDayCount {
        /// The id of the offending request.
        request_id: String,
        /// The day count that was rejected.
        days: Decimal,
    },

    /// No employee record exists for the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The employee id that was not found.
        employee_id: String,
    },

    /// No leave request exists for the given id.
    #[error("Leave request not found: {request_id}")]
    RequestNotFound {
        /// The request id that was not found.
        request_id: String,
    },

    /// A per-type balance row was expected but does not exist.
    ///
    /// Raised when settlement runs against an employee/year that was never
    /// initialized.
    #[error("No balance row for employee '{employee_id}', leave type '{leave_type}', year {year}")]
    BalanceNotFound {
        /// The employee the balance belongs to.
        employee_id: String,
        /// The leave type code.
        leave_type: String,
        /// The leave-year.
        year: i32,
    },

    /// Settlement would drive the remaining balance below zero.
    #[error(
        "Balance exceeded for employee '{employee_id}', leave type '{leave_type}', year {year}: \
         requested {requested} with {remaining} remaining"
    )]
    BalanceExceeded {
        /// The employee the balance belongs to.
        employee_id: String,
        /// The leave type code.
        leave_type: String,
        /// The leave-year.
        year: i32,
        /// The day count the settlement asked for.
        requested: Decimal,
        /// The days remaining before the settlement.
        remaining: Decimal,
    },

    /// Reconciliation found drift it could not fully repair.
    #[error("Unresolved drift for employee '{employee_id}', year {year}: {message}")]
    UnresolvedDrift {
        /// The employee the drift belongs to.
        employee_id: String,
        /// The leave-year.
        year: i32,
        /// A description of what could not be repaired.
        message: String,
    },

    /// A bucket lock or transaction could not be acquired in time.
    ///
    /// Safe to retry.
    #[error("Concurrency error: {message}")]
    Concurrency {
        /// A description of the contention.
        message: String,
    },
}

impl EngineError {
    /// Returns true if the operation that produced this error can be
    /// retried without any change to its inputs.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Concurrency { .. })
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_unknown_leave_type_displays_code() {
        let error = EngineError::UnknownLeaveType {
            leave_type: "sabbatical".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown leave type: sabbatical");
    }

    #[test]
    fn test_config_parse_displays_path_and_message() {
        let error = EngineError::ConfigParse {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_balance_not_found_displays_full_context() {
        let error = EngineError::BalanceNotFound {
            employee_id: "emp_042".to_string(),
            leave_type: "casual".to_string(),
            year: 2025,
        };
        assert_eq!(
            error.to_string(),
            "No balance row for employee 'emp_042', leave type 'casual', year 2025"
        );
    }

    #[test]
    fn test_balance_exceeded_displays_requested_and_remaining() {
        let error = EngineError::BalanceExceeded {
            employee_id: "emp_042".to_string(),
            leave_type: "casual".to_string(),
            year: 2025,
            requested: Decimal::from_str("1").unwrap(),
            remaining: Decimal::from_str("0").unwrap(),
        };
        assert!(error.to_string().contains("requested 1 with 0 remaining"));
    }

    #[test]
    fn test_invalid_day_count_displays_request_id() {
        let error = EngineError::InvalidDayCount {
            request_id: "req_007".to_string(),
            days: Decimal::ZERO,
        };
        assert_eq!(error.to_string(), "Invalid day count 0 on request 'req_007'");
    }

    #[test]
    fn test_concurrency_is_retryable() {
        let error = EngineError::Concurrency {
            message: "bucket lock timed out".to_string(),
        };
        assert!(error.is_retryable());
    }

    #[test]
    fn test_balance_exceeded_is_not_retryable() {
        let error = EngineError::BalanceExceeded {
            employee_id: "emp_001".to_string(),
            leave_type: "sick".to_string(),
            year: 2025,
            requested: Decimal::ONE,
            remaining: Decimal::ZERO,
        };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_employee_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound {
                employee_id: "emp_missing".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_employee_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}

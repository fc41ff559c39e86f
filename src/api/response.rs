//! Response types for the leave engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::{AggregateLeaveBalance, LeaveTypeBalance};

/// Body of `GET /balances/{employee_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalancesResponse {
    /// The employee the balances belong to.
    pub employee_id: String,
    /// The leave-year that was read.
    pub leave_year: i32,
    /// The per-type ledger rows.
    pub balances: Vec<LeaveTypeBalance>,
    /// The aggregate summary row, if the ledger was initialized.
    pub aggregate: Option<AggregateLeaveBalance>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParse { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::UnknownLeaveType { leave_type } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "UNKNOWN_LEAVE_TYPE",
                    format!("Unknown leave type: {}", leave_type),
                    format!(
                        "The leave type '{}' is not present in the policy configuration",
                        leave_type
                    ),
                ),
            },
            EngineError::InvalidLeaveYear { year, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(format!("Invalid leave-year {}: {}", year, message)),
            },
            EngineError::InvalidDayCount { request_id, days } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(format!(
                    "Invalid day count {} on request '{}'",
                    days, request_id
                )),
            },
            EngineError::EmployeeNotFound { employee_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "EMPLOYEE_NOT_FOUND",
                    format!("Employee not found: {}", employee_id),
                ),
            },
            EngineError::RequestNotFound { request_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::new(
                    "REQUEST_NOT_FOUND",
                    format!("Leave request not found: {}", request_id),
                ),
            },
            EngineError::BalanceNotFound {
                employee_id,
                leave_type,
                year,
            } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "BALANCE_NOT_FOUND",
                    format!(
                        "No balance row for employee '{}', leave type '{}', year {}",
                        employee_id, leave_type, year
                    ),
                    "Run initialize for this employee/year before settling",
                ),
            },
            EngineError::BalanceExceeded {
                employee_id,
                leave_type,
                year,
                requested,
                remaining,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "BALANCE_EXCEEDED",
                    format!(
                        "Balance exceeded for employee '{}', leave type '{}', year {}",
                        employee_id, leave_type, year
                    ),
                    format!("Requested {} days with {} remaining", requested, remaining),
                ),
            },
            EngineError::UnresolvedDrift {
                employee_id,
                year,
                message,
            } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    "UNRESOLVED_DRIFT",
                    format!(
                        "Unresolved drift for employee '{}', year {}",
                        employee_id, year
                    ),
                    message,
                ),
            },
            EngineError::Concurrency { message } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "CONCURRENCY",
                    "Operation timed out on a busy balance; retry",
                    message,
                ),
            },
        }
    }
}

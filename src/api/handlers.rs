//! HTTP request handlers for the leave engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tracing::{info, warn};
use uuid::Uuid;

use super::request::{
    AccrualRunRequest, BalancesQuery, InitializeRequest, ReconciliationRequest, SettlementRequest,
};
use super::response::{ApiError, ApiErrorResponse, BalancesResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/accruals/run", post(accrue_handler))
        .route("/balances/initialize", post(initialize_handler))
        .route("/balances/:employee_id", get(balances_handler))
        .route("/settlements", post(settle_handler))
        .route("/reconciliations", post(reconcile_handler))
        .with_state(state)
}

/// Unwraps a JSON body, turning rejections into error responses.
fn parse_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: Uuid,
) -> Result<T, Response> {
    match payload {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(correlation_id = %correlation_id, error = %body_text, "JSON data error");
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(correlation_id = %correlation_id, error = %err, "JSON syntax error");
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => ApiError::new(
                    "MISSING_CONTENT_TYPE",
                    "Content-Type must be application/json",
                ),
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            Err((StatusCode::BAD_REQUEST, Json(error)).into_response())
        }
    }
}

/// Handler for POST /accruals/run.
///
/// Runs monthly accrual for one employee, or for every active employee
/// when the employee id is "all".
async fn accrue_handler(
    State(state): State<AppState>,
    payload: Result<Json<AccrualRunRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        as_of = %request.as_of,
        "Processing accrual run"
    );

    if request.employee_id == "all" {
        match state.engine().accrue_all(request.as_of) {
            Ok(report) => {
                info!(
                    correlation_id = %correlation_id,
                    succeeded = report.succeeded,
                    failed = report.failures.len(),
                    "Batch accrual completed"
                );
                (StatusCode::OK, Json(report)).into_response()
            }
            Err(err) => engine_error(correlation_id, err),
        }
    } else {
        match state.engine().accrue_month(&request.employee_id, request.as_of) {
            Ok(accrual) => (StatusCode::OK, Json(accrual)).into_response(),
            Err(err) => engine_error(correlation_id, err),
        }
    }
}

/// Handler for POST /balances/initialize.
async fn initialize_handler(
    State(state): State<AppState>,
    payload: Result<Json<InitializeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        year = request.year,
        "Processing ledger initialization"
    );

    match state
        .engine()
        .initialize(&request.employee_id, request.year, request.as_of)
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for GET /balances/{employee_id}.
async fn balances_handler(
    State(state): State<AppState>,
    Path(employee_id): Path<String>,
    Query(query): Query<BalancesQuery>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    match state.engine().balances(&employee_id, query.year) {
        Ok((balances, aggregate)) => (
            StatusCode::OK,
            Json(BalancesResponse {
                employee_id,
                leave_year: query.year,
                balances,
                aggregate,
            }),
        )
            .into_response(),
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /settlements.
///
/// Applies a leave request's current workflow status to the ledger.
async fn settle_handler(
    State(state): State<AppState>,
    payload: Result<Json<SettlementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        request_id = %request.request_id,
        "Processing settlement"
    );

    match state
        .engine()
        .settle(&request.request_id, request.allow_negative_balance)
    {
        Ok(outcome) => {
            info!(
                correlation_id = %correlation_id,
                request_id = %outcome.request_id,
                action = ?outcome.action,
                "Settlement completed"
            );
            (StatusCode::OK, Json(outcome)).into_response()
        }
        Err(err) => engine_error(correlation_id, err),
    }
}

/// Handler for POST /reconciliations.
///
/// Audits one employee, or every employee when the employee id is "all",
/// and returns the drift report.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconciliationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match parse_json(payload, correlation_id) {
        Ok(request) => request,
        Err(response) => return response,
    };

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        year = request.year,
        "Processing reconciliation"
    );

    if request.employee_id == "all" {
        match state.engine().reconcile_all(request.year) {
            Ok(report) => (StatusCode::OK, Json(report)).into_response(),
            Err(err) => engine_error(correlation_id, err),
        }
    } else {
        match state.engine().reconcile(&request.employee_id, request.year) {
            Ok(report) => (StatusCode::OK, Json(report)).into_response(),
            Err(err) => engine_error(correlation_id, err),
        }
    }
}

/// Logs an engine error and converts it to an HTTP response.
fn engine_error(correlation_id: Uuid, err: crate::error::EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Operation failed");
    let api_error: ApiErrorResponse = err.into();
    api_error.into_response()
}

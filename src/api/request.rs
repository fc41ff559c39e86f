//! Request types for the leave engine API.

use chrono::NaiveDate;
use serde::Deserialize;

/// Body for `POST /accruals/run`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccrualRunRequest {
    /// Employee id, or "all" for a batch run over active employees.
    pub employee_id: String,
    /// The date whose service month is being accrued.
    pub as_of: NaiveDate,
}

/// Body for `POST /balances/initialize`.
#[derive(Debug, Clone, Deserialize)]
pub struct InitializeRequest {
    /// The employee to backfill.
    pub employee_id: String,
    /// The leave-year to create rows for.
    pub year: i32,
    /// Observation date for accrued-to-date allocation.
    pub as_of: NaiveDate,
}

/// Body for `POST /settlements`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementRequest {
    /// The leave request to settle.
    pub request_id: String,
    /// Allow the settlement to drive `remaining` below zero.
    #[serde(default)]
    pub allow_negative_balance: bool,
}

/// Body for `POST /reconciliations`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconciliationRequest {
    /// Employee id, or "all" for a batch audit.
    pub employee_id: String,
    /// The leave-year to reconcile.
    pub year: i32,
}

/// Query string for `GET /balances/{employee_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct BalancesQuery {
    /// The leave-year to read.
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_accrual_run_request() {
        let json = r#"{ "employee_id": "all", "as_of": "2025-07-31" }"#;
        let request: AccrualRunRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "all");
        assert_eq!(request.as_of, NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
    }

    #[test]
    fn test_settlement_request_defaults_override_off() {
        let json = r#"{ "request_id": "req_001" }"#;
        let request: SettlementRequest = serde_json::from_str(json).unwrap();
        assert!(!request.allow_negative_balance);
    }

    #[test]
    fn test_deserialize_reconciliation_request() {
        let json = r#"{ "employee_id": "emp_001", "year": 2025 }"#;
        let request: ReconciliationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.employee_id, "emp_001");
        assert_eq!(request.year, 2025);
    }
}

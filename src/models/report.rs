//! Structured operation reports.
//!
//! Batch operations return these as data instead of only logging, so the
//! surrounding application can surface per-record failures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a settlement call actually did to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action")]
pub enum SettlementAction {
    /// The approved day count was applied to the ledger.
    Applied {
        /// Days added to `taken`.
        days: Decimal,
    },
    /// A previously applied settlement was reversed.
    Reversed {
        /// Days removed from `taken`.
        days: Decimal,
    },
    /// Nothing changed.
    NoEffect {
        /// Why the ledger was left untouched.
        reason: String,
    },
}

/// Result of settling one leave request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// The request that was settled.
    pub request_id: String,
    /// The employee the request belongs to.
    pub employee_id: String,
    /// The leave type code.
    pub leave_type: String,
    /// The leave-year the request was bucketed into.
    pub leave_year: i32,
    /// What happened to the ledger.
    pub action: SettlementAction,
}

/// Result of initializing the ledger for one employee/year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeOutcome {
    /// The employee whose ledger was initialized.
    pub employee_id: String,
    /// The leave-year.
    pub leave_year: i32,
    /// True if rows were created; false if they already existed.
    pub created: bool,
}

/// Drift report returned by reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// The employee that was reconciled.
    pub employee_id: String,
    /// The leave-year.
    pub leave_year: i32,
    /// Absolute difference between the aggregate `total_taken` and the sum
    /// of per-type `taken` before any correction.
    pub drift_before: Decimal,
    /// True if a correction was written back.
    pub corrected: bool,
    /// Leave types with approved days but no balance row to correct.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
}

/// One failed record within a batch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// The employee the failure belongs to.
    pub employee_id: String,
    /// The error, rendered for the report.
    pub error: String,
}

/// Aggregate result of a batch operation.
///
/// A batch never aborts wholesale: failures are collected here and the
/// remaining records are still processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of employees processed successfully.
    pub succeeded: usize,
    /// The records that failed, with per-record context.
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    /// A report with nothing processed yet.
    pub fn empty() -> Self {
        Self {
            succeeded: 0,
            failures: Vec::new(),
        }
    }

    /// Total number of records the batch touched.
    pub fn processed(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

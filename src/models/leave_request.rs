//! Leave request model and status state machine.
//!
//! Leave requests are owned by the external workflow module. The engine
//! only reacts to status transitions into [`LeaveStatus::Approved`],
//! [`LeaveStatus::Rejected`], or [`LeaveStatus::Cancelled`].

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The dates a leave request covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeavePeriod {
    /// A single day of leave.
    SingleDay {
        /// The day of leave.
        date: NaiveDate,
    },
    /// An inclusive range of days.
    DateRange {
        /// The first day of leave.
        from: NaiveDate,
        /// The last day of leave (inclusive).
        to: NaiveDate,
    },
}

impl LeavePeriod {
    /// Returns the first day of leave.
    ///
    /// This date decides which leave-year the request settles against.
    pub fn first_day(&self) -> NaiveDate {
        match self {
            LeavePeriod::SingleDay { date } => *date,
            LeavePeriod::DateRange { from, .. } => *from,
        }
    }

    /// Returns the last day of leave (inclusive).
    pub fn last_day(&self) -> NaiveDate {
        match self {
            LeavePeriod::SingleDay { date } => *date,
            LeavePeriod::DateRange { to, .. } => *to,
        }
    }
}

/// Workflow status of a leave request.
///
/// Transitions consumed by the engine: `Pending -> Approved | Rejected`,
/// `Approved -> Cancelled`. Only `Approved` ever has settlement applied;
/// the other states are terminal with respect to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting a workflow decision; no ledger effect yet.
    Pending,
    /// Approved by the workflow; settlement applies the day count.
    Approved,
    /// Rejected by the workflow; never settled.
    Rejected,
    /// Cancelled after a prior approval; settlement reverses the deltas.
    Cancelled,
}

impl LeaveStatus {
    /// Returns true if the workflow may move a request from `self` to `to`.
    pub fn can_transition_to(self, to: LeaveStatus) -> bool {
        matches!(
            (self, to),
            (LeaveStatus::Pending, LeaveStatus::Approved)
                | (LeaveStatus::Pending, LeaveStatus::Rejected)
                | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }
}

/// A leave request as consumed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Unique identifier for the request.
    pub id: String,
    /// The employee taking the leave.
    pub employee_id: String,
    /// The leave type code (e.g. "casual").
    pub leave_type: String,
    /// The dates being taken.
    pub period: LeavePeriod,
    /// Total leave days consumed, in half-day resolution (e.g. 2.5).
    pub total_days: Decimal,
    /// Current workflow status.
    pub status: LeaveStatus,
    /// When the request was created.
    ///
    /// Not used for year bucketing: the leave-year is derived from the
    /// leave dates themselves.
    pub created_at: NaiveDate,
}

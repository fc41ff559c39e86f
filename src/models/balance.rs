//! Balance ledger rows: monthly accruals, per-type balances, and the
//! aggregate summary.
//!
//! [`LeaveTypeBalance`] carries the ledger invariant
//! `remaining == allocated - taken`; every write path that touches
//! `allocated` or `taken` must recompute `remaining` in the same
//! transaction. [`AggregateLeaveBalance`] must always equal the sums of the
//! per-type rows for the same employee/year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entitlement accrued for one employee in one month of a leave-year.
///
/// One row per (employee, leave-year, month). Rows for closed months are
/// never mutated; only the current open month may be recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyAccrual {
    /// The employee the accrual belongs to.
    pub employee_id: String,
    /// The leave-year, identified by its starting calendar year.
    pub leave_year: i32,
    /// Service-month index within the leave-year, 1-based.
    pub month: u32,
    /// Days credited in this month, per leave type code.
    pub per_type_accrued: BTreeMap<String, Decimal>,
    /// Cumulative days credited up to and including this month, per leave
    /// type code.
    pub per_type_cumulative: BTreeMap<String, Decimal>,
}

/// One per-type row of the leave ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeBalance {
    /// The employee the balance belongs to.
    pub employee_id: String,
    /// The leave-year, identified by its starting calendar year.
    pub leave_year: i32,
    /// The leave type code (e.g. "sick").
    pub leave_type: String,
    /// Days allocated so far this leave-year.
    pub allocated: Decimal,
    /// Days consumed by settled approved requests.
    pub taken: Decimal,
    /// Days still available: always `allocated - taken`.
    pub remaining: Decimal,
}

impl LeaveTypeBalance {
    /// Creates a fresh row with nothing taken yet.
    pub fn opened(
        employee_id: impl Into<String>,
        leave_year: i32,
        leave_type: impl Into<String>,
        allocated: Decimal,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            leave_year,
            leave_type: leave_type.into(),
            allocated,
            taken: Decimal::ZERO,
            remaining: allocated,
        }
    }

    /// Sets `allocated` and re-derives `remaining`, holding `taken` fixed.
    pub fn reallocate(&mut self, allocated: Decimal) {
        self.allocated = allocated;
        self.remaining = self.allocated - self.taken;
    }

    /// Adds `days` to `taken` and re-derives `remaining`.
    ///
    /// Negative `days` reverses a prior settlement.
    pub fn consume(&mut self, days: Decimal) {
        self.taken += days;
        self.remaining = self.allocated - self.taken;
    }

    /// Overwrites `taken` and re-derives `remaining`.
    pub fn set_taken(&mut self, taken: Decimal) {
        self.taken = taken;
        self.remaining = self.allocated - self.taken;
    }

    /// Returns true if the row satisfies its invariant.
    pub fn is_consistent(&self) -> bool {
        self.remaining == self.allocated - self.taken
    }
}

/// Summary row kept in lockstep with the per-type ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateLeaveBalance {
    /// The employee the balance belongs to.
    pub employee_id: String,
    /// The leave-year, identified by its starting calendar year.
    pub leave_year: i32,
    /// Sum of `allocated` across the per-type rows.
    pub total_allocated: Decimal,
    /// Sum of `taken` across the per-type rows.
    pub total_taken: Decimal,
    /// Sum of `remaining` across the per-type rows.
    pub total_remaining: Decimal,
}

impl AggregateLeaveBalance {
    /// Builds the aggregate as the sums over a set of per-type rows.
    pub fn from_rows<'a, I>(employee_id: &str, leave_year: i32, rows: I) -> Self
    where
        I: IntoIterator<Item = &'a LeaveTypeBalance>,
    {
        let mut aggregate = Self {
            employee_id: employee_id.to_string(),
            leave_year,
            total_allocated: Decimal::ZERO,
            total_taken: Decimal::ZERO,
            total_remaining: Decimal::ZERO,
        };
        for row in rows {
            aggregate.total_allocated += row.allocated;
            aggregate.total_taken += row.taken;
            aggregate.total_remaining += row.remaining;
        }
        aggregate
    }
}

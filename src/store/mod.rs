//! Data access layer for the leave ledger.
//!
//! The engine holds no durable state of its own: everything lives behind
//! the [`LedgerStore`] trait, injected into the engine rather than reached
//! through a global connection pool. Each public engine operation runs as
//! one [`LedgerTx`] write scope over a single (employee, leave-year)
//! bucket; staged writes become visible only on [`LedgerTx::commit`], and
//! dropping the scope without committing discards them.
//!
//! Two scopes over the same bucket serialize; a scope that cannot acquire
//! its bucket within the store's timeout fails with a retryable
//! [`Concurrency`](crate::error::EngineError::Concurrency) error.

mod memory;

pub use memory::{MemoryStore, MemoryTx};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{
    AggregateLeaveBalance, Employee, LeaveRequest, LeaveTypeBalance, MonthlyAccrual,
};

/// Record of an applied settlement, keyed by request id.
///
/// Kept alongside the balances so re-settling an approved request is a
/// no-op and cancelling reverses exactly the days that were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementRecord {
    /// The settled request.
    pub request_id: String,
    /// The leave type the days were booked against.
    pub leave_type: String,
    /// The days applied to `taken` (zero for non-deductible types).
    pub days: Decimal,
}

/// Transactional write scope over one (employee, leave-year) bucket.
///
/// Reads observe staged writes within the same scope.
pub trait LedgerTx {
    /// Reads one per-type balance row.
    fn type_balance(&self, leave_type: &str) -> Option<LeaveTypeBalance>;

    /// Reads all per-type balance rows in the bucket.
    fn type_balances(&self) -> Vec<LeaveTypeBalance>;

    /// Stages an insert-or-update of a per-type balance row.
    fn put_type_balance(&mut self, row: LeaveTypeBalance);

    /// Reads the aggregate summary row.
    fn aggregate(&self) -> Option<AggregateLeaveBalance>;

    /// Stages an insert-or-update of the aggregate summary row.
    fn put_aggregate(&mut self, row: AggregateLeaveBalance);

    /// Reads the accrual row for a service month.
    fn monthly_accrual(&self, month: u32) -> Option<MonthlyAccrual>;

    /// Returns the highest service month with an accrual row, if any.
    fn latest_accrual_month(&self) -> Option<u32>;

    /// Stages an insert-or-update of a monthly accrual row.
    fn put_monthly_accrual(&mut self, row: MonthlyAccrual);

    /// Reads the settlement record for a request id.
    fn settlement(&self, request_id: &str) -> Option<SettlementRecord>;

    /// Stages an insert-or-update of a settlement record.
    fn put_settlement(&mut self, record: SettlementRecord);

    /// Stages removal of a settlement record.
    fn remove_settlement(&mut self, request_id: &str);

    /// Stages removal of every settlement record in the bucket.
    fn clear_settlements(&mut self);

    /// Publishes the staged writes.
    fn commit(self) -> EngineResult<()>;
}

/// The data-access interface injected into the engine.
///
/// Employee records and leave requests are owned by external collaborators
/// and exposed read-only; the ledger tables (balances, accruals, aggregate,
/// settlement records) are owned by the engine and written through
/// [`LedgerTx`] scopes.
pub trait LedgerStore: Send + Sync {
    /// The transactional write scope type.
    type Tx<'a>: LedgerTx
    where
        Self: 'a;

    /// Reads one employee from the directory.
    fn employee(&self, employee_id: &str) -> EngineResult<Option<Employee>>;

    /// Reads every employee in the directory.
    fn employees(&self) -> EngineResult<Vec<Employee>>;

    /// Reads the employees included in batch accrual runs.
    fn active_employees(&self) -> EngineResult<Vec<Employee>>;

    /// Reads one leave request from the workflow module.
    fn leave_request(&self, request_id: &str) -> EngineResult<Option<LeaveRequest>>;

    /// Reads every leave request belonging to an employee.
    fn requests_for_employee(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>>;

    /// Reads the per-type balance rows for an employee/year.
    fn type_balances(&self, employee_id: &str, year: i32) -> EngineResult<Vec<LeaveTypeBalance>>;

    /// Reads the aggregate summary row for an employee/year.
    fn aggregate(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<Option<AggregateLeaveBalance>>;

    /// Reads the monthly accrual rows for an employee/year.
    fn monthly_accruals(&self, employee_id: &str, year: i32) -> EngineResult<Vec<MonthlyAccrual>>;

    /// Opens a serialized transactional write scope over one bucket.
    fn begin(&self, employee_id: &str, year: i32) -> EngineResult<Self::Tx<'_>>;
}

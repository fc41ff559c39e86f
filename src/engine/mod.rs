//! The leave engine: accrual, ledger maintenance, settlement, and
//! reconciliation over an injected [`LedgerStore`].
//!
//! Each public operation executes as one transactional write scope with
//! explicit commit; partial writes are never visible. Batch variants
//! isolate per-employee failures into a [`BatchReport`](crate::models::BatchReport)
//! instead of aborting wholesale.

mod accrual;
mod ledger;
mod reconcile;
mod settlement;

pub use reconcile::{DRIFT_EPSILON, ReconcileBatchReport};

use crate::config::PolicyConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::Employee;
use crate::store::LedgerStore;

/// The leave accrual and balance reconciliation engine.
///
/// Generic over the data-access interface so the same operations run
/// against the in-memory store in tests and a relational backend in
/// production.
///
/// # Example
///
/// ```
/// use leave_engine::config::PolicyConfig;
/// use leave_engine::engine::LeaveEngine;
/// use leave_engine::store::MemoryStore;
///
/// let engine = LeaveEngine::new(MemoryStore::new(), PolicyConfig::standard());
/// assert_eq!(engine.config().leave_year_start_month(), 4);
/// ```
pub struct LeaveEngine<S> {
    store: S,
    config: PolicyConfig,
}

impl<S: LedgerStore> LeaveEngine<S> {
    /// Creates an engine over the given store and policy.
    pub fn new(store: S, config: PolicyConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the policy configuration.
    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    /// Looks up an employee, surfacing a `NotFound` error with context.
    pub(crate) fn require_employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }
}

//! In-memory ledger store.
//!
//! Backs the engine with process-local state: per-bucket mutexes give the
//! same serialization guarantees the relational backend gets from row
//! locks, and each write scope stages a copy of its bucket so commit and
//! rollback behave like a real transaction.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex, RwLock};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AggregateLeaveBalance, Employee, LeaveRequest, LeaveTypeBalance, MonthlyAccrual,
};

use super::{LedgerStore, LedgerTx, SettlementRecord};

/// Everything the ledger owns for one (employee, leave-year) bucket.
#[derive(Debug, Clone, Default)]
struct BucketState {
    type_balances: BTreeMap<String, LeaveTypeBalance>,
    aggregate: Option<AggregateLeaveBalance>,
    accruals: BTreeMap<u32, MonthlyAccrual>,
    settlements: BTreeMap<String, SettlementRecord>,
}

type BucketKey = (String, i32);
type Bucket = Arc<Mutex<BucketState>>;

/// An in-memory [`LedgerStore`] implementation.
///
/// Employee records and leave requests are seeded through the `upsert_*`
/// methods by the surrounding application (or by tests); the ledger tables
/// are only written through transactions.
///
/// # Example
///
/// ```
/// use leave_engine::models::{Employee, EmployeeStatus};
/// use leave_engine::store::{LedgerStore, MemoryStore};
/// use chrono::NaiveDate;
///
/// let store = MemoryStore::new();
/// store.upsert_employee(Employee {
///     id: "emp_001".to_string(),
///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
///     status: EmployeeStatus::Active,
/// });
/// assert!(store.employee("emp_001").unwrap().is_some());
/// ```
#[derive(Debug)]
pub struct MemoryStore {
    employees: RwLock<BTreeMap<String, Employee>>,
    requests: RwLock<BTreeMap<String, LeaveRequest>>,
    buckets: RwLock<BTreeMap<BucketKey, Bucket>>,
    lock_timeout: Duration,
}

/// Default time a write scope waits for its bucket lock.
const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

impl MemoryStore {
    /// Creates an empty store with the default lock timeout.
    pub fn new() -> Self {
        Self::with_lock_timeout(DEFAULT_LOCK_TIMEOUT)
    }

    /// Creates an empty store with a custom bucket lock timeout.
    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            employees: RwLock::new(BTreeMap::new()),
            requests: RwLock::new(BTreeMap::new()),
            buckets: RwLock::new(BTreeMap::new()),
            lock_timeout,
        }
    }

    /// Inserts or replaces an employee record.
    pub fn upsert_employee(&self, employee: Employee) {
        self.employees
            .write()
            .insert(employee.id.clone(), employee);
    }

    /// Inserts or replaces a leave request.
    ///
    /// The workflow module calls this on every status transition; the
    /// engine then reacts through `settle`.
    pub fn upsert_leave_request(&self, request: LeaveRequest) {
        self.requests.write().insert(request.id.clone(), request);
    }

    fn bucket(&self, employee_id: &str, year: i32) -> Bucket {
        let key = (employee_id.to_string(), year);
        if let Some(bucket) = self.buckets.read().get(&key) {
            return Arc::clone(bucket);
        }
        let mut buckets = self.buckets.write();
        Arc::clone(buckets.entry(key).or_default())
    }

    fn read_bucket<T>(
        &self,
        employee_id: &str,
        year: i32,
        f: impl FnOnce(&BucketState) -> T,
    ) -> EngineResult<T> {
        let bucket = self.bucket(employee_id, year);
        let guard = bucket
            .try_lock_for(self.lock_timeout)
            .ok_or_else(|| EngineError::Concurrency {
                message: format!(
                    "timed out reading bucket for employee '{}', year {}",
                    employee_id, year
                ),
            })?;
        Ok(f(&guard))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write scope over one in-memory bucket.
///
/// Holds the bucket mutex for its whole lifetime and mutates a staged copy;
/// `commit` swaps the staged copy in, and dropping the scope without
/// committing leaves the bucket untouched.
pub struct MemoryTx {
    guard: ArcMutexGuard<RawMutex, BucketState>,
    staged: BucketState,
}

impl std::fmt::Debug for MemoryTx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryTx")
            .field("staged", &self.staged)
            .finish_non_exhaustive()
    }
}

impl LedgerTx for MemoryTx {
    fn type_balance(&self, leave_type: &str) -> Option<LeaveTypeBalance> {
        self.staged.type_balances.get(leave_type).cloned()
    }

    fn type_balances(&self) -> Vec<LeaveTypeBalance> {
        self.staged.type_balances.values().cloned().collect()
    }

    fn put_type_balance(&mut self, row: LeaveTypeBalance) {
        self.staged
            .type_balances
            .insert(row.leave_type.clone(), row);
    }

    fn aggregate(&self) -> Option<AggregateLeaveBalance> {
        self.staged.aggregate.clone()
    }

    fn put_aggregate(&mut self, row: AggregateLeaveBalance) {
        self.staged.aggregate = Some(row);
    }

    fn monthly_accrual(&self, month: u32) -> Option<MonthlyAccrual> {
        self.staged.accruals.get(&month).cloned()
    }

    fn latest_accrual_month(&self) -> Option<u32> {
        self.staged.accruals.keys().next_back().copied()
    }

    fn put_monthly_accrual(&mut self, row: MonthlyAccrual) {
        self.staged.accruals.insert(row.month, row);
    }

    fn settlement(&self, request_id: &str) -> Option<SettlementRecord> {
        self.staged.settlements.get(request_id).cloned()
    }

    fn put_settlement(&mut self, record: SettlementRecord) {
        self.staged
            .settlements
            .insert(record.request_id.clone(), record);
    }

    fn remove_settlement(&mut self, request_id: &str) {
        self.staged.settlements.remove(request_id);
    }

    fn clear_settlements(&mut self) {
        self.staged.settlements.clear();
    }

    fn commit(mut self) -> EngineResult<()> {
        *self.guard = self.staged;
        Ok(())
    }
}

impl LedgerStore for MemoryStore {
    type Tx<'a>
        = MemoryTx
    where
        Self: 'a;

    fn employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.read().get(employee_id).cloned())
    }

    fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.read().values().cloned().collect())
    }

    fn active_employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self
            .employees
            .read()
            .values()
            .filter(|e| e.is_active())
            .cloned()
            .collect())
    }

    fn leave_request(&self, request_id: &str) -> EngineResult<Option<LeaveRequest>> {
        Ok(self.requests.read().get(request_id).cloned())
    }

    fn requests_for_employee(&self, employee_id: &str) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self
            .requests
            .read()
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn type_balances(&self, employee_id: &str, year: i32) -> EngineResult<Vec<LeaveTypeBalance>> {
        self.read_bucket(employee_id, year, |bucket| {
            bucket.type_balances.values().cloned().collect()
        })
    }

    fn aggregate(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<Option<AggregateLeaveBalance>> {
        self.read_bucket(employee_id, year, |bucket| bucket.aggregate.clone())
    }

    fn monthly_accruals(&self, employee_id: &str, year: i32) -> EngineResult<Vec<MonthlyAccrual>> {
        self.read_bucket(employee_id, year, |bucket| {
            bucket.accruals.values().cloned().collect()
        })
    }

    fn begin(&self, employee_id: &str, year: i32) -> EngineResult<MemoryTx> {
        let bucket = self.bucket(employee_id, year);
        let guard = Mutex::try_lock_arc_for(&bucket, self.lock_timeout).ok_or_else(|| {
            EngineError::Concurrency {
                message: format!(
                    "timed out locking bucket for employee '{}', year {}",
                    employee_id, year
                ),
            }
        })?;
        let staged = (*guard).clone();
        Ok(MemoryTx { guard, staged })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmployeeStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn test_employee(id: &str, status: EmployeeStatus) -> Employee {
        Employee {
            id: id.to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            status,
        }
    }

    #[test]
    fn test_upsert_and_read_employee() {
        let store = MemoryStore::new();
        store.upsert_employee(test_employee("emp_001", EmployeeStatus::Active));
        let employee = store.employee("emp_001").unwrap().unwrap();
        assert_eq!(employee.id, "emp_001");
        assert!(store.employee("emp_999").unwrap().is_none());
    }

    #[test]
    fn test_active_employees_excludes_inactive() {
        let store = MemoryStore::new();
        store.upsert_employee(test_employee("emp_001", EmployeeStatus::Active));
        store.upsert_employee(test_employee("emp_002", EmployeeStatus::Inactive));
        let active = store.active_employees().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "emp_001");
        assert_eq!(store.employees().unwrap().len(), 2);
    }

    #[test]
    fn test_committed_writes_are_visible() {
        let store = MemoryStore::new();
        let mut tx = store.begin("emp_001", 2025).unwrap();
        tx.put_type_balance(LeaveTypeBalance::opened("emp_001", 2025, "sick", dec("2")));
        tx.commit().unwrap();

        let rows = store.type_balances("emp_001", 2025).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].leave_type, "sick");
    }

    #[test]
    fn test_dropped_scope_rolls_back() {
        let store = MemoryStore::new();
        {
            let mut tx = store.begin("emp_001", 2025).unwrap();
            tx.put_type_balance(LeaveTypeBalance::opened("emp_001", 2025, "sick", dec("2")));
            // dropped without commit
        }
        assert!(store.type_balances("emp_001", 2025).unwrap().is_empty());
    }

    #[test]
    fn test_scope_reads_its_own_staged_writes() {
        let store = MemoryStore::new();
        let mut tx = store.begin("emp_001", 2025).unwrap();
        tx.put_type_balance(LeaveTypeBalance::opened("emp_001", 2025, "sick", dec("2")));
        assert!(tx.type_balance("sick").is_some());
        assert_eq!(tx.type_balances().len(), 1);
    }

    #[test]
    fn test_contended_bucket_times_out_with_concurrency_error() {
        let store = MemoryStore::with_lock_timeout(Duration::from_millis(10));
        let _held = store.begin("emp_001", 2025).unwrap();

        match store.begin("emp_001", 2025) {
            Err(EngineError::Concurrency { .. }) => {}
            other => panic!("Expected Concurrency, got {:?}", other),
        }
    }

    #[test]
    fn test_different_buckets_do_not_contend() {
        let store = MemoryStore::with_lock_timeout(Duration::from_millis(10));
        let _first = store.begin("emp_001", 2025).unwrap();
        assert!(store.begin("emp_001", 2026).is_ok());
        assert!(store.begin("emp_002", 2025).is_ok());
    }

    #[test]
    fn test_latest_accrual_month_tracks_highest_row() {
        let store = MemoryStore::new();
        let mut tx = store.begin("emp_001", 2025).unwrap();
        assert_eq!(tx.latest_accrual_month(), None);
        for month in [2u32, 4, 3] {
            tx.put_monthly_accrual(MonthlyAccrual {
                employee_id: "emp_001".to_string(),
                leave_year: 2025,
                month,
                per_type_accrued: BTreeMap::new(),
                per_type_cumulative: BTreeMap::new(),
            });
        }
        assert_eq!(tx.latest_accrual_month(), Some(4));
    }

    #[test]
    fn test_settlement_records_round_trip() {
        let store = MemoryStore::new();
        let mut tx = store.begin("emp_001", 2025).unwrap();
        tx.put_settlement(SettlementRecord {
            request_id: "req_001".to_string(),
            leave_type: "casual".to_string(),
            days: dec("2"),
        });
        assert!(tx.settlement("req_001").is_some());
        tx.remove_settlement("req_001");
        assert!(tx.settlement("req_001").is_none());
    }

    #[test]
    fn test_requests_for_employee_filters_by_owner() {
        let store = MemoryStore::new();
        store.upsert_leave_request(LeaveRequest {
            id: "req_001".to_string(),
            employee_id: "emp_001".to_string(),
            leave_type: "sick".to_string(),
            period: crate::models::LeavePeriod::SingleDay {
                date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            },
            total_days: dec("1"),
            status: crate::models::LeaveStatus::Pending,
            created_at: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
        });
        assert_eq!(store.requests_for_employee("emp_001").unwrap().len(), 1);
        assert!(store.requests_for_employee("emp_002").unwrap().is_empty());
    }
}

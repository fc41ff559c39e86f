//! Monthly accrual generation.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::calculation::{
    accrued_in_month, accrued_to_date, leave_year_of, service_month_index,
};
use crate::error::EngineResult;
use crate::models::{
    AggregateLeaveBalance, BatchFailure, BatchReport, LeaveTypeBalance, MonthlyAccrual,
};
use crate::store::{LedgerStore, LedgerTx};

use super::LeaveEngine;

impl<S: LedgerStore> LeaveEngine<S> {
    /// Accrues the service month containing `as_of` for one employee.
    ///
    /// For every accruing leave type the cumulative entitlement is
    /// `min(index * monthly_rate, annual_cap)`. The operation upserts the
    /// [`MonthlyAccrual`] row for (employee, leave-year, month), recomputes
    /// each per-type `allocated` (holding `taken` fixed), and refreshes the
    /// aggregate, all in one transaction.
    ///
    /// Idempotent: re-running for the same month stores identical values.
    /// A month is closed once a later month's row exists; re-running a
    /// closed month that already has a row is a no-op returning the stored
    /// row.
    pub fn accrue_month(&self, employee_id: &str, as_of: NaiveDate) -> EngineResult<MonthlyAccrual> {
        self.require_employee(employee_id)?;

        let start_month = self.config.leave_year_start_month();
        let year = leave_year_of(as_of, start_month);
        let month = service_month_index(as_of, as_of, start_month);

        let mut tx = self.store.begin(employee_id, year)?;

        if let Some(existing) = tx.monthly_accrual(month) {
            let closed = tx.latest_accrual_month().is_some_and(|latest| latest > month);
            if closed {
                return Ok(existing);
            }
        }

        let mut per_type_accrued = BTreeMap::new();
        let mut per_type_cumulative = BTreeMap::new();
        for (code, policy) in self.config.accruing() {
            let cumulative = accrued_to_date(policy, month);
            per_type_accrued.insert(code.clone(), accrued_in_month(policy, month));
            per_type_cumulative.insert(code.clone(), cumulative);

            let mut row = tx.type_balance(code).unwrap_or_else(|| {
                LeaveTypeBalance::opened(employee_id, year, code, cumulative)
            });
            row.reallocate(cumulative);
            tx.put_type_balance(row);
        }

        let accrual = MonthlyAccrual {
            employee_id: employee_id.to_string(),
            leave_year: year,
            month,
            per_type_accrued,
            per_type_cumulative,
        };
        tx.put_monthly_accrual(accrual.clone());

        let rows = tx.type_balances();
        tx.put_aggregate(AggregateLeaveBalance::from_rows(employee_id, year, &rows));
        tx.commit()?;

        info!(
            employee_id,
            leave_year = year,
            month,
            "monthly accrual recorded"
        );
        Ok(accrual)
    }

    /// Accrues the service month containing `as_of` for every active
    /// employee.
    ///
    /// A failure on one employee is recorded in the report and does not
    /// abort processing of the rest. Re-running within the same month
    /// never double-accrues.
    pub fn accrue_all(&self, as_of: NaiveDate) -> EngineResult<BatchReport> {
        let employees = self.store.active_employees()?;
        let mut report = BatchReport::empty();

        for employee in employees {
            match self.accrue_month(&employee.id, as_of) {
                Ok(_) => report.succeeded += 1,
                Err(error) => {
                    warn!(
                        employee_id = %employee.id,
                        error = %error,
                        "monthly accrual failed; continuing batch"
                    );
                    report.failures.push(BatchFailure {
                        employee_id: employee.id,
                        error: error.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failures.len(),
            "batch accrual finished"
        );
        Ok(report)
    }
}

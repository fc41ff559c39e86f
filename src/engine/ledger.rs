//! Ledger initialization and recomputation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::calculation::{accrued_to_date, leave_year_bounds, leave_year_of, service_month_index};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AggregateLeaveBalance, InitializeOutcome, LeaveTypeBalance,
};
use crate::store::{LedgerStore, LedgerTx};

use super::LeaveEngine;

impl<S: LedgerStore> LeaveEngine<S> {
    /// Creates the per-type balance rows for an employee who has none for
    /// the given leave-year.
    ///
    /// Each accruing leave type gets `allocated = accrued-to-date` (as of
    /// `as_of`), `taken = 0`, `remaining = allocated`, plus the matching
    /// aggregate row. Safe to call when rows already exist: that is a
    /// no-op, never an overwrite, which is what lets it backfill employees
    /// who predate the per-type ledger.
    pub fn initialize(
        &self,
        employee_id: &str,
        year: i32,
        as_of: NaiveDate,
    ) -> EngineResult<InitializeOutcome> {
        self.require_employee(employee_id)?;
        let months = self.service_months_for(year, as_of)?;

        let mut tx = self.store.begin(employee_id, year)?;
        if !tx.type_balances().is_empty() {
            return Ok(InitializeOutcome {
                employee_id: employee_id.to_string(),
                leave_year: year,
                created: false,
            });
        }

        for (code, policy) in self.config.accruing() {
            tx.put_type_balance(LeaveTypeBalance::opened(
                employee_id,
                year,
                code,
                accrued_to_date(policy, months),
            ));
        }

        let rows = tx.type_balances();
        tx.put_aggregate(AggregateLeaveBalance::from_rows(employee_id, year, &rows));
        tx.commit()?;

        info!(employee_id, leave_year = year, months, "ledger initialized");
        Ok(InitializeOutcome {
            employee_id: employee_id.to_string(),
            leave_year: year,
            created: true,
        })
    }

    /// Re-derives `allocated` from the entitlement formula and recomputes
    /// `remaining = allocated - taken`, leaving `taken` untouched.
    ///
    /// Used after a policy change or a manual correction. Missing rows for
    /// accruing types are created with nothing taken.
    pub fn recompute(
        &self,
        employee_id: &str,
        year: i32,
        as_of: NaiveDate,
    ) -> EngineResult<Vec<LeaveTypeBalance>> {
        self.require_employee(employee_id)?;
        let months = self.service_months_for(year, as_of)?;

        let mut tx = self.store.begin(employee_id, year)?;
        for (code, policy) in self.config.accruing() {
            let mut row = tx
                .type_balance(code)
                .unwrap_or_else(|| LeaveTypeBalance::opened(employee_id, year, code, Decimal::ZERO));
            row.reallocate(accrued_to_date(policy, months));
            tx.put_type_balance(row);
        }

        let rows = tx.type_balances();
        tx.put_aggregate(AggregateLeaveBalance::from_rows(employee_id, year, &rows));
        tx.commit()?;

        info!(employee_id, leave_year = year, "ledger recomputed");
        Ok(rows)
    }

    /// Reads the per-type rows and the aggregate for an employee/year.
    pub fn balances(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<(Vec<LeaveTypeBalance>, Option<AggregateLeaveBalance>)> {
        self.require_employee(employee_id)?;
        let rows = self.store.type_balances(employee_id, year)?;
        let aggregate = self.store.aggregate(employee_id, year)?;
        Ok((rows, aggregate))
    }

    /// Completed service months of leave-year `year` as of `as_of`.
    ///
    /// A year that has not started yet is an error; a finished year clamps
    /// to a full twelve months.
    fn service_months_for(&self, year: i32, as_of: NaiveDate) -> EngineResult<u32> {
        let start_month = self.config.leave_year_start_month();
        if year > leave_year_of(as_of, start_month) {
            return Err(EngineError::InvalidLeaveYear {
                year,
                message: format!("leave-year has not started as of {}", as_of),
            });
        }
        let (year_start, _) = leave_year_bounds(year, start_month);
        Ok(service_month_index(year_start, as_of, start_month))
    }
}

//! Drift detection and repair between the aggregate and the per-type
//! ledger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::calculation::leave_year_of;
use crate::error::EngineResult;
use crate::models::{
    AggregateLeaveBalance, BatchFailure, LeaveStatus, ReconcileReport,
};
use crate::store::{LedgerStore, LedgerTx, SettlementRecord};

use super::LeaveEngine;

/// Largest aggregate/ledger difference treated as rounding noise rather
/// than drift: one hundredth of a day.
pub const DRIFT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Result of reconciling every employee for one leave-year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileBatchReport {
    /// Per-employee drift reports, in processing order.
    pub reports: Vec<ReconcileReport>,
    /// Employees that could not be reconciled.
    pub failures: Vec<BatchFailure>,
}

impl<S: LedgerStore> LeaveEngine<S> {
    /// Compares the aggregate `total_taken` against the sum of per-type
    /// `taken` and repairs the ledger when they disagree.
    ///
    /// On drift beyond [`DRIFT_EPSILON`], every per-type `taken` is
    /// recomputed from the authoritative set of currently-Approved
    /// requests (bucketed by the leave-year of their leave dates),
    /// `remaining` is re-derived, the aggregate is rewritten as the
    /// corrected sums, and the settlement records are rebuilt to match.
    ///
    /// Safe to run repeatedly: a second run with no new requests reports
    /// zero drift. Approved days for a leave type with no balance row
    /// cannot be corrected and are listed in the report's `unresolved`.
    pub fn reconcile(&self, employee_id: &str, year: i32) -> EngineResult<ReconcileReport> {
        self.require_employee(employee_id)?;

        let mut tx = self.store.begin(employee_id, year)?;
        let rows = tx.type_balances();
        let ledger_taken: Decimal = rows.iter().map(|r| r.taken).sum();
        let aggregate_taken = tx
            .aggregate()
            .map(|a| a.total_taken)
            .unwrap_or(Decimal::ZERO);
        let drift_before = (aggregate_taken - ledger_taken).abs();

        if drift_before <= DRIFT_EPSILON {
            return Ok(ReconcileReport {
                employee_id: employee_id.to_string(),
                leave_year: year,
                drift_before,
                corrected: false,
                unresolved: Vec::new(),
            });
        }

        warn!(
            employee_id,
            leave_year = year,
            %aggregate_taken,
            %ledger_taken,
            "balance drift detected; recomputing from approved requests"
        );

        let approved = self.approved_days_by_type(employee_id, year)?;

        let mut unresolved = Vec::new();
        tx.clear_settlements();
        for (leave_type, settlements) in &approved {
            if rows.iter().any(|r| &r.leave_type == leave_type) {
                for record in settlements {
                    tx.put_settlement(record.clone());
                }
            } else {
                warn!(
                    employee_id,
                    leave_year = year,
                    %leave_type,
                    "approved days with no balance row; leaving uncorrected"
                );
                unresolved.push(leave_type.clone());
            }
        }

        for mut row in rows {
            let taken = approved
                .get(&row.leave_type)
                .map(|records| records.iter().map(|r| r.days).sum())
                .unwrap_or(Decimal::ZERO);
            row.set_taken(taken);
            tx.put_type_balance(row);
        }

        let corrected_rows = tx.type_balances();
        tx.put_aggregate(AggregateLeaveBalance::from_rows(
            employee_id,
            year,
            &corrected_rows,
        ));
        tx.commit()?;

        let corrected = unresolved.is_empty();
        info!(
            employee_id,
            leave_year = year,
            %drift_before,
            corrected,
            "reconciliation finished"
        );
        Ok(ReconcileReport {
            employee_id: employee_id.to_string(),
            leave_year: year,
            drift_before,
            corrected,
            unresolved,
        })
    }

    /// Reconciles every employee for the given leave-year.
    ///
    /// Per-employee failures are collected and do not abort the batch.
    pub fn reconcile_all(&self, year: i32) -> EngineResult<ReconcileBatchReport> {
        let employees = self.store.employees()?;
        let mut report = ReconcileBatchReport {
            reports: Vec::new(),
            failures: Vec::new(),
        };

        for employee in employees {
            match self.reconcile(&employee.id, year) {
                Ok(employee_report) => report.reports.push(employee_report),
                Err(error) => {
                    warn!(
                        employee_id = %employee.id,
                        error = %error,
                        "reconciliation failed; continuing batch"
                    );
                    report.failures.push(BatchFailure {
                        employee_id: employee.id,
                        error: error.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }

    /// Settlement records for the currently-Approved deductible requests
    /// of one employee, bucketed into `year` by leave date.
    fn approved_days_by_type(
        &self,
        employee_id: &str,
        year: i32,
    ) -> EngineResult<BTreeMap<String, Vec<SettlementRecord>>> {
        let start_month = self.config.leave_year_start_month();
        let mut by_type: BTreeMap<String, Vec<SettlementRecord>> = BTreeMap::new();

        for request in self.store.requests_for_employee(employee_id)? {
            if request.status != LeaveStatus::Approved {
                continue;
            }
            if leave_year_of(request.period.first_day(), start_month) != year {
                continue;
            }
            let deductible = self
                .config
                .policy(&request.leave_type)
                .map(|p| p.deductible)
                .unwrap_or(false);
            if !deductible {
                continue;
            }
            by_type
                .entry(request.leave_type.clone())
                .or_default()
                .push(SettlementRecord {
                    request_id: request.id.clone(),
                    leave_type: request.leave_type.clone(),
                    days: request.total_days,
                });
        }

        Ok(by_type)
    }
}

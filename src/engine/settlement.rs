//! Settlement of leave-request outcomes against the ledger.

use rust_decimal::Decimal;
use tracing::info;

use crate::calculation::leave_year_of;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AggregateLeaveBalance, LeaveRequest, LeaveStatus, SettlementAction, SettlementOutcome,
};
use crate::store::{LedgerStore, LedgerTx, SettlementRecord};

use super::LeaveEngine;

impl<S: LedgerStore> LeaveEngine<S> {
    /// Applies a leave request's current workflow status to the ledger.
    ///
    /// - `Approved`: adds `total_days` to the matching per-type `taken`,
    ///   subtracts from `remaining`, and mirrors both deltas on the
    ///   aggregate. Idempotent per request id: a request that already has a
    ///   settlement record is not applied twice.
    /// - `Rejected` / `Pending`: no ledger effect.
    /// - `Cancelled`: reverses a previously applied settlement by exactly
    ///   the recorded days; a request that was never settled is a no-op.
    ///
    /// The year bucket is the leave-year containing the first leave day,
    /// not the request's creation timestamp. Settlement refuses to drive
    /// `remaining` below zero unless `allow_negative_balance` is set.
    pub fn settle(
        &self,
        request_id: &str,
        allow_negative_balance: bool,
    ) -> EngineResult<SettlementOutcome> {
        let request =
            self.store
                .leave_request(request_id)?
                .ok_or_else(|| EngineError::RequestNotFound {
                    request_id: request_id.to_string(),
                })?;
        self.require_employee(&request.employee_id)?;
        let policy = self.config.policy(&request.leave_type)?;

        if request.total_days <= Decimal::ZERO {
            return Err(EngineError::InvalidDayCount {
                request_id: request.id.clone(),
                days: request.total_days,
            });
        }

        let start_month = self.config.leave_year_start_month();
        let year = leave_year_of(request.period.first_day(), start_month);

        let mut tx = self.store.begin(&request.employee_id, year)?;

        let action = match request.status {
            LeaveStatus::Pending => SettlementAction::NoEffect {
                reason: "request is still pending".to_string(),
            },
            LeaveStatus::Rejected => SettlementAction::NoEffect {
                reason: "rejected requests are never settled".to_string(),
            },
            LeaveStatus::Approved => {
                if let Some(existing) = tx.settlement(&request.id) {
                    SettlementAction::NoEffect {
                        reason: format!("already settled for {} days", existing.days),
                    }
                } else if !policy.deductible {
                    tx.put_settlement(SettlementRecord {
                        request_id: request.id.clone(),
                        leave_type: request.leave_type.clone(),
                        days: Decimal::ZERO,
                    });
                    SettlementAction::NoEffect {
                        reason: format!("leave type '{}' is non-deductible", request.leave_type),
                    }
                } else {
                    self.apply_approval(&mut tx, &request, year, allow_negative_balance)?
                }
            }
            LeaveStatus::Cancelled => match tx.settlement(&request.id) {
                Some(record) => {
                    if record.days > Decimal::ZERO {
                        let mut row = tx.type_balance(&record.leave_type).ok_or_else(|| {
                            EngineError::BalanceNotFound {
                                employee_id: request.employee_id.clone(),
                                leave_type: record.leave_type.clone(),
                                year,
                            }
                        })?;
                        row.consume(-record.days);
                        tx.put_type_balance(row);
                        self.shift_aggregate(&mut tx, &request.employee_id, year, -record.days);
                    }
                    tx.remove_settlement(&request.id);
                    SettlementAction::Reversed { days: record.days }
                }
                None => SettlementAction::NoEffect {
                    reason: "no prior settlement to reverse".to_string(),
                },
            },
        };

        tx.commit()?;
        info!(
            request_id = %request.id,
            employee_id = %request.employee_id,
            leave_year = year,
            action = ?action,
            "settlement finished"
        );
        Ok(SettlementOutcome {
            request_id: request.id.clone(),
            employee_id: request.employee_id.clone(),
            leave_type: request.leave_type.clone(),
            leave_year: year,
            action,
        })
    }

    fn apply_approval(
        &self,
        tx: &mut S::Tx<'_>,
        request: &LeaveRequest,
        year: i32,
        allow_negative_balance: bool,
    ) -> EngineResult<SettlementAction> {
        let mut row = tx.type_balance(&request.leave_type).ok_or_else(|| {
            EngineError::BalanceNotFound {
                employee_id: request.employee_id.clone(),
                leave_type: request.leave_type.clone(),
                year,
            }
        })?;

        if row.remaining < request.total_days && !allow_negative_balance {
            return Err(EngineError::BalanceExceeded {
                employee_id: request.employee_id.clone(),
                leave_type: request.leave_type.clone(),
                year,
                requested: request.total_days,
                remaining: row.remaining,
            });
        }

        row.consume(request.total_days);
        tx.put_type_balance(row);
        self.shift_aggregate(tx, &request.employee_id, year, request.total_days);
        tx.put_settlement(SettlementRecord {
            request_id: request.id.clone(),
            leave_type: request.leave_type.clone(),
            days: request.total_days,
        });
        Ok(SettlementAction::Applied {
            days: request.total_days,
        })
    }

    /// Propagates a `taken` delta onto the aggregate row.
    fn shift_aggregate(&self, tx: &mut S::Tx<'_>, employee_id: &str, year: i32, days: Decimal) {
        let aggregate = match tx.aggregate() {
            Some(mut aggregate) => {
                aggregate.total_taken += days;
                aggregate.total_remaining -= days;
                aggregate
            }
            // No summary row yet: rebuild from the per-type rows, which
            // already carry the delta.
            None => AggregateLeaveBalance::from_rows(employee_id, year, &tx.type_balances()),
        };
        tx.put_aggregate(aggregate);
    }
}

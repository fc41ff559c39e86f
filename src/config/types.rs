//! Policy configuration types.
//!
//! Accrual rates, annual caps, and the leave-year start month are policy,
//! not code: they are modeled as data deserialized from YAML files so a
//! policy change never requires redeploying logic.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Metadata about the leave policy, from `policy.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyMetadata {
    /// The human-readable name of the policy.
    pub name: String,
    /// The version or effective date of the policy.
    pub version: String,
    /// The calendar month (1-12) the leave-year starts in.
    pub leave_year_start_month: u32,
}

/// Accrual and consumption rules for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeaveTypePolicy {
    /// The human-readable name of the leave type.
    pub name: String,
    /// Days credited per completed service month.
    pub monthly_rate: Decimal,
    /// Maximum days credited within one leave-year.
    pub annual_cap: Decimal,
    /// Whether monthly accrual credits this type. Defaults to true.
    #[serde(default = "default_true")]
    pub accrues: bool,
    /// Whether approved leave of this type consumes the ledger balance.
    /// Defaults to true; unpaid leave sets this to false.
    #[serde(default = "default_true")]
    pub deductible: bool,
}

fn default_true() -> bool {
    true
}

/// Leave types configuration file structure (`leave_types.yaml`).
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveTypesConfig {
    /// Map of leave type code to its policy.
    pub leave_types: BTreeMap<String, LeaveTypePolicy>,
}

/// The complete leave policy loaded from a configuration directory.
#[derive(Debug, Clone)]
pub struct PolicyConfig {
    metadata: PolicyMetadata,
    leave_types: BTreeMap<String, LeaveTypePolicy>,
}

impl PolicyConfig {
    /// Creates a policy from its component parts.
    ///
    /// Returns `InvalidLeaveYear` if the start month is outside 1-12.
    pub fn new(
        metadata: PolicyMetadata,
        leave_types: BTreeMap<String, LeaveTypePolicy>,
    ) -> EngineResult<Self> {
        if !(1..=12).contains(&metadata.leave_year_start_month) {
            return Err(EngineError::InvalidLeaveYear {
                year: 0,
                message: format!(
                    "leave_year_start_month must be 1-12, got {}",
                    metadata.leave_year_start_month
                ),
            });
        }
        Ok(Self {
            metadata,
            leave_types,
        })
    }

    /// The standard policy shipped with the engine: Earned/Annual Leave at
    /// 1.25 days per month capped at 15, Sick and Casual Leave at 0.5 per
    /// month capped at 6, and non-deductible Unpaid Leave, with the
    /// leave-year starting in April.
    pub fn standard() -> Self {
        let mut leave_types = BTreeMap::new();
        leave_types.insert(
            "earned_annual".to_string(),
            LeaveTypePolicy {
                name: "Earned/Annual Leave".to_string(),
                monthly_rate: Decimal::new(125, 2),
                annual_cap: Decimal::new(15, 0),
                accrues: true,
                deductible: true,
            },
        );
        leave_types.insert(
            "sick".to_string(),
            LeaveTypePolicy {
                name: "Sick Leave".to_string(),
                monthly_rate: Decimal::new(5, 1),
                annual_cap: Decimal::new(6, 0),
                accrues: true,
                deductible: true,
            },
        );
        leave_types.insert(
            "casual".to_string(),
            LeaveTypePolicy {
                name: "Casual Leave".to_string(),
                monthly_rate: Decimal::new(5, 1),
                annual_cap: Decimal::new(6, 0),
                accrues: true,
                deductible: true,
            },
        );
        leave_types.insert(
            "unpaid".to_string(),
            LeaveTypePolicy {
                name: "Unpaid Leave".to_string(),
                monthly_rate: Decimal::ZERO,
                annual_cap: Decimal::ZERO,
                accrues: false,
                deductible: false,
            },
        );

        Self {
            metadata: PolicyMetadata {
                name: "Standard Leave Policy".to_string(),
                version: "2025-04-01".to_string(),
                leave_year_start_month: 4,
            },
            leave_types,
        }
    }

    /// Returns the policy metadata.
    pub fn metadata(&self) -> &PolicyMetadata {
        &self.metadata
    }

    /// Returns the calendar month (1-12) the leave-year starts in.
    pub fn leave_year_start_month(&self) -> u32 {
        self.metadata.leave_year_start_month
    }

    /// Returns all leave type policies, keyed by code.
    pub fn leave_types(&self) -> &BTreeMap<String, LeaveTypePolicy> {
        &self.leave_types
    }

    /// Looks up the policy for a leave type code.
    pub fn policy(&self, code: &str) -> EngineResult<&LeaveTypePolicy> {
        self.leave_types
            .get(code)
            .ok_or_else(|| EngineError::UnknownLeaveType {
                leave_type: code.to_string(),
            })
    }

    /// Iterates the leave types that accrue monthly entitlement.
    pub fn accruing(&self) -> impl Iterator<Item = (&String, &LeaveTypePolicy)> {
        self.leave_types.iter().filter(|(_, p)| p.accrues)
    }
}

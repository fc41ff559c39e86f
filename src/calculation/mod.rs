//! Pure calculation functions for the leave engine.
//!
//! This module contains the leave-year calendar (mapping dates to fiscal
//! leave-years and service-month indexes) and the entitlement accrual
//! formula. Nothing here touches the store or performs I/O.

mod calendar;
mod entitlement;

pub use calendar::{MONTHS_PER_LEAVE_YEAR, leave_year_bounds, leave_year_of, service_month_index};
pub use entitlement::{accrued_by_type, accrued_in_month, accrued_to_date};

//! Employee model and related types.
//!
//! The employee directory is owned by the surrounding application; the
//! engine only reads the fields it needs to accrue and settle leave.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Employment status as seen by the leave engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    /// Currently employed; included in batch accrual runs.
    Active,
    /// No longer employed; skipped by batch accrual runs.
    Inactive,
}

/// A reference to an employee in the external directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The date the employee was hired.
    pub hire_date: NaiveDate,
    /// Whether the employee is currently active.
    pub status: EmployeeStatus,
}

impl Employee {
    /// Returns true if the employee is active.
    ///
    /// # Examples
    ///
    /// ```
    /// use leave_engine::models::{Employee, EmployeeStatus};
    /// use chrono::NaiveDate;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
    ///     status: EmployeeStatus::Active,
    /// };
    /// assert!(employee.is_active());
    /// ```
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee(status: EmployeeStatus) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            status,
        }
    }

    #[test]
    fn test_deserialize_active_employee() {
        let json = r#"{
            "id": "emp_001",
            "hire_date": "2023-06-01",
            "status": "active"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "emp_001");
        assert_eq!(
            employee.hire_date,
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap()
        );
        assert_eq!(employee.status, EmployeeStatus::Active);
    }

    #[test]
    fn test_serialize_employee_round_trip() {
        let employee = create_test_employee(EmployeeStatus::Inactive);
        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: Employee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }

    #[test]
    fn test_is_active_returns_true_for_active() {
        assert!(create_test_employee(EmployeeStatus::Active).is_active());
    }

    #[test]
    fn test_is_active_returns_false_for_inactive() {
        assert!(!create_test_employee(EmployeeStatus::Inactive).is_active());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Active).unwrap(),
            "\"active\""
        );
        assert_eq!(
            serde_json::to_string(&EmployeeStatus::Inactive).unwrap(),
            "\"inactive\""
        );
    }
}

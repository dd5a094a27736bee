use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Row};
use crate::error::DataAccessError;

/// A person on the payroll.
///
/// `salary` is fixed-point with two decimal places and never negative.
/// `performance_rating` is conventionally 0.0–5.0 but the range is not enforced.
/// Project assignments live in [`EmployeeProject`] rows, not on the employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub department_id: i64,
    pub salary: Decimal,
    pub performance_rating: f64,
}

/// Input for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployeeInput {
    pub name: String,
    pub department_id: i64,
    pub salary: Decimal,
    #[serde(default)]
    pub performance_rating: f64,
}

/// Assignment of one employee to one project.
///
/// The pair is the identity; there are no other attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeProject {
    pub employee_id: i64,
    pub project_id: i64,
}

impl FromRow for Employee {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            id: row.int("id")?,
            name: row.text("name")?,
            department_id: row.int("department_id")?,
            salary: row.money("salary_cents")?,
            performance_rating: row.real("performance_rating")?,
        })
    }
}

impl FromRow for EmployeeProject {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            employee_id: row.int("employee_id")?,
            project_id: row.int("project_id")?,
        })
    }
}

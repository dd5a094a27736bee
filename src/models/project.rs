use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Row};
use crate::error::DataAccessError;

/// A unit of work with a deadline and a budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub deadline: NaiveDateTime,
    /// Fixed-point, two decimal places, never negative.
    pub budget: Decimal,
}

/// Input for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub deadline: NaiveDateTime,
    pub budget: Decimal,
}

impl FromRow for Project {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            id: row.int("id")?,
            name: row.text("name")?,
            deadline: row.datetime("deadline")?,
            budget: row.money("budget_cents")?,
        })
    }
}

use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Row};
use crate::error::DataAccessError;

/// An organizational unit. Every employee belongs to exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: i64,
    pub name: String,
}

/// Input for creating a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartmentInput {
    pub name: String,
}

impl FromRow for Department {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            id: row.int("id")?,
            name: row.text("name")?,
        })
    }
}

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{local_now, ActivityWindow};
use crate::db::{datetime_value, DataSource, Params, Statement};
use crate::error::DataAccessError;
use crate::models::EmployeeProjectRow;

const ASSIGNMENTS_SQL: &str = "
    SELECT e.name AS employee_name,
           p.name AS project_name,
           p.deadline AS project_deadline
    FROM employees e
    JOIN employee_projects ep ON e.id = ep.employee_id
    JOIN projects p ON ep.project_id = p.id
    WHERE p.deadline >= :cutoff
    ORDER BY e.name, p.deadline, p.name";

/// Inputs for [`employee_project_listing`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignmentParams {
    pub window: ActivityWindow,
    pub as_of: NaiveDateTime,
}

impl AssignmentParams {
    pub fn cutoff(&self) -> NaiveDateTime {
        self.window.cutoff(self.as_of)
    }
}

impl Default for AssignmentParams {
    fn default() -> Self {
        Self {
            window: ActivityWindow::default(),
            as_of: local_now(),
        }
    }
}

/// One row per assignment whose project deadline is on or after the cutoff.
/// Employees with several qualifying projects appear once per project.
pub fn employee_project_listing(
    source: &impl DataSource,
    params: &AssignmentParams,
) -> Result<Vec<EmployeeProjectRow>, DataAccessError> {
    let statement = Statement::with_params(
        ASSIGNMENTS_SQL,
        Params::new().bind("cutoff", datetime_value(params.cutoff())),
    );
    let rows: Vec<EmployeeProjectRow> = source.fetch(&statement)?;
    tracing::info!(cutoff = %params.cutoff(), count = rows.len(), "Assignment listing complete");
    Ok(rows)
}

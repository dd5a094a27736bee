use chrono::NaiveDateTime;
use sea_query::{Asterisk, Expr, Func, Order, Query, SelectStatement};
use serde::{Deserialize, Serialize};

use super::{local_now, ActivityWindow};
use crate::db::tables::{EmployeeProjects, Employees, Projects};
use crate::db::{DataSource, DATETIME_FORMAT};
use crate::error::DataAccessError;
use crate::models::Employee;

/// Inputs for [`high_activity_employees`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HighActivityParams {
    pub window: ActivityWindow,
    /// Employees need strictly more qualifying assignments than this.
    pub threshold: u32,
    pub as_of: NaiveDateTime,
}

impl HighActivityParams {
    pub const DEFAULT_THRESHOLD: u32 = 3;

    pub fn cutoff(&self) -> NaiveDateTime {
        self.window.cutoff(self.as_of)
    }
}

impl Default for HighActivityParams {
    fn default() -> Self {
        Self {
            window: ActivityWindow::default(),
            threshold: Self::DEFAULT_THRESHOLD,
            as_of: local_now(),
        }
    }
}

/// Build the composed query behind [`high_activity_employees`].
pub fn high_activity_query(params: &HighActivityParams) -> SelectStatement {
    let cutoff = params.cutoff().format(DATETIME_FORMAT).to_string();

    let active = Query::select()
        .column((EmployeeProjects::Table, EmployeeProjects::EmployeeId))
        .from(EmployeeProjects::Table)
        .inner_join(
            Projects::Table,
            Expr::col((Projects::Table, Projects::Id))
                .equals((EmployeeProjects::Table, EmployeeProjects::ProjectId)),
        )
        .and_where(Expr::col((Projects::Table, Projects::Deadline)).gte(cutoff))
        .group_by_col((EmployeeProjects::Table, EmployeeProjects::EmployeeId))
        .and_having(Expr::expr(Func::count(Expr::col(Asterisk))).gt(params.threshold))
        .to_owned();

    Query::select()
        .columns([
            Employees::Id,
            Employees::Name,
            Employees::DepartmentId,
            Employees::SalaryCents,
            Employees::PerformanceRating,
        ])
        .from(Employees::Table)
        .and_where(Expr::col(Employees::Id).in_subquery(active))
        .order_by(Employees::Name, Order::Asc)
        .order_by(Employees::Id, Order::Asc)
        .to_owned()
}

/// Employees with more than `threshold` assignments whose project deadline is
/// on or after the window cutoff. Ordered by name, then id.
pub fn high_activity_employees(
    source: &impl DataSource,
    params: &HighActivityParams,
) -> Result<Vec<Employee>, DataAccessError> {
    let employees: Vec<Employee> = source.fetch(&high_activity_query(params).into())?;
    tracing::info!(
        cutoff = %params.cutoff(),
        threshold = params.threshold,
        count = employees.len(),
        "High-activity report complete"
    );
    Ok(employees)
}

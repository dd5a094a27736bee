//! Table and column identifiers for composed queries.
//!
//! Names follow `migrations/*.sql`; the `Table` variant renders as the table name.

use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum Departments {
    Table,
    Id,
    Name,
}

#[derive(Iden, Clone, Copy)]
pub enum Employees {
    Table,
    Id,
    Name,
    DepartmentId,
    SalaryCents,
    PerformanceRating,
}

#[derive(Iden, Clone, Copy)]
pub enum Projects {
    Table,
    Id,
    Name,
    Deadline,
    BudgetCents,
}

#[derive(Iden, Clone, Copy)]
pub enum EmployeeProjects {
    Table,
    EmployeeId,
    ProjectId,
}

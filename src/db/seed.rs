//! Deterministic demo dataset, laid out relative to a reference time so the
//! deadline-window reports always have something on both sides of the cutoff.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use super::{DataSource, Database, Statement};
use crate::models::*;

/// (name, department index, salary in cents, rating)
const EMPLOYEES: &[(&str, usize, i64, f64)] = &[
    ("Alice Moreau", 0, 9_500_000, 4.5),
    ("Bob Tanaka", 0, 8_200_000, 3.8),
    ("Carol Osei", 1, 7_100_050, 4.1),
    ("Dave Lindqvist", 1, 6_400_000, 2.9),
    ("Erin Walsh", 2, 5_800_000, 3.3),
    ("Frank Ibarra", 2, 6_100_000, 0.0),
];

const DEPARTMENTS: &[&str] = &["Engineering", "Finance", "Marketing", "Research"];

/// (name, deadline offset in days from the reference time, budget in cents)
const PROJECTS: &[(&str, i64, i64)] = &[
    ("Apollo", -30, 25_000_000),
    ("Borealis", 45, 12_000_000),
    ("Cobalt", 120, 40_000_000),
    ("Delta", -90, 8_000_000),
    ("Ember", -400, 15_000_000),
    ("Fjord", 10, 5_000_050),
];

/// (employee index, project index)
const ASSIGNMENTS: &[(usize, usize)] = &[
    (0, 0),
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 0),
    (1, 4),
    (1, 5),
    (2, 1),
    (2, 2),
    (2, 3),
    (2, 5),
    (3, 4),
    (4, 5),
    (4, 0),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded {
        departments: usize,
        employees: usize,
        projects: usize,
        assignments: usize,
    },
    /// The database already had departments; nothing was written.
    AlreadyPopulated,
}

/// Populate an empty database with the demo dataset.
pub fn seed_demo_data(db: &Database, reference: NaiveDateTime) -> Result<SeedOutcome> {
    let existing = db.query(&Statement::literal("SELECT COUNT(*) AS n FROM departments"))?;
    let count = existing.first().map(|row| row.int("n")).transpose()?.unwrap_or(0);
    if count > 0 {
        tracing::info!("Database already populated, skipping seed");
        return Ok(SeedOutcome::AlreadyPopulated);
    }

    let departments = DEPARTMENTS
        .iter()
        .map(|name| {
            db.create_department(CreateDepartmentInput {
                name: name.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to seed departments")?;

    let employees = EMPLOYEES
        .iter()
        .map(|&(name, dept, salary_cents, rating)| {
            db.create_employee(CreateEmployeeInput {
                name: name.to_string(),
                department_id: departments[dept].id,
                salary: Decimal::new(salary_cents, 2),
                performance_rating: rating,
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to seed employees")?;

    let midnight = reference.date().and_time(NaiveTime::MIN);
    let projects = PROJECTS
        .iter()
        .map(|&(name, offset_days, budget_cents)| {
            db.create_project(CreateProjectInput {
                name: name.to_string(),
                deadline: midnight + Duration::days(offset_days),
                budget: Decimal::new(budget_cents, 2),
            })
        })
        .collect::<Result<Vec<_>, _>>()
        .context("Failed to seed projects")?;

    for &(employee, project) in ASSIGNMENTS {
        db.assign(employees[employee].id, projects[project].id)
            .context("Failed to seed assignments")?;
    }

    tracing::info!(
        departments = departments.len(),
        employees = employees.len(),
        projects = projects.len(),
        assignments = ASSIGNMENTS.len(),
        "Seeded demo data"
    );

    Ok(SeedOutcome::Seeded {
        departments: departments.len(),
        employees: employees.len(),
        projects: projects.len(),
        assignments: ASSIGNMENTS.len(),
    })
}

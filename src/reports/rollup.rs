use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use rust_decimal::Decimal;
use sea_query::Query;

use crate::db::tables::{Departments, EmployeeProjects, Employees, Projects};
use crate::db::{DataSource, Statement};
use crate::error::DataAccessError;
use crate::models::*;

const ROLLUP_SQL: &str = "
    SELECT d.name AS department_name,
           SUM(e.salary_cents) AS total_salary_cents,
           p.name AS project_name,
           p.budget_cents AS project_budget_cents
    FROM departments d
    JOIN employees e ON d.id = e.department_id
    JOIN employee_projects ep ON e.id = ep.employee_id
    JOIN projects p ON ep.project_id = p.id
    GROUP BY d.id, d.name, p.id, p.name, p.budget_cents
    ORDER BY d.name, p.name, d.id, p.id";

/// Department/project rollup as one aggregate statement.
///
/// One row per distinct (department, project) pair reachable through the
/// department's employees' assignments. `total_salary` sums the salaries of
/// that department's employees on that project. Departments without any
/// assignment produce no rows. Ordered by department name, then project name.
pub fn department_rollup(
    source: &impl DataSource,
) -> Result<Vec<FinancialReport>, DataAccessError> {
    source.fetch(&Statement::literal(ROLLUP_SQL))
}

/// The same rollup computed by loading entities and aggregating in memory.
pub fn department_rollup_via_entities(
    source: &impl DataSource,
) -> Result<Vec<FinancialReport>, DataAccessError> {
    let departments: Vec<Department> = source.fetch(
        &Query::select()
            .columns([Departments::Id, Departments::Name])
            .from(Departments::Table)
            .to_owned()
            .into(),
    )?;
    let employees: Vec<Employee> = source.fetch(
        &Query::select()
            .columns([
                Employees::Id,
                Employees::Name,
                Employees::DepartmentId,
                Employees::SalaryCents,
                Employees::PerformanceRating,
            ])
            .from(Employees::Table)
            .to_owned()
            .into(),
    )?;
    let assignments: Vec<EmployeeProject> = source.fetch(
        &Query::select()
            .columns([EmployeeProjects::EmployeeId, EmployeeProjects::ProjectId])
            .from(EmployeeProjects::Table)
            .to_owned()
            .into(),
    )?;
    let projects: Vec<Project> = source.fetch(
        &Query::select()
            .columns([
                Projects::Id,
                Projects::Name,
                Projects::Deadline,
                Projects::BudgetCents,
            ])
            .from(Projects::Table)
            .to_owned()
            .into(),
    )?;

    let departments: HashMap<i64, &Department> = departments.iter().map(|d| (d.id, d)).collect();
    let employees: HashMap<i64, &Employee> = employees.iter().map(|e| (e.id, e)).collect();
    let projects: HashMap<i64, &Project> = projects.iter().map(|p| (p.id, p)).collect();

    // Keyed so iteration order matches the aggregate statement's ORDER BY.
    let mut totals: BTreeMap<(&str, &str, i64, i64), (Decimal, Decimal)> = BTreeMap::new();

    for assignment in &assignments {
        let (Some(employee), Some(project)) = (
            employees.get(&assignment.employee_id),
            projects.get(&assignment.project_id),
        ) else {
            continue;
        };
        let Some(department) = departments.get(&employee.department_id) else {
            continue;
        };

        let entry = totals
            .entry((
                department.name.as_str(),
                project.name.as_str(),
                department.id,
                project.id,
            ))
            .or_insert((Decimal::ZERO, project.budget));
        entry.0 += employee.salary;
    }

    Ok(totals
        .into_iter()
        .map(
            |((department_name, project_name, _, _), (total_salary, project_budget))| {
                FinancialReport {
                    department_name: department_name.to_string(),
                    total_salary,
                    project_name: project_name.to_string(),
                    project_budget,
                }
            },
        )
        .collect())
}

fn timed(
    strategy: RollupStrategy,
    run: impl FnOnce() -> Result<Vec<FinancialReport>, DataAccessError>,
) -> Result<StrategyRun, DataAccessError> {
    let started = Instant::now();
    let rows = run()?;
    let elapsed = started.elapsed();
    tracing::info!(
        strategy = strategy.as_str(),
        elapsed_ms = elapsed.as_millis() as u64,
        rows = rows.len(),
        "Rollup strategy finished"
    );
    Ok(StrategyRun {
        strategy,
        elapsed,
        rows,
    })
}

/// Run both rollup strategies, timing each, and report the faster one.
///
/// Ties go to the literal statement.
pub fn compare_rollup_strategies(
    source: &impl DataSource,
) -> Result<RollupComparison, DataAccessError> {
    let entity = timed(RollupStrategy::Entity, || {
        department_rollup_via_entities(source)
    })?;
    let literal = timed(RollupStrategy::Literal, || department_rollup(source))?;

    let fastest = if entity.elapsed < literal.elapsed {
        RollupStrategy::Entity
    } else {
        RollupStrategy::Literal
    };
    let consistent = entity.rows == literal.rows;
    if !consistent {
        tracing::warn!("Rollup strategies disagree");
    }

    Ok(RollupComparison {
        entity,
        literal,
        fastest,
        consistent,
    })
}

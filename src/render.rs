//! Plain-text rendering of report results for the console.
//!
//! Dates print as `yyyy-MM-dd`, money with two decimals, durations in milliseconds.

use std::time::Duration;

use crate::models::*;

const EMPTY: &str = "(no rows)\n";
const RULE: &str = "----------\n";

pub fn render_employees(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return EMPTY.to_string();
    }
    let mut out = String::new();
    for employee in employees {
        out.push_str(&format!("Employee: {}\n", employee.name));
    }
    out
}

pub fn render_assignments(rows: &[EmployeeProjectRow]) -> String {
    if rows.is_empty() {
        return EMPTY.to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "Employee: {}, Project: {}, Deadline: {}\n",
            row.employee_name,
            row.project_name,
            row.project_deadline.format("%Y-%m-%d")
        ));
    }
    out
}

pub fn render_bonuses(rows: &[BonusRow]) -> String {
    if rows.is_empty() {
        return EMPTY.to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "Employee #{}: {}, Salary: {:.2}, Rating: {:.1}, Bonus: {:.2}\n",
            row.id, row.name, row.salary, row.performance_rating, row.bonus
        ));
    }
    out
}

pub fn render_rollup(rows: &[FinancialReport]) -> String {
    if rows.is_empty() {
        return EMPTY.to_string();
    }
    let mut out = String::new();
    for row in rows {
        out.push_str(&format!(
            "Department: {}, Total Salary: {:.2}, Project: {}, Budget: {:.2}\n",
            row.department_name, row.total_salary, row.project_name, row.project_budget
        ));
    }
    out
}

fn millis(elapsed: Duration) -> String {
    format!("{:.3} ms", elapsed.as_secs_f64() * 1000.0)
}

fn strategy_label(strategy: RollupStrategy) -> &'static str {
    match strategy {
        RollupStrategy::Entity => "Entity queries",
        RollupStrategy::Literal => "Literal statement",
    }
}

pub fn render_comparison(comparison: &RollupComparison) -> String {
    let mut out = String::new();
    for (i, run) in [&comparison.entity, &comparison.literal].iter().enumerate() {
        out.push_str(&format!(
            "{}. {}: Execution Time: {}\n",
            i + 1,
            strategy_label(run.strategy),
            millis(run.elapsed)
        ));
        out.push_str(&render_rollup(&run.rows));
        out.push_str(RULE);
    }
    out.push_str(&format!(
        "Fastest one is: {}\n",
        strategy_label(comparison.fastest)
    ));
    if !comparison.consistent {
        out.push_str("Warning: strategies returned different rows\n");
    }
    out
}

use std::time::Duration;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::db::{FromRow, Row};
use crate::error::DataAccessError;

/// One qualifying assignment in the employee–project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeProjectRow {
    pub employee_name: String,
    pub project_name: String,
    pub project_deadline: NaiveDateTime,
}

impl FromRow for EmployeeProjectRow {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            employee_name: row.text("employee_name")?,
            project_name: row.text("project_name")?,
            project_deadline: row.datetime("project_deadline")?,
        })
    }
}

/// Output of the `CalculateBonuses` routine for a single employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRow {
    pub id: i64,
    pub name: String,
    pub salary: Decimal,
    pub performance_rating: f64,
    pub bonus: Decimal,
}

impl FromRow for BonusRow {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            id: row.int("Id")?,
            name: row.text("Name")?,
            salary: row.money("Salary")?,
            performance_rating: row.real("PerformanceRating")?,
            bonus: row.decimal("Bonus")?,
        })
    }
}

/// Salary and budget figures for one (department, project) pair.
///
/// `total_salary` sums the salaries of the department's employees assigned
/// to the project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialReport {
    pub department_name: String,
    pub total_salary: Decimal,
    pub project_name: String,
    pub project_budget: Decimal,
}

impl FromRow for FinancialReport {
    fn from_row(row: &Row) -> Result<Self, DataAccessError> {
        Ok(Self {
            department_name: row.text("department_name")?,
            total_salary: row.money("total_salary_cents")?,
            project_name: row.text("project_name")?,
            project_budget: row.money("project_budget_cents")?,
        })
    }
}

/// The two ways the rollup can be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupStrategy {
    /// Load entities through composed queries and aggregate in memory.
    Entity,
    /// One hand-written aggregate statement.
    Literal,
}

impl RollupStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entity => "entity",
            Self::Literal => "literal",
        }
    }
}

/// A timed execution of one rollup strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyRun {
    pub strategy: RollupStrategy,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
    pub rows: Vec<FinancialReport>,
}

/// Side-by-side result of running both rollup strategies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollupComparison {
    pub entity: StrategyRun,
    pub literal: StrategyRun,
    pub fastest: RollupStrategy,
    /// Whether both strategies produced the same rows.
    pub consistent: bool,
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let ms = f64::deserialize(deserializer)?;
        Ok(Duration::from_secs_f64(ms.max(0.0) / 1000.0))
    }
}

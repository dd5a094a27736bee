mod port;
pub mod procedure;
mod schema;
pub mod seed;
pub mod tables;
mod value;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use rusqlite::Connection;
use sea_query::SqliteQueryBuilder;
use sea_query_rusqlite::RusqliteBinder;

pub use port::{DataSource, Statement};
pub use value::{
    datetime_value, from_minor_units, map_rows, to_minor_units, FromRow, Params, Row, Value,
    DATETIME_FORMAT, MONEY_SCALE,
};

use crate::error::DataAccessError;
use crate::models::*;

/// SQLite-backed [`DataSource`].
///
/// One connection shared behind a mutex; every port call locks it for the
/// duration of that call only.
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self, DataAccessError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DataAccessError::Unreachable(format!("{}: {}", parent.display(), e))
            })?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::configure(conn)
    }

    pub fn open_memory() -> Result<Self, DataAccessError> {
        Self::configure(Connection::open_in_memory()?)
    }

    fn configure(conn: Connection) -> Result<Self, DataAccessError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        procedure::register_functions(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.session()?;
        schema::run_migrations(&conn)
    }

    fn session(&self) -> Result<MutexGuard<'_, Connection>, DataAccessError> {
        self.conn.lock().map_err(|_| DataAccessError::Unavailable)
    }

    // ============================================================
    // Fixture writes (seeding and tests; reports never write)
    // ============================================================

    pub fn create_department(
        &self,
        input: CreateDepartmentInput,
    ) -> Result<Department, DataAccessError> {
        let conn = self.session()?;
        conn.execute("INSERT INTO departments (name) VALUES (?)", [&input.name])?;

        Ok(Department {
            id: conn.last_insert_rowid(),
            name: input.name,
        })
    }

    pub fn create_employee(&self, input: CreateEmployeeInput) -> Result<Employee, DataAccessError> {
        let salary_cents = to_minor_units(input.salary)?;
        let conn = self.session()?;
        conn.execute(
            "INSERT INTO employees (name, department_id, salary_cents, performance_rating)
             VALUES (?, ?, ?, ?)",
            (
                &input.name,
                input.department_id,
                salary_cents,
                input.performance_rating,
            ),
        )?;

        Ok(Employee {
            id: conn.last_insert_rowid(),
            name: input.name,
            department_id: input.department_id,
            salary: from_minor_units(salary_cents),
            performance_rating: input.performance_rating,
        })
    }

    pub fn create_project(&self, input: CreateProjectInput) -> Result<Project, DataAccessError> {
        let budget_cents = to_minor_units(input.budget)?;
        let conn = self.session()?;
        conn.execute(
            "INSERT INTO projects (name, deadline, budget_cents) VALUES (?, ?, ?)",
            (
                &input.name,
                input.deadline.format(DATETIME_FORMAT).to_string(),
                budget_cents,
            ),
        )?;

        Ok(Project {
            id: conn.last_insert_rowid(),
            name: input.name,
            deadline: input.deadline,
            budget: from_minor_units(budget_cents),
        })
    }

    pub fn assign(
        &self,
        employee_id: i64,
        project_id: i64,
    ) -> Result<EmployeeProject, DataAccessError> {
        let conn = self.session()?;
        conn.execute(
            "INSERT INTO employee_projects (employee_id, project_id) VALUES (?, ?)",
            (employee_id, project_id),
        )?;

        Ok(EmployeeProject {
            employee_id,
            project_id,
        })
    }
}

/// Read every row of a prepared statement into owned [`Row`]s.
fn collect_rows(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Row>, DataAccessError> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query(params)?;
    let mut out = Vec::new();

    while let Some(row) = rows.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            values.push((name.clone(), row.get::<_, Value>(i)?));
        }
        out.push(Row::new(values));
    }

    Ok(out)
}

impl DataSource for Database {
    fn query(&self, statement: &Statement) -> Result<Vec<Row>, DataAccessError> {
        match statement {
            Statement::Literal { sql, params } => {
                tracing::debug!(sql = %sql, params = params.len(), "query");
                let conn = self.session()?;
                collect_rows(&conn, sql, params.as_named().as_slice())
            }
            Statement::Composed(select) => {
                let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
                tracing::debug!(sql = %sql, params = values.0.len(), "query");
                let conn = self.session()?;
                collect_rows(&conn, &sql, values.as_params().as_slice())
            }
        }
    }

    fn execute(&self, statement: &Statement) -> Result<usize, DataAccessError> {
        let changed = match statement {
            Statement::Literal { sql, params } => {
                tracing::debug!(sql = %sql, params = params.len(), "execute");
                let conn = self.session()?;
                conn.execute(sql, params.as_named().as_slice())?
            }
            Statement::Composed(select) => {
                let (sql, values) = select.build_rusqlite(SqliteQueryBuilder);
                tracing::debug!(sql = %sql, params = values.0.len(), "execute");
                let conn = self.session()?;
                conn.execute(&sql, values.as_params().as_slice())?
            }
        };
        Ok(changed)
    }

    fn object_exists(&self, name: &str) -> Result<bool, DataAccessError> {
        let conn = self.session()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE name = ? AND type IN ('table', 'view')",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

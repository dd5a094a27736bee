//! The data source port: everything the reports need from a relational store.

use sea_query::SelectStatement;

use super::value::{map_rows, FromRow, Params, Row};
use crate::error::DataAccessError;

/// A statement to run against the store.
#[derive(Debug, Clone)]
pub enum Statement {
    /// Hand-written SQL with named parameters (`:cutoff`).
    Literal { sql: String, params: Params },
    /// A query built with `sea_query`; values bind positionally.
    Composed(SelectStatement),
}

impl Statement {
    pub fn literal(sql: impl Into<String>) -> Self {
        Self::Literal {
            sql: sql.into(),
            params: Params::new(),
        }
    }

    pub fn with_params(sql: impl Into<String>, params: Params) -> Self {
        Self::Literal {
            sql: sql.into(),
            params,
        }
    }
}

impl From<SelectStatement> for Statement {
    fn from(select: SelectStatement) -> Self {
        Self::Composed(select)
    }
}

/// Read access (plus rare administrative writes) to a relational store.
///
/// Implementations hold a connection or session only for the duration of a
/// single call and release it on every exit path.
pub trait DataSource {
    /// Run a read statement and return every row.
    fn query(&self, statement: &Statement) -> Result<Vec<Row>, DataAccessError>;

    /// Run an administrative statement, returning the number of affected rows.
    fn execute(&self, statement: &Statement) -> Result<usize, DataAccessError>;

    /// Whether a named schema object (table, view, routine) exists.
    fn object_exists(&self, name: &str) -> Result<bool, DataAccessError>;

    /// Run a read statement and map each row into `T`.
    fn fetch<T: FromRow>(&self, statement: &Statement) -> Result<Vec<T>, DataAccessError>
    where
        Self: Sized,
    {
        map_rows(&self.query(statement)?)
    }
}

//! Error taxonomy for the report engine.
//!
//! Connectivity failures, malformed statements and constraint violations are
//! kept apart so callers can tell "the store is gone" from "the query is wrong".

use rusqlite::ErrorCode;
use thiserror::Error;

/// Failure talking to the relational store.
#[derive(Debug, Error)]
pub enum DataAccessError {
    #[error("Data source unreachable: {0}")]
    Unreachable(String),

    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    #[error("Constraint violated: {0}")]
    Constraint(String),

    #[error("Cannot decode column `{column}`: {reason}")]
    Decode { column: String, reason: String },

    #[error("Data source unavailable: connection lock poisoned")]
    Unavailable,

    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl DataAccessError {
    pub fn decode(column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            reason: reason.into(),
        }
    }
}

impl From<rusqlite::Error> for DataAccessError {
    fn from(err: rusqlite::Error) -> Self {
        let classified = match &err {
            rusqlite::Error::SqliteFailure(failure, message) => {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::CannotOpen
                    | ErrorCode::NotADatabase
                    | ErrorCode::SystemIoFailure
                    | ErrorCode::PermissionDenied => Some(Self::Unreachable(detail)),
                    ErrorCode::ConstraintViolation => Some(Self::Constraint(detail)),
                    ErrorCode::Unknown => Some(Self::MalformedStatement(detail)),
                    _ => None,
                }
            }
            rusqlite::Error::SqlInputError { msg, offset, .. } => Some(Self::MalformedStatement(
                format!("{} (at offset {})", msg, offset),
            )),
            rusqlite::Error::InvalidColumnName(name) => {
                Some(Self::MalformedStatement(format!("no such column: {}", name)))
            }
            rusqlite::Error::InvalidParameterName(name) => {
                Some(Self::MalformedStatement(format!("no such parameter: {}", name)))
            }
            rusqlite::Error::InvalidParameterCount(given, expected) => Some(
                Self::MalformedStatement(format!("expected {} parameters, got {}", expected, given)),
            ),
            _ => None,
        };
        classified.unwrap_or(Self::Sqlite(err))
    }
}

/// The bonus routine could not be created in the data source.
#[derive(Debug, Error)]
#[error("Failed to install procedure `{name}`: {source}")]
pub struct ProcedureInstallError {
    pub name: String,
    #[source]
    pub source: DataAccessError,
}

/// Any failure that aborts a single report invocation.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    DataAccess(#[from] DataAccessError),

    #[error(transparent)]
    ProcedureInstall(#[from] ProcedureInstallError),
}

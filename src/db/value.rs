//! Typed values, rows and named parameters exchanged through the data source port.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::ToSql;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::DataAccessError;

pub use rusqlite::types::Value;

/// Storage format for date/time columns. Sorts lexicographically.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Scale of all money columns (stored as integer minor units).
pub const MONEY_SCALE: u32 = 2;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Integer(_) => "integer",
        Value::Real(_) => "real",
        Value::Text(_) => "text",
        Value::Blob(_) => "blob",
    }
}

/// Bind a timestamp in the storage format.
pub fn datetime_value(value: NaiveDateTime) -> Value {
    Value::Text(value.format(DATETIME_FORMAT).to_string())
}

/// Convert a fixed-point amount to integer minor units, rejecting sub-cent precision loss.
pub fn to_minor_units(value: Decimal) -> Result<i64, DataAccessError> {
    let scaled = value
        .checked_mul(Decimal::from(10_i64.pow(MONEY_SCALE)))
        .ok_or_else(|| DataAccessError::decode("money", format!("{} is out of range", value)))?;
    if scaled.fract() != Decimal::ZERO {
        return Err(DataAccessError::decode(
            "money",
            format!("{} has more than {} decimal places", value, MONEY_SCALE),
        ));
    }
    scaled
        .to_i64()
        .ok_or_else(|| DataAccessError::decode("money", format!("{} is out of range", value)))
}

pub fn from_minor_units(minor: i64) -> Decimal {
    Decimal::new(minor, MONEY_SCALE)
}

/// Named statement parameters, e.g. `(":cutoff", Value::Text(..))`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, Value)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. A leading `:` is added if missing.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn push(&mut self, name: &str, value: Value) {
        let name = if name.starts_with(':') {
            name.to_string()
        } else {
            format!(":{}", name)
        };
        self.0.push((name, value));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Borrow as the slice form rusqlite accepts for named parameters.
    pub fn as_named(&self) -> Vec<(&str, &dyn ToSql)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

/// One result row: column name to value, in select-list order.
///
/// Column lookup is ASCII case-insensitive, like SQL identifiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new(columns: Vec<(String, Value)>) -> Self {
        Self { columns }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, value)| value)
    }

    fn require(&self, column: &str) -> Result<&Value, DataAccessError> {
        self.get(column)
            .ok_or_else(|| DataAccessError::decode(column, "column not in result set"))
    }

    fn mismatch(column: &str, expected: &str, found: &Value) -> DataAccessError {
        DataAccessError::decode(
            column,
            format!("expected {}, found {}", expected, type_name(found)),
        )
    }

    pub fn int(&self, column: &str) -> Result<i64, DataAccessError> {
        match self.require(column)? {
            Value::Integer(i) => Ok(*i),
            other => Err(Self::mismatch(column, "integer", other)),
        }
    }

    /// Read a floating-point column. Integer storage is widened.
    pub fn real(&self, column: &str) -> Result<f64, DataAccessError> {
        match self.require(column)? {
            Value::Real(f) => Ok(*f),
            Value::Integer(i) => Ok(*i as f64),
            other => Err(Self::mismatch(column, "real", other)),
        }
    }

    pub fn text(&self, column: &str) -> Result<String, DataAccessError> {
        match self.require(column)? {
            Value::Text(s) => Ok(s.clone()),
            other => Err(Self::mismatch(column, "text", other)),
        }
    }

    /// Read an integer minor-unit column as a fixed-point amount.
    pub fn money(&self, column: &str) -> Result<Decimal, DataAccessError> {
        match self.require(column)? {
            Value::Integer(minor) => Ok(from_minor_units(*minor)),
            other => Err(Self::mismatch(column, "integer minor units", other)),
        }
    }

    /// Read a decimal stored as text (exact), integer, or real (shortest representation).
    pub fn decimal(&self, column: &str) -> Result<Decimal, DataAccessError> {
        match self.require(column)? {
            Value::Text(s) => Decimal::from_str(s)
                .map_err(|e| DataAccessError::decode(column, e.to_string())),
            Value::Integer(i) => Ok(Decimal::from(*i)),
            Value::Real(f) => Decimal::from_f64(*f)
                .ok_or_else(|| DataAccessError::decode(column, format!("{} is not finite", f))),
            other => Err(Self::mismatch(column, "decimal", other)),
        }
    }

    pub fn datetime(&self, column: &str) -> Result<NaiveDateTime, DataAccessError> {
        let raw = self.text(column)?;
        NaiveDateTime::parse_from_str(&raw, DATETIME_FORMAT)
            .map_err(|e| DataAccessError::decode(column, format!("{}: {}", raw, e)))
    }
}

/// Map a result row into a typed value.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, DataAccessError>;
}

/// Map every row, stopping at the first decode failure.
pub fn map_rows<T: FromRow>(rows: &[Row]) -> Result<Vec<T>, DataAccessError> {
    rows.iter().map(T::from_row).collect()
}

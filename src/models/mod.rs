//! Entity and report-row types.
//!
//! # Entities
//!
//! - [`Department`]: owns zero or more employees.
//! - [`Employee`]: belongs to exactly one department, paid a fixed-point salary.
//! - [`Project`]: has a deadline and a fixed-point budget.
//! - [`EmployeeProject`]: the many-to-many assignment between employees and projects.
//!
//! # Report rows
//!
//! Flat, serializable rows returned by the report operations in [`crate::reports`].

mod department;
mod employee;
mod project;
mod report;

pub use department::*;
pub use employee::*;
pub use project::*;
pub use report::*;

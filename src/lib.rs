//! Workforce and project financial reports over a relational store.
//!
//! The four reports in [`reports`] run against any [`db::DataSource`]; [`db::Database`]
//! is the SQLite implementation.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod render;
pub mod reports;

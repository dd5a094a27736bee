//! Runtime configuration.
//!
//! Resolution order: command-line flag, then environment variable, then default.
//! Command-line parsing (including the environment fallback) lives in the binary;
//! this module owns the defaults and turns the result into report parameters.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::reports::{ActivityWindow, AssignmentParams, HighActivityParams};

pub const ENV_DATABASE: &str = "ORGREPORT_DATABASE";
pub const ENV_WINDOW_MONTHS: &str = "ORGREPORT_WINDOW_MONTHS";
pub const ENV_THRESHOLD: &str = "ORGREPORT_THRESHOLD";

const APP_NAME: &str = "org-reports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_path: PathBuf,
    pub window: ActivityWindow,
    pub threshold: u32,
}

impl Config {
    pub fn resolve(
        database: Option<PathBuf>,
        months: Option<u32>,
        threshold: Option<u32>,
    ) -> Result<Self> {
        let database_path = match database {
            Some(path) => path,
            None => default_database_path()?,
        };

        Ok(Self {
            database_path,
            window: months
                .map(ActivityWindow::months)
                .unwrap_or_default(),
            threshold: threshold.unwrap_or(HighActivityParams::DEFAULT_THRESHOLD),
        })
    }

    pub fn high_activity(&self, as_of: NaiveDateTime) -> HighActivityParams {
        HighActivityParams {
            window: self.window,
            threshold: self.threshold,
            as_of,
        }
    }

    pub fn assignments(&self, as_of: NaiveDateTime) -> AssignmentParams {
        AssignmentParams {
            window: self.window,
            as_of,
        }
    }
}

/// `<platform data dir>/org-reports/org-reports.db`.
pub fn default_database_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    Ok(dirs.data_dir().join(format!("{}.db", APP_NAME)))
}

//! The four report operations.
//!
//! Each report is a free function over an injected [`DataSource`](crate::db::DataSource),
//! holds no state between calls, and never writes (the bonus report may install its
//! routine once).

mod activity;
mod assignments;
mod bonus;
mod rollup;

use chrono::{Local, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub use activity::*;
pub use assignments::*;
pub use bonus::*;
pub use rollup::*;

/// Lookback window for deadline-based reports, in calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityWindow {
    months: u32,
}

impl ActivityWindow {
    pub const DEFAULT_MONTHS: u32 = 6;

    pub fn months(months: u32) -> Self {
        Self { months }
    }

    pub fn as_months(&self) -> u32 {
        self.months
    }

    /// `as_of` minus the window. Day-of-month is clamped (Aug 31 - 6 months = Feb 28/29).
    ///
    /// Reports keep rows whose deadline is on or after the cutoff, which includes
    /// deadlines in the future.
    pub fn cutoff(&self, as_of: NaiveDateTime) -> NaiveDateTime {
        as_of
            .checked_sub_months(Months::new(self.months))
            .unwrap_or(NaiveDateTime::MIN)
    }
}

impl Default for ActivityWindow {
    fn default() -> Self {
        Self::months(Self::DEFAULT_MONTHS)
    }
}

/// Wall-clock "now" in local time, matching how deadlines are recorded.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

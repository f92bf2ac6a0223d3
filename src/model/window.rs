use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::time::format_date;

/// One bounded slice of a requested date span.
///
/// Both bounds are sent to the upstream as inclusive `YYYY-MM-DD` dates. Windows produced by
/// the optimizer share their boundary instant with the next window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Width of the window in whole days, rounded down.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} - {})", format_date(&self.start), format_date(&self.end))
    }
}

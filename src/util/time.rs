//! Clock abstraction and timestamp helpers.
//!
//! Token expiry, API key validity, and metadata cache TTLs are all evaluated against a
//! [`Clock`] owned by the component rather than the wall clock directly, so expiry can be
//! driven deterministically with [`ManualClock`]. The serde helpers accept the upstream
//! timestamp formats, which are not consistently timezone-aware.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// Date format used in filter expressions and date-only upstream fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
///
/// Used wherever expiry needs to be exercised without sleeping: set it to a known instant,
/// then [`advance`](ManualClock::advance) past a TTL or token lifetime.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Formats a timestamp as the `YYYY-MM-DD` date used in upstream filter expressions.
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses an upstream timestamp, treating timezone-naive values as UTC.
///
/// Accepts RFC 3339 (`2021-09-14T08:00:00.000Z`), naive date-times
/// (`2021-09-14T08:00:00.000`, with `T` or a space separator), and bare dates (`2021-09-14`,
/// interpreted as midnight UTC).
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Serde helper for required upstream timestamps.
pub fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_utc(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw:?}")))
}

/// Serde helper for optional upstream timestamps.
pub fn deserialize_optional_utc<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse_utc(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp: {raw:?}"))),
    }
}

//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of days.
    ///
    /// Negative values subtract days.
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Creates a new timestamp by adding calendar months.
    ///
    /// The day of month is clamped to the last valid day of the target
    /// month: Jan 31 + 1 month is Feb 28 (Feb 29 in a leap year).
    /// Saturates at the maximum representable instant.
    pub fn add_months(&self, months: u32) -> Self {
        Self(
            self.0
                .checked_add_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Creates a new timestamp by adding calendar years.
    ///
    /// Feb 29 + 1 year is Feb 28.
    pub fn add_years(&self, years: u32) -> Self {
        self.add_months(years.saturating_mul(12))
    }

    /// Creates a new timestamp by adding a signed duration.
    pub fn plus(&self, duration: Duration) -> Self {
        Self(self.0 + duration)
    }

    /// Formats as `yyyymmdd-hhmmss`.
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d-%H%M%S").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

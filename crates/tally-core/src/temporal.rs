//! # Temporal Primitives — UTC Timestamps and Calendar-Day Arithmetic
//!
//! Defines `Timestamp`, a UTC-only timestamp at seconds precision, and the
//! calendar-day helpers the points ledger and aggregator are built on.
//!
//! ## Design
//!
//! Attendance policy is written in calendar days, not instants: an
//! occurrence happens on a date, expires on a date, and accrues into
//! calendar month/quarter/year buckets. Dates are `chrono::NaiveDate`
//! interpreted in UTC. Instants (audit records, alert creation, approval
//! times) are `Timestamp` — UTC only, truncated to seconds so that rendered
//! audit trails are stable.
//!
//! Rolling expiration is exact-day addition: a 365-day window starting
//! 2024-02-29 ends 2025-02-28. No "same day next year" civil arithmetic.

use chrono::{DateTime, Datelike, Days, NaiveDate, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A UTC-only timestamp, truncated to seconds precision.
///
/// # Construction
///
/// - [`Timestamp::now()`] — current UTC time, truncated.
/// - [`Timestamp::from_utc()`] — from a `DateTime<Utc>`, truncating sub-seconds.
/// - [`Timestamp::parse()`] — from an RFC 3339 string, converting to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse a timestamp from an RFC 3339 string, accepting any timezone
    /// offset and converting to UTC.
    ///
    /// Attendance source systems report approver timestamps in local zone
    /// offsets; the result here is always UTC with seconds precision.
    ///
    /// # Errors
    ///
    /// Returns the underlying chrono error if the string is not valid
    /// RFC 3339.
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let dt = DateTime::parse_from_rfc3339(s)?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The UTC calendar date this instant falls on.
    pub fn date(&self) -> NaiveDate {
        self.0.date_naive()
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// The date a point balance entry rolls off: `occurred_on` plus exactly
/// `window_days` calendar days.
///
/// Exact-day addition, never civil-year arithmetic: a 365-day window on a
/// leap day (2024-02-29) expires 2025-02-28. Saturates at
/// `NaiveDate::MAX` if the window would overflow the calendar, which for
/// any plausible occurrence date means "never expires".
pub fn expiration_date(occurred_on: NaiveDate, window_days: u32) -> NaiveDate {
    occurred_on
        .checked_add_days(Days::new(u64::from(window_days)))
        .unwrap_or(NaiveDate::MAX)
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// First day of the calendar quarter containing `date`.
pub fn quarter_start(date: NaiveDate) -> NaiveDate {
    let quarter_month = ((date.month() - 1) / 3) * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), quarter_month, 1).unwrap_or(date)
}

/// First day of the calendar year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// Signed number of calendar days from `from` to `to` (negative if `to`
/// is earlier).
pub fn days_until(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

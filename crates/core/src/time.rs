//! Lenient timestamp parsing for client-supplied dates.
//!
//! Mobile clients send both full RFC 3339 date-times and bare `YYYY-MM-DD`
//! dates; the latter are treated as midnight UTC.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::validation::ValidationError;

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(day.and_time(NaiveTime::MIN).and_utc());
    }
    Err(ValidationError::InvalidTimestamp(raw.to_owned()))
}

/// Truncates a timestamp to its calendar day, the per-day uniqueness key.
pub fn day_key(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

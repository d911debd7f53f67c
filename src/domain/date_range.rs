//! Date range
//!
//! Caller-supplied inclusive ranges for list and stats queries. Bounds are
//! reduced to their UTC calendar day and clamped to whole days, so
//! `from` is 00:00:00.000 and `to` is 23:59:59.999.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use super::DomainError;

/// An inclusive, day-aligned UTC range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl DateRange {
    /// Build a range from two instants.
    ///
    /// # Errors
    /// `DomainError::InvalidDateRange` when `to` falls on a day before `from`
    /// or the span exceeds `max_days`.
    pub fn new(
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        max_days: i64,
    ) -> Result<Self, DomainError> {
        let from_day = from.date_naive();
        let to_day = to.date_naive();

        let days = (to_day - from_day).num_days();
        if days < 0 || days > max_days {
            return Err(DomainError::InvalidDateRange { max_days });
        }

        Ok(Self {
            from: start_of_day(from_day)?,
            to: end_of_day(to_day)?,
        })
    }

    /// Parse both bounds (RFC 3339 or `YYYY-MM-DD`) and build the range.
    pub fn parse(from: &str, to: &str, max_days: i64) -> Result<Self, DomainError> {
        Self::new(parse_instant(from)?, parse_instant(to)?, max_days)
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }
}

/// Parse a timestamp sent by a client.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`), a bare date
/// (`2024-03-01`) or a naive datetime, which is read as UTC.
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, DomainError> {
    let value = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return start_of_day(date);
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| DomainError::InvalidDate(value.to_string()))
}

fn start_of_day(day: NaiveDate) -> Result<DateTime<Utc>, DomainError> {
    Ok(Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN)))
}

fn end_of_day(day: NaiveDate) -> Result<DateTime<Utc>, DomainError> {
    let end = NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
        .ok_or_else(|| DomainError::InvalidDate(day.to_string()))?;
    Ok(Utc.from_utc_datetime(&day.and_time(end)))
}

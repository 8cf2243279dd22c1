//! Calendar-date extraction from record timestamps
//!
//! Upstream timestamps come in several encodings. Accepted, in order:
//! - full timestamps with a `T` separator, optionally followed by a
//!   `+hh:mm`/`+hhmm` offset or a literal `Z` (read as `+00:00`)
//! - bare `YYYY-MM-DD` dates
//!
//! Anything else is unparseable and yields `None`. The calendar date of an
//! offset timestamp is the wall-clock date at that offset, not UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y-%m-%d";

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%:z"];

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a timestamp or date string into a calendar date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if raw.contains('T') {
    return parse_timestamp(&raw.replace('Z', "+00:00"));
  }

  NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.date_naive());
  }

  for format in OFFSET_FORMATS {
    if let Ok(dt) = DateTime::parse_from_str(raw, format) {
      return Some(dt.date_naive());
    }
  }

  NAIVE_FORMATS
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    .map(|dt| dt.date())
}

/// Monday on or before the given date
///
/// Saturates at the ends of the representable calendar.
pub fn week_start(date: NaiveDate) -> NaiveDate {
  let back = Duration::days(date.weekday().num_days_from_monday() as i64);
  date.checked_sub_signed(back).unwrap_or(date)
}

/// Last day (Sunday) of the week starting at `week_start`
pub fn week_end(week_start: NaiveDate) -> NaiveDate {
  week_start
    .checked_add_signed(Duration::days(6))
    .unwrap_or(NaiveDate::MAX)
}

/// Parse an explicit `YYYY-MM-DD` reference date supplied by a caller
pub fn parse_reference_date(raw: &str) -> crate::error::Result<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
    .map_err(|_| crate::error::ContextError::InvalidDate(raw.to_string()))
}

//! Schedule time handling.
//!
//! Queries arrive as a date string plus a four-digit "HHMM" time-of-day, and
//! the dataset stores departure times as "HHMM" numbers that may have lost
//! their leading zeros. This module turns both into `NaiveDateTime` instants
//! and provides the exclusive-bounds [`TimeWindow`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Error returned when parsing an invalid date or time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time: {reason} (got {input:?})")]
pub struct TimeError {
    reason: &'static str,
    input: String,
}

impl TimeError {
    fn new(reason: &'static str, input: &str) -> Self {
        Self {
            reason,
            input: input.to_string(),
        }
    }
}

/// Parse a calendar date in `YYYYMMDD` or `YYYY-MM-DD` form.
///
/// # Examples
///
/// ```
/// use flight_server::domain::parse_date;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2023, 4, 1).unwrap();
/// assert_eq!(parse_date("20230401").unwrap(), expected);
/// assert_eq!(parse_date("2023-04-01").unwrap(), expected);
/// assert!(parse_date("2023-13-01").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<NaiveDate, TimeError> {
    let s = s.trim();
    let format = match s.len() {
        8 => "%Y%m%d",
        10 => "%Y-%m-%d",
        _ => return Err(TimeError::new("expected YYYYMMDD or YYYY-MM-DD", s)),
    };
    NaiveDate::parse_from_str(s, format).map_err(|_| TimeError::new("invalid calendar date", s))
}

/// Parse a time of day in strict four-digit `HHMM` form.
///
/// # Examples
///
/// ```
/// use flight_server::domain::parse_hhmm;
///
/// assert!(parse_hhmm("0000").is_ok());
/// assert!(parse_hhmm("2359").is_ok());
/// assert!(parse_hhmm("930").is_err());
/// assert!(parse_hhmm("2400").is_err());
/// assert!(parse_hhmm("12:30").is_err());
/// ```
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let bytes = s.as_bytes();
    if bytes.len() != 4 {
        return Err(TimeError::new("expected HHMM format", s));
    }

    let hour =
        parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new("invalid hour digits", s))?;
    if hour > 23 {
        return Err(TimeError::new("hour must be 00-23", s));
    }

    let minute =
        parse_two_digits(&bytes[2..4]).ok_or_else(|| TimeError::new("invalid minute digits", s))?;
    if minute > 59 {
        return Err(TimeError::new("minute must be 00-59", s));
    }

    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| TimeError::new("invalid time", s))
}

/// Parse a dataset departure time, left-padding with zeros to four digits.
///
/// The dataset writes "0730" as "730" (and "0005" as "5").
pub fn parse_padded_hhmm(s: &str) -> Result<NaiveTime, TimeError> {
    let s = s.trim();
    if s.is_empty() || s.len() > 4 {
        return Err(TimeError::new("expected 1 to 4 digits", s));
    }
    parse_hhmm(&format!("{s:0>4}"))
}

/// Combine a query date string and `HHMM` time string into one instant.
pub fn parse_query_instant(date: &str, time: &str) -> Result<NaiveDateTime, TimeError> {
    Ok(parse_date(date)?.and_time(parse_hhmm(time)?))
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// A time window with exclusive bounds on both ends.
///
/// A leg fits the window only if it departs strictly after `start` and
/// arrives strictly before `end`. A window with `start >= end` admits nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Create a window from two instants.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Build a window from query strings (`YYYYMMDD` dates, `HHMM` times).
    pub fn parse(
        start_date: &str,
        start_time: &str,
        end_date: &str,
        end_time: &str,
    ) -> Result<Self, TimeError> {
        Ok(Self {
            start: parse_query_instant(start_date, start_time)?,
            end: parse_query_instant(end_date, end_time)?,
        })
    }

    /// Whether a departure/arrival pair falls strictly inside the window.
    pub fn admits(&self, departure: NaiveDateTime, arrival: NaiveDateTime) -> bool {
        departure > self.start && arrival < self.end
    }

    /// Whether the window can admit anything at all.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

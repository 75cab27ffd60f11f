//! Time-window selection over a transcript.
//!
//! A [`TimeWindow`] holds optional inclusive start/end bounds. The
//! caller-facing layer builds it from separate `MM/DD/YYYY` date and
//! `H:MM AM/PM` time strings; the engine compares message timestamps against
//! it and locates where the window begins in the line sequence.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ShrinkError};

/// Date formats accepted for window bounds and message headers,
/// 4-digit year first.
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%m/%d/%y"];

/// Time formats accepted, 12-hour with AM/PM tried before 24-hour.
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M:%S %p", "%H:%M", "%H:%M:%S"];

/// Parses a `M/D/YYYY` (or 2-digit-year) date string.
fn parse_date(date_str: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_str, fmt).ok())
}

/// Parses a `H:MM [AM/PM]` time string, with optional seconds.
fn parse_time(time_str: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(time_str, fmt).ok())
}

/// Combines header date and optional time strings into a timestamp.
///
/// A missing time resolves to midnight so date-only headers still order
/// correctly within the window. Returns `None` if the date (or a present
/// time) fails every accepted format.
pub fn parse_message_datetime(date_str: &str, time_str: Option<&str>) -> Option<DateTime<Utc>> {
    let date = parse_date(date_str)?;
    let time = match time_str {
        Some(t) => parse_time(t)?,
        None => NaiveTime::MIN,
    };
    Some(NaiveDateTime::new(date, time).and_utc())
}

/// Optional inclusive start/end bounds for message selection.
///
/// Absence of a bound means unbounded on that side. A message is retained
/// while `start <= timestamp <= end`; the first timestamp strictly past the
/// end bound stops processing entirely.
///
/// # Example
///
/// ```rust
/// use chatshrink::window::TimeWindow;
///
/// let window = TimeWindow::from_parts(
///     Some("12/28/2024"), Some("12:00 AM"),
///     Some("12/29/2024"), Some("11:59 PM"),
/// ).unwrap();
/// assert!(window.start.is_some());
/// assert!(window.end.is_some());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Earliest timestamp retained (inclusive).
    pub start: Option<DateTime<Utc>>,

    /// Latest timestamp retained (inclusive).
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    /// A window with no bounds; every message is retained.
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Builds a window from explicit timestamps.
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Builds a window from separate date/time strings as supplied by
    /// callers (`MM/DD/YYYY` and `H:MM AM/PM`).
    ///
    /// A time without a date on the same side is ignored, matching the
    /// behavior of the export tooling this engine replaces.
    ///
    /// # Errors
    ///
    /// Returns [`ShrinkError::InvalidDate`] when a provided date or time
    /// string fails to parse.
    pub fn from_parts(
        start_date: Option<&str>,
        start_time: Option<&str>,
        end_date: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            start: combine_bound(start_date, start_time)?,
            end: combine_bound(end_date, end_time)?,
        })
    }

    /// Returns `true` if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns `true` if `ts` falls before the start bound.
    pub fn precedes(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_some_and(|start| ts < start)
    }

    /// Returns `true` if `ts` falls strictly after the end bound.
    pub fn exceeds(&self, ts: DateTime<Utc>) -> bool {
        self.end.is_some_and(|end| ts > end)
    }
}

fn combine_bound(date: Option<&str>, time: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let Some(date_str) = date else {
        return Ok(None);
    };
    let date = parse_date(date_str).ok_or_else(|| ShrinkError::invalid_date(date_str))?;
    let time = match time {
        Some(time_str) => parse_time(time_str).ok_or_else(|| ShrinkError::invalid_time(time_str))?,
        None => NaiveTime::MIN,
    };
    Ok(Some(NaiveDateTime::new(date, time).and_utc()))
}

/// Locates the index where the window begins.
///
/// Scans backward from the end of the transcript and returns the index
/// immediately after the last line whose extracted timestamp is strictly
/// before `start`. Lines without an extractable timestamp are passed over.
///
/// This is deliberately a backward linear scan, not a binary search: the
/// transcript's sortedness is assumed but never verified, and the backward
/// scan tolerates short out-of-order runs near the boundary instead of
/// landing on an arbitrary pivot inside one.
pub(crate) fn window_start_index<F>(lines: &[&str], extract: F, start: DateTime<Utc>) -> usize
where
    F: Fn(&str) -> Option<DateTime<Utc>>,
{
    for idx in (0..lines.len()).rev() {
        if let Some(ts) = extract(lines[idx]) {
            if ts < start {
                return idx + 1;
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_parse_message_datetime_four_digit_year() {
        let ts = parse_message_datetime("12/28/2024", Some("10:15 AM")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 28, 10, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_message_datetime_two_digit_year() {
        let ts = parse_message_datetime("1/5/24", Some("9:05 PM")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 21, 5, 0).unwrap());
    }

    #[test]
    fn test_parse_message_datetime_24_hour_fallback() {
        let ts = parse_message_datetime("12/28/2024", Some("21:15")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 28, 21, 15, 0).unwrap());
    }

    #[test]
    fn test_parse_message_datetime_with_seconds() {
        let ts = parse_message_datetime("12/28/2024", Some("10:15:30 AM")).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 28, 10, 15, 30).unwrap());
    }

    #[test]
    fn test_parse_message_datetime_missing_time_is_midnight() {
        let ts = parse_message_datetime("12/28/2024", None).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 12, 28, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_message_datetime_bad_date() {
        assert!(parse_message_datetime("13/45/2024", Some("10:15 AM")).is_none());
        assert!(parse_message_datetime("12-28-2024", Some("10:15 AM")).is_none());
    }

    #[test]
    fn test_from_parts_full() {
        let window = TimeWindow::from_parts(
            Some("12/28/2024"),
            Some("12:00 AM"),
            Some("12/29/2024"),
            Some("11:59 PM"),
        )
        .unwrap();
        assert_eq!(window.start, Some(ts(2024, 12, 28, 0, 0)));
        assert_eq!(window.end, Some(ts(2024, 12, 29, 23, 59)));
    }

    #[test]
    fn test_from_parts_date_only_means_midnight() {
        let window = TimeWindow::from_parts(Some("12/28/2024"), None, None, None).unwrap();
        assert_eq!(window.start, Some(ts(2024, 12, 28, 0, 0)));
        assert_eq!(window.end, None);
    }

    #[test]
    fn test_from_parts_time_without_date_is_ignored() {
        let window = TimeWindow::from_parts(None, Some("10:00 AM"), None, None).unwrap();
        assert!(window.is_unbounded());
    }

    #[test]
    fn test_from_parts_bad_date_errors() {
        let err = TimeWindow::from_parts(Some("2024-12-28"), None, None, None).unwrap_err();
        assert!(matches!(err, ShrinkError::InvalidDate { .. }));
    }

    #[test]
    fn test_from_parts_bad_time_errors() {
        let err =
            TimeWindow::from_parts(Some("12/28/2024"), Some("half past"), None, None).unwrap_err();
        assert!(matches!(err, ShrinkError::InvalidDate { what: "time", .. }));
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let window = TimeWindow::new(Some(ts(2024, 12, 28, 0, 0)), Some(ts(2024, 12, 29, 23, 59)));
        assert!(!window.precedes(ts(2024, 12, 28, 0, 0)));
        assert!(window.precedes(ts(2024, 12, 27, 23, 59)));
        assert!(!window.exceeds(ts(2024, 12, 29, 23, 59)));
        assert!(window.exceeds(ts(2024, 12, 30, 0, 0)));
    }

    #[test]
    fn test_window_start_index_sorted() {
        let lines = ["1", "2", "3", "4"];
        let stamps = [
            ts(2024, 1, 1, 0, 0),
            ts(2024, 1, 2, 0, 0),
            ts(2024, 1, 3, 0, 0),
            ts(2024, 1, 4, 0, 0),
        ];
        let extract =
            |line: &str| -> Option<DateTime<Utc>> { Some(stamps[line.parse::<usize>().ok()? - 1]) };

        assert_eq!(window_start_index(&lines, extract, ts(2024, 1, 3, 0, 0)), 2);
        assert_eq!(window_start_index(&lines, extract, ts(2024, 1, 1, 0, 0)), 0);
        assert_eq!(window_start_index(&lines, extract, ts(2024, 1, 5, 0, 0)), 4);
    }

    #[test]
    fn test_window_start_index_skips_lines_without_timestamps() {
        let stamps = [Some(ts(2024, 1, 1, 0, 0)), None, Some(ts(2024, 1, 3, 0, 0))];
        let lines = ["0", "1", "2"];
        let extract = |line: &str| stamps[line.parse::<usize>().unwrap()];
        assert_eq!(window_start_index(&lines, extract, ts(2024, 1, 2, 0, 0)), 1);
    }

    #[test]
    fn test_window_start_index_out_of_order_run() {
        // A later-than-start stamp buried before an earlier one: the backward
        // scan stops at the last line strictly before the bound, so the
        // buried out-of-order line above it is dropped with the prefix.
        let stamps = [
            ts(2024, 1, 1, 0, 0),
            ts(2024, 1, 4, 0, 0), // out of order
            ts(2024, 1, 2, 0, 0),
            ts(2024, 1, 5, 0, 0),
        ];
        let lines = ["0", "1", "2", "3"];
        let extract = |line: &str| -> Option<DateTime<Utc>> {
            Some(stamps[line.parse::<usize>().unwrap()])
        };
        assert_eq!(window_start_index(&lines, extract, ts(2024, 1, 3, 0, 0)), 3);
    }
}

// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;
pub mod visibility;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Replace literal `\n` sequences (JSON-escaped in the source system) with
/// real newlines.
pub fn unescape_newlines(s: &str) -> String {
    s.replace("\\n", "\n")
}

/// Join strings with a pipe, the separator the API's `fields` parameter uses.
pub fn pipe_join(items: &[&str]) -> String {
    items.join("|")
}

/// First instant of the given day, UTC.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Last represented instant of the given day, UTC (millisecond precision,
/// matching the backend's date handling).
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + chrono::Duration::days(1) - chrono::Duration::milliseconds(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape_newlines() {
        assert_eq!(unescape_newlines("a\\nb\\nc"), "a\nb\nc");
        assert_eq!(unescape_newlines("no escapes"), "no escapes");
    }

    #[test]
    fn test_pipe_join() {
        assert_eq!(pipe_join(&["bird", "dog", "cat"]), "bird|dog|cat");
        assert_eq!(pipe_join(&[]), "");
    }

    #[test]
    fn day_boundaries() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 15).unwrap();
        assert_eq!(
            start_of_day(date).to_rfc3339(),
            "2020-03-15T00:00:00+00:00"
        );
        assert_eq!(
            end_of_day(date).timestamp_millis(),
            start_of_day(date.succ_opt().unwrap()).timestamp_millis() - 1
        );
    }
}

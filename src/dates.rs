//! Display formatting for publication timestamps.
//!
//! Timestamps come from the API as epoch milliseconds (a JSON number or a
//! numeric string) or as a free-form date string. Both render as
//! `"Month D, YYYY"`, e.g. `"November 14, 2023"`. Formatting never fails: a
//! missing value yields [`DATE_NOT_AVAILABLE`] and anything unparseable yields
//! [`INVALID_DATE`].

use crate::models::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

pub const DATE_NOT_AVAILABLE: &str = "Date not available";
pub const INVALID_DATE: &str = "Invalid date";

const DISPLAY_FORMAT: &str = "%B %-d, %Y";

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%d %B %Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Format an optional timestamp for display.
///
/// # Examples
///
/// ```ignore
/// let ts = Timestamp::Text("1700000000000".into());
/// assert_eq!(format_date(Some(&ts)), "November 14, 2023");
/// assert_eq!(format_date(None), "Date not available");
/// ```
pub fn format_date(timestamp: Option<&Timestamp>) -> String {
    let Some(ts) = timestamp.filter(|t| !t.is_blank()) else {
        return DATE_NOT_AVAILABLE.to_string();
    };
    match to_datetime(ts) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => {
            debug!(?ts, "Unparseable timestamp");
            INVALID_DATE.to_string()
        }
    }
}

/// Epoch milliseconds for ordering, if the timestamp parses at all.
pub fn sort_key(timestamp: &Timestamp) -> Option<i64> {
    to_datetime(timestamp).map(|dt| dt.timestamp_millis())
}

fn to_datetime(ts: &Timestamp) -> Option<DateTime<Utc>> {
    match ts {
        Timestamp::Integer(ms) => DateTime::from_timestamp_millis(*ms),
        Timestamp::Float(ms) if ms.is_finite() => DateTime::from_timestamp_millis(ms.trunc() as i64),
        Timestamp::Float(_) => None,
        Timestamp::Text(raw) => {
            let raw = raw.trim();
            match raw.parse::<i64>() {
                Ok(ms) => DateTime::from_timestamp_millis(ms),
                Err(_) => parse_date_string(raw),
            }
        }
    }
}

fn parse_date_string(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

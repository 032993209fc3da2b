//! Timestamp parsing at the data-access boundary
//!
//! Rows arrive with loosely formatted date strings. They are converted once,
//! here, and everything past the adapters sees `Option<DateTime<Utc>>`.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 (`2024-06-10T00:00:00Z`, with or without offset) and bare
/// `YYYY-MM-DD` dates (midnight UTC). Empty or unparseable input is `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    // PostgREST renders timestamptz as "2024-06-10T00:00:00+00:00" but older
    // rows were written with a space separator
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
        return Some(ts.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

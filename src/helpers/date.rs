//! Publish-date parsing and formatting
//!
//! The bucket stores `published_date` as a plain string, usually
//! `YYYY-MM-DD` but occasionally a full RFC 3339 instant. Both forms are
//! accepted; anything else is treated like a missing date.

use chrono::{DateTime, NaiveDate, Utc};

/// Parse a raw publish date into an instant.
///
/// Bare dates are taken as midnight UTC.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Publish instant as a Unix timestamp for sorting.
///
/// Missing or unparseable dates count as the epoch, so they land behind
/// every dated post in a newest-first list.
pub fn published_timestamp(raw: Option<&str>) -> i64 {
    raw.and_then(parse_published)
        .map(|dt| dt.timestamp())
        .unwrap_or(0)
}

/// Short display form, like "Mar 1, 2024".
///
/// Returns `None` when the raw value does not parse; callers render
/// nothing in that case.
pub fn format_short(raw: &str) -> Option<String> {
    parse_published(raw).map(|dt| dt.format("%b %-d, %Y").to_string())
}

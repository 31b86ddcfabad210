use crate::error::{DashboardError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a `datetimeUtc` cell into a UTC timestamp
///
/// Offsets are converted to UTC; naive values are taken as UTC; a bare date
/// means midnight.
///
/// # Examples
/// ```
/// use aq_dashboard::utils::parse_timestamp;
/// use chrono::Timelike;
///
/// let ts = parse_timestamp("2024-03-05T10:00:00+05:30").unwrap();
/// assert_eq!(ts.hour(), 4);
/// ```
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(DashboardError::TimestampParse(raw.to_string()));
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }

    // "2024-01-01 00:00:00+00:00" style
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%:z") {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| DashboardError::TimestampParse(raw.to_string()))
}

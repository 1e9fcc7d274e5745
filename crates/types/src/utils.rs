//! Utility functions and helpers

use chrono::{DateTime, SecondsFormat, Utc};

/// Current wall-clock time as an ISO-8601 UTC string with millisecond precision
pub fn now_iso8601() -> String {
    format_timestamp(&Utc::now())
}

/// Format a timestamp as `2024-01-01T12:00:00.000Z`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

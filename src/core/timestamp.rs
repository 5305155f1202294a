//! Time and duration rendering
//!
//! Provides the timestamp formats a formatter can stamp a message with, and
//! the canonical textual forms used when rendering time and duration
//! attribute values.

use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::time::Duration;

/// Timestamp format used for the "occurred at" line of a message
///
/// # Examples
///
/// ```
/// use slack_log_sink::core::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let time = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&time), "2025-01-08T10:30:45Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// Local wall-clock time: `10:30:45AM +01:00`
    ///
    /// This is the default, the message timestamp is read by people.
    #[default]
    LocalClock,

    /// RFC 3339 in UTC with second precision: `2025-01-08T10:30:45Z`
    Rfc3339,

    /// ISO 8601 in UTC with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Custom strftime format, applied to local time
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::LocalClock => datetime
                .with_timezone(&Local)
                .format("%I:%M:%S%p %Z")
                .to_string(),
            TimestampFormat::Rfc3339 => format_rfc3339(datetime),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::Custom(format_str) => {
                // invalid specifiers surface as a fmt error rather than a panic here
                let mut out = String::new();
                let local = datetime.with_timezone(&Local);
                match write!(out, "{}", local.format(format_str)) {
                    Ok(()) => out,
                    Err(_) => format_rfc3339(datetime),
                }
            }
        }
    }
}

/// UTC RFC 3339 form used for time-valued attributes
pub fn format_rfc3339(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Canonical textual form of a duration: `5s`, `1m30s`, `1h0m0s`, `1.5ms`, `250ns`
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }
    if nanos < 1_000_000 {
        return format!("{}µs", scaled(nanos, 1_000));
    }
    if nanos < 1_000_000_000 {
        return format!("{}ms", scaled(nanos, 1_000_000));
    }

    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds_nanos =
        u128::from(total_secs % 60) * 1_000_000_000 + u128::from(duration.subsec_nanos());

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{}h{}m", hours, minutes));
    } else if minutes > 0 {
        out.push_str(&format!("{}m", minutes));
    }
    out.push_str(&scaled(seconds_nanos, 1_000_000_000));
    out.push('s');
    out
}

/// `value / unit` as a decimal with trailing zeros trimmed
fn scaled(value: u128, unit: u128) -> String {
    let whole = value / unit;
    let fraction = value % unit;
    if fraction == 0 {
        return whole.to_string();
    }

    let width = unit.to_string().len() - 1;
    let digits = format!("{:0width$}", fraction, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}

//! Timestamp formatting utilities
//!
//! Renders the `time` field of a record. The default is RFC 3339 at second
//! precision in UTC, which sorts lexically in emission order. Any
//! strftime-compatible layout can replace it.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use leveled_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::default().format(&at), "2025-01-08T10:30:45Z");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with second precision: `2025-01-08T10:30:45Z`
    #[default]
    Rfc3339,

    /// RFC 3339 with as many sub-second digits as needed:
    /// `2025-01-08T10:30:45.123456Z`
    Rfc3339Nano,

    /// ISO 8601 with milliseconds and numeric offset: `2025-01-08T10:30:45.123+0000`
    Iso8601,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime layout
    ///
    /// Validate with [`TimestampFormat::validate`] before use; the logger
    /// builder does this and rejects malformed layouts.
    Custom(String),
}

impl TimestampFormat {
    /// Custom layout from a strftime string, rejecting malformed specifiers.
    ///
    /// ```
    /// use leveled_logger::TimestampFormat;
    ///
    /// assert!(TimestampFormat::layout("%Y-%m-%d %H:%M:%S%.3f").is_ok());
    /// assert!(TimestampFormat::layout("%Y-%Q").is_err());
    /// ```
    pub fn layout(layout: impl Into<String>) -> Result<Self> {
        let format = TimestampFormat::Custom(layout.into());
        format.validate()?;
        Ok(format)
    }

    /// Check that a custom layout only contains known specifiers.
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(layout) = self {
            if StrftimeItems::new(layout).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "time_format",
                    format!("invalid strftime layout '{}'", layout),
                ));
            }
        }
        Ok(())
    }

    /// Format a `DateTime<Utc>` according to this format
    ///
    /// A custom layout that fails to render falls back to RFC 3339 rather
    /// than panicking.
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Rfc3339Nano => datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(layout) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(layout)) {
                    Ok(()) => out,
                    Err(_) => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
                }
            }
        }
    }

    /// Check if this is a numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixMillis)
    }
}

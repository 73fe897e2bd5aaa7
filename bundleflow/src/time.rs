//! Timestamps and watermark bounds.

use chrono::{DateTime, Utc};

/// Event-time and processing-time instants.
pub type Timestamp = DateTime<Utc>;

/// The earliest representable timestamp. Used as the "no progress yet" watermark.
pub const MIN_TIMESTAMP: Timestamp = DateTime::<Utc>::MIN_UTC;

/// The latest representable timestamp. A watermark here means "complete".
pub const MAX_TIMESTAMP: Timestamp = DateTime::<Utc>::MAX_UTC;

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Builds a timestamp from milliseconds since the Unix epoch.
///
/// Out-of-range values saturate to [`MIN_TIMESTAMP`] / [`MAX_TIMESTAMP`].
#[must_use]
pub fn from_millis(millis: i64) -> Timestamp {
    DateTime::from_timestamp_millis(millis).unwrap_or(if millis < 0 {
        MIN_TIMESTAMP
    } else {
        MAX_TIMESTAMP
    })
}

/// Formats a timestamp as RFC 3339 with microsecond precision.
#[must_use]
pub fn format_iso8601(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_ordered() {
        assert!(MIN_TIMESTAMP < now_utc());
        assert!(now_utc() < MAX_TIMESTAMP);
    }

    #[test]
    fn test_from_millis() {
        assert_eq!(from_millis(0).timestamp_millis(), 0);
        assert_eq!(from_millis(1_500).timestamp_millis(), 1_500);
        assert_eq!(from_millis(i64::MAX), MAX_TIMESTAMP);
        assert_eq!(from_millis(i64::MIN), MIN_TIMESTAMP);
    }

    #[test]
    fn test_format_iso8601() {
        assert_eq!(format_iso8601(&from_millis(0)), "1970-01-01T00:00:00.000000+00:00");
    }
}

use chrono::{DateTime, FixedOffset};

use crate::error::{ExporterError, Result};

/// Tracker timestamp layout, e.g. `2024-01-03T09:15:00.000+0100`.
pub const TRACKER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// Parse a tracker timestamp, keeping its offset.
pub fn parse_tracker_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, TRACKER_TIME_FORMAT).map_err(|e| {
        ExporterError::TimestampParse {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

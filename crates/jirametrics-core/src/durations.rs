//! Time-in-status aggregation.
//!
//! Walks an issue's changelog oldest-first and charges the time between
//! consecutive status transitions to the status that was left:
//!
//! ```text
//! created ──── A ────> T1 (A→B) ──── B ────> T2 (B→C) ──── C ────> now
//!          A += T1-T0             B += T2-T1             (not counted)
//! ```
//!
//! The initial status is never recorded as such by the tracker. It is inferred
//! from the `fromString` of the first status change, so the interval from
//! creation to that change is charged to it. The interval after the last
//! transition is open and is not measured; an issue that never changed status
//! therefore has no durations at all.
//!
//! Timestamps are compared as instants, so histories mixing offsets are fine.
//! A history that goes backwards in time yields a negative contribution; the
//! tracker does not produce those.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use crate::error::{ExporterError, Result};
use crate::tracker::{parse_tracker_timestamp, ChangeItem, ChangelogEntry, Issue};

/// Status name -> hours spent in it (completed intervals only).
pub type StatusDurations = BTreeMap<String, f64>;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Entries oldest-first. The tracker delivers them newest-first.
pub fn chronological(entries: &[ChangelogEntry]) -> Vec<&ChangelogEntry> {
    entries.iter().rev().collect()
}

/// Hours spent in each status `issue` has left.
///
/// Fails on the first unparsable timestamp or non-string status value; there is
/// no partial result.
pub fn status_durations(issue: &Issue) -> Result<StatusDurations> {
    let mut durations = StatusDurations::new();
    let mut cursor = parse_tracker_timestamp(&issue.fields.created)?;

    for entry in chronological(&issue.changelog.histories) {
        let changed_at = parse_tracker_timestamp(&entry.created)?;
        for item in entry.items.iter().filter(|i| i.is_status_change()) {
            let left = previous_status(&issue.key, item)?;
            *durations.entry(left.to_string()).or_insert(0.0) += hours_between(cursor, changed_at);
            cursor = changed_at;
        }
    }

    Ok(durations)
}

/// The status a transition left. Anything but a JSON string is a broken
/// contract with the tracker.
fn previous_status<'a>(issue: &str, item: &'a ChangeItem) -> Result<&'a str> {
    item.from_string.as_str().ok_or_else(|| {
        ExporterError::Decode(format!(
            "issue {issue}: status change fromString must be a string, got {}",
            item.from_string
        ))
    })
}

fn hours_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    to.signed_duration_since(from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

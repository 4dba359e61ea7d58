//! Tracker wire models (Jira Cloud REST v3).
//!
//! - `issue`: search results with expanded changelog.
//! - `status`: workflow statuses and the name -> category catalog.
//! - `timestamp`: the fixed timestamp format used in both.
//!
//! Models decode leniently (unknown fields ignored, nullable objects default)
//! because the tracker adds fields freely. The one strict point is the
//! `fromString` of a status change, checked when the aggregator reads it.

pub mod issue;
pub mod status;
pub mod timestamp;

pub use issue::{ChangeItem, Changelog, ChangelogEntry, Issue, IssueFields, SearchPage};
pub use status::{StatusCatalog, TrackerStatus};
pub use timestamp::parse_tracker_timestamp;

//! Tracker access (Jira Cloud REST v3).
//!
//! `TrackerApi` is the seam between the refresh cycle and the network:
//! `JiraClient` implements it over HTTP, tests use an in-memory fake.

pub mod catalog;
pub mod client;
pub mod fetcher;
pub mod query;

#[cfg(test)]
pub(crate) mod fake;

pub use catalog::build_status_catalog;
pub use client::{JiraClient, Myself, TrackerApi};
pub use fetcher::fetch_all_issues;
pub use query::build_issue_search_jql;

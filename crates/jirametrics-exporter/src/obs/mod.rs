//! Lightweight in-process metrics (no registry crate).
//!
//! Series are stored in `DashMap`s and rendered as Prometheus text by the
//! `/metrics` handler.

pub mod metrics;

pub use metrics::{ExporterMetrics, IssueMetrics};

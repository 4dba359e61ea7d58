//! jirametrics core: tracker wire models, error types, and the status-duration
//! aggregator.
//!
//! This crate holds everything that can be reasoned about without a network:
//! the JSON shapes the tracker returns, timestamp parsing, and the walk over an
//! issue's changelog that turns transitions into hours per status. It carries no
//! HTTP or runtime dependencies so the algorithm can be tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed tracker data must surface as `ExporterError` so one bad record
//! aborts a refresh cycle instead of the process.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod durations;
pub mod error;
pub mod tracker;

/// Shared result type.
pub use error::{ErrorKind, ExporterError, Result};

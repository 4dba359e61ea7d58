//! Jira metrics exporter library entry.
//!
//! Wires config, the tracker client, the refresh cycle and the HTTP surface
//! together. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod publish;
pub mod refresh;
pub mod router;
pub mod tracker;

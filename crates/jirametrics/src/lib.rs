//! Top-level facade crate for the Jira metrics exporter.
//!
//! Re-exports the domain core and the exporter library so users can depend on a single crate.

pub mod core {
    pub use jirametrics_core::*;
}

pub mod exporter {
    pub use jirametrics_exporter::*;
}

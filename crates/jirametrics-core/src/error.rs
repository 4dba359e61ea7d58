//! Shared error type across jirametrics crates.

use thiserror::Error;

/// Error categories (stable, used as metric label values).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or malformed configuration.
    Config,
    /// Network failure, timeout, or non-success HTTP status from the tracker.
    Fetch,
    /// Response body does not match the expected shape.
    Decode,
    /// Changelog or creation timestamp could not be parsed.
    TimestampParse,
    /// History references a status the catalog does not know.
    UnknownStatus,
    /// Internal invariant broken.
    Internal,
}

impl ErrorKind {
    /// String representation used in logs and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Config => "config",
            ErrorKind::Fetch => "fetch",
            ErrorKind::Decode => "decode",
            ErrorKind::TimestampParse => "timestamp_parse",
            ErrorKind::UnknownStatus => "unknown_status",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ExporterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("config: {0}")]
    Config(String),
    #[error("fetch failed: {0}")]
    Fetch(String),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("invalid timestamp {value:?}: {reason}")]
    TimestampParse { value: String, reason: String },
    #[error("issue {issue}: status {status:?} missing from status catalog")]
    UnknownStatus { issue: String, status: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl ExporterError {
    /// Map the error to its category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExporterError::Config(_) => ErrorKind::Config,
            ExporterError::Fetch(_) => ErrorKind::Fetch,
            ExporterError::Decode(_) => ErrorKind::Decode,
            ExporterError::TimestampParse { .. } => ErrorKind::TimestampParse,
            ExporterError::UnknownStatus { .. } => ErrorKind::UnknownStatus,
            ExporterError::Internal(_) => ErrorKind::Internal,
        }
    }
}

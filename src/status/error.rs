//! Error types for status collection.
//!
//! Source and classification errors never leave the refresh pipeline: they
//! are logged and folded into an `Unknown` result.

use thiserror::Error;

/// Why the primary status source produced no verdict.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// Request timeout
    #[error("request timeout after {0}s")]
    Timeout(u64),

    /// Connection failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Non-success HTTP status
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Anti-bot block or challenge page
    #[error("blocked by source: {0}")]
    Blocked(String),

    /// Page fetched but no indicator sentence found
    #[error("no status indicator in response")]
    NoIndicator,
}

/// Why the fallback classifier produced no verdict.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("fallback classification disabled")]
    Disabled,

    /// No API key in the configured environment variable
    #[error("no credential in ${0}")]
    MissingCredential(String),

    #[error("request timeout after {0}s")]
    Timeout(u64),

    #[error("request failed: {0}")]
    Request(String),

    #[error("provider error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors surfaced by [`StatusCache`](super::StatusCache).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatusError {
    #[error("service not tracked: {0}")]
    UntrackedService(String),
}

//! Error types for the Sleeper client core
//!
//! Provides unified error handling using thiserror. Every failure that
//! leaves the client is one of these variants; retryable outcomes are
//! resolved inside the retry loop and never surface directly.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

// == Sleeper Error Enum ==
/// Unified error type for upstream calls and cache access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SleeperError {
    /// The upstream reported an unambiguous absence (404, `null` body, empty week)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Retry budget exhausted after repeated 429/5xx responses
    #[error(
        "Rate limited after {attempts} attempts (last status {last_status:?}), retry after {}s",
        retry_after.as_secs_f64()
    )]
    RateLimited {
        retry_after: Duration,
        attempts: u32,
        last_status: Option<u16>,
    },

    /// Body could not be decoded or failed shape validation
    #[error("Malformed response from {endpoint}: {reason}")]
    MalformedResponse { endpoint: String, reason: String },

    /// Transport-level failure (connect, timeout, broken body stream)
    #[error("Network error calling {endpoint} after {attempts} attempt(s): {reason}")]
    NetworkError {
        endpoint: String,
        reason: String,
        attempts: u32,
    },

    /// Upstream refused the request with a 4xx other than 404/429
    #[error("Upstream rejected {endpoint} with status {status}")]
    UpstreamRejected { endpoint: String, status: u16 },

    /// Request rejected locally before any I/O
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == Error Kind ==
/// Coarse classification carried across the client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    RateLimited,
    MalformedResponse,
    NetworkError,
    UpstreamRejected,
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not-found",
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::MalformedResponse => "malformed-response",
            ErrorKind::NetworkError => "network-error",
            ErrorKind::UpstreamRejected => "upstream-rejected",
            ErrorKind::InvalidRequest => "invalid-request",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SleeperError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SleeperError::NotFound(_) => ErrorKind::NotFound,
            SleeperError::RateLimited { .. } => ErrorKind::RateLimited,
            SleeperError::MalformedResponse { .. } => ErrorKind::MalformedResponse,
            SleeperError::NetworkError { .. } => ErrorKind::NetworkError,
            SleeperError::UpstreamRejected { .. } => ErrorKind::UpstreamRejected,
            SleeperError::InvalidRequest(_) => ErrorKind::InvalidRequest,
        }
    }

    /// Wait hint the caller can relay to the user, present only when rate limited.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SleeperError::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    pub(crate) fn malformed(endpoint: impl Into<String>, reason: impl fmt::Display) -> Self {
        SleeperError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client core.
pub type Result<T> = std::result::Result<T, SleeperError>;

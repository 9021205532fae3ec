//! Request Outcome Module
//!
//! Classification of a single upstream attempt. Drives the retry loop and
//! is never stored.

use std::time::Duration;

use crate::error::SleeperError;

// == Request Outcome ==
#[derive(Debug)]
pub enum RequestOutcome<T> {
    Success(T),
    Retryable(RetryableFailure),
    Fatal(SleeperError),
}

// == Retryable Failure ==
/// Why an attempt may succeed if repeated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryableFailure {
    /// 429 or 5xx
    Status { endpoint: String, status: u16 },
    /// Connect failure or timeout, only when transport retries are enabled
    Transport { endpoint: String, reason: String },
}

impl RetryableFailure {
    /// Converts the last failure into the error surfaced on exhaustion.
    pub fn into_exhausted(self, retry_after: Duration, attempts: u32) -> SleeperError {
        match self {
            RetryableFailure::Status { status, .. } => SleeperError::RateLimited {
                retry_after,
                attempts,
                last_status: Some(status),
            },
            RetryableFailure::Transport { endpoint, reason } => SleeperError::NetworkError {
                endpoint,
                reason,
                attempts,
            },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            RetryableFailure::Status { status, .. } => Some(*status),
            RetryableFailure::Transport { .. } => None,
        }
    }
}

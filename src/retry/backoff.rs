//! Backoff Controller
//!
//! Pure retry bookkeeping: whether another attempt is allowed and how long
//! to wait before it. Nothing here sleeps.

use std::time::Duration;

use crate::config::ClientConfig;

// == Backoff Policy ==
/// Exponential backoff: `delay(attempt) = base_delay * 2^attempt`, capped at
/// `max_delay`. Attempts are zero-indexed, so a 1s base yields 1s, 2s, 4s...
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub base_delay: Duration,
    pub max_delay: Duration,
    /// Retries permitted after the initial attempt
    pub max_attempts: u32,
}

impl BackoffPolicy {
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay,
            max_delay: Duration::from_secs(60),
            max_attempts,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            base_delay: config.retry_base_delay,
            max_delay: config.retry_max_delay,
            max_attempts: config.max_retries,
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before the retry numbered `attempt` (zero-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(Duration::MAX)
            .min(self.max_delay)
    }

    /// Wait hint reported once the budget is spent: the delay of the final
    /// permitted retry, or the first delay when no retries are permitted.
    pub fn exhausted_hint(&self) -> Duration {
        self.delay_for(self.max_attempts.saturating_sub(1))
    }

    pub fn start(&self) -> RetryState {
        RetryState::new(self.max_attempts)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 3)
    }
}

// == Retry Decision ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait this long, then try again
    RetryAfter(Duration),
    /// Budget spent; `retry_after` is the hint to relay outward
    Exhausted { retry_after: Duration },
}

// == Retry State ==
/// Per-request retry counter. Created fresh for each logical request and
/// dropped once it resolves; never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
    max_attempts: u32,
}

impl RetryState {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            attempt: 0,
            max_attempts,
        }
    }

    /// Retries consumed so far.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Total requests sent so far, counting the initial one.
    pub fn requests_made(&self) -> u32 {
        self.attempt + 1
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn can_retry(&self) -> bool {
        self.attempt < self.max_attempts
    }

    /// Records a retryable failure and decides what happens next.
    pub fn on_retryable_failure(&mut self, policy: &BackoffPolicy) -> RetryDecision {
        if self.can_retry() {
            let delay = policy.delay_for(self.attempt);
            self.attempt += 1;
            RetryDecision::RetryAfter(delay)
        } else {
            RetryDecision::Exhausted {
                retry_after: policy.exhausted_hint(),
            }
        }
    }
}

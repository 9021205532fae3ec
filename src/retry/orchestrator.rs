//! Retry Orchestrator
//!
//! The single retry loop used by every endpoint call.

use std::future::Future;

use tracing::warn;

use crate::error::Result;
use crate::retry::{BackoffPolicy, RequestOutcome, RetryDecision};

// == Retry Orchestrator ==
#[derive(Debug, Clone, Copy)]
pub struct RetryOrchestrator {
    policy: BackoffPolicy,
}

impl RetryOrchestrator {
    pub fn new(policy: BackoffPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }

    /// Runs `attempt` until it succeeds, fails fatally, or the retry budget
    /// is spent.
    ///
    /// `attempt` receives the zero-based retry index. Between retryable
    /// failures the task sleeps on the tokio timer, so other requests keep
    /// running and dropping the returned future cancels any pending wait.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = RequestOutcome<T>>,
    {
        let mut state = self.policy.start();

        loop {
            let failure = match attempt(state.attempt()).await {
                RequestOutcome::Success(value) => return Ok(value),
                RequestOutcome::Fatal(err) => return Err(err),
                RequestOutcome::Retryable(failure) => failure,
            };

            match state.on_retryable_failure(&self.policy) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(
                        attempt = state.attempt(),
                        max_attempts = state.max_attempts(),
                        status = ?failure.status(),
                        delay_ms = delay.as_millis() as u64,
                        "upstream request failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted { retry_after } => {
                    return Err(failure.into_exhausted(retry_after, state.requests_made()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, SleeperError};
    use crate::retry::RetryableFailure;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    fn throttled() -> RetryableFailure {
        RetryableFailure::Status {
            endpoint: "/test".into(),
            status: 429,
        }
    }

    fn orchestrator(max_attempts: u32) -> RetryOrchestrator {
        RetryOrchestrator::new(BackoffPolicy::new(Duration::from_secs(1), max_attempts))
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_delays_and_retry_after() {
        let started = Instant::now();
        let calls: Arc<Mutex<Vec<Duration>>> = Arc::default();

        let result: Result<()> = orchestrator(3)
            .run(|_| {
                let calls = calls.clone();
                async move {
                    calls.lock().unwrap().push(started.elapsed());
                    RequestOutcome::Retryable(throttled())
                }
            })
            .await;

        let calls = calls.lock().unwrap().clone();
        // Initial try at t=0, then retries after 1s, 2s and 4s
        assert_eq!(
            calls,
            vec![
                Duration::ZERO,
                Duration::from_secs(1),
                Duration::from_secs(3),
                Duration::from_secs(7),
            ]
        );

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(
            err,
            SleeperError::RateLimited {
                retry_after: Duration::from_secs(4),
                attempts: 4,
                last_status: Some(429),
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_stops_retrying() {
        let mut calls = 0u32;

        let result = orchestrator(3)
            .run(|attempt| {
                calls += 1;
                async move {
                    if attempt < 2 {
                        RequestOutcome::Retryable(throttled())
                    } else {
                        RequestOutcome::Success(attempt)
                    }
                }
            })
            .await;

        assert_eq!(result, Ok(2));
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_try_success_never_waits() {
        let started = Instant::now();
        let result = orchestrator(3)
            .run(|_| async { RequestOutcome::Success("ok") })
            .await;

        assert_eq!(result, Ok("ok"));
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fatal_failure_is_not_retried() {
        let mut calls = 0u32;
        let result: Result<()> = orchestrator(3)
            .run(|_| {
                calls += 1;
                async { RequestOutcome::Fatal(SleeperError::NotFound("league 0".into())) }
            })
            .await;

        assert_eq!(calls, 1);
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_last_permitted_attempt() {
        let result = orchestrator(3)
            .run(|attempt| async move {
                if attempt == 3 {
                    RequestOutcome::Success(())
                } else {
                    RequestOutcome::Retryable(throttled())
                }
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_cancels_pending_backoff() {
        let started = Instant::now();
        let orchestrator = orchestrator(3);
        let run = orchestrator.run(|_| async { RequestOutcome::<()>::Retryable(throttled()) });

        let outcome = tokio::time::timeout(Duration::from_millis(1500), run).await;

        assert!(outcome.is_err(), "timeout should fire mid-backoff");
        assert_eq!(started.elapsed(), Duration::from_millis(1500));
    }
}

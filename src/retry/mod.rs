//! Retry Module
//!
//! Backoff bookkeeping, the retry loop built on it, and client-side pacing.

mod backoff;
mod orchestrator;
mod outcome;
mod pacer;

pub use backoff::{BackoffPolicy, RetryDecision, RetryState};
pub use orchestrator::RetryOrchestrator;
pub use outcome::{RequestOutcome, RetryableFailure};
pub use pacer::RequestPacer;

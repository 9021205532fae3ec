//! Request Pacer
//!
//! Client-side budget on how many requests start per minute, with an
//! optional minimum spacing between starts.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
    next_free: Instant,
}

// == Request Pacer ==
/// Fixed one-minute window limiter.
///
/// A caller reserves a start slot under a short synchronous lock and then
/// sleeps outside it, so requests waiting for a later slot never stop
/// others from reserving theirs.
#[derive(Debug)]
pub struct RequestPacer {
    per_minute: u32,
    min_interval: Duration,
    window: Mutex<Window>,
}

impl RequestPacer {
    /// `per_minute == 0` disables the budget.
    pub fn new(per_minute: u32) -> Self {
        let now = Instant::now();
        Self {
            per_minute,
            min_interval: Duration::ZERO,
            window: Mutex::new(Window {
                started: now,
                count: 0,
                next_free: now,
            }),
        }
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.per_minute > 0 || !self.min_interval.is_zero()
    }

    /// Claims the next start slot without waiting for it.
    pub fn reserve(&self) -> Instant {
        let now = Instant::now();
        let mut window = match self.window.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let mut slot = now.max(window.next_free);
        if slot >= window.started + WINDOW {
            window.started = slot;
            window.count = 0;
        }
        if self.per_minute > 0 && window.count >= self.per_minute {
            slot = window.started + WINDOW;
            window.started = slot;
            window.count = 0;
        }

        window.count += 1;
        window.next_free = slot + self.min_interval;
        slot
    }

    /// Waits until this caller may start a request.
    pub async fn acquire(&self) {
        if !self.is_enabled() {
            return;
        }
        let slot = self.reserve();
        if slot > Instant::now() {
            debug!(
                wait_ms = slot.saturating_duration_since(Instant::now()).as_millis() as u64,
                "request budget spent, pacing"
            );
            tokio::time::sleep_until(slot).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_within_budget_does_not_wait() {
        let pacer = RequestPacer::new(3);
        let started = Instant::now();

        for _ in 0..3 {
            pacer.acquire().await;
        }
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_over_budget_waits_for_next_window() {
        let pacer = RequestPacer::new(2);
        let started = Instant::now();

        pacer.acquire().await;
        pacer.acquire().await;
        pacer.acquire().await;

        assert_eq!(started.elapsed(), WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reservations_do_not_share_slots() {
        let pacer = RequestPacer::new(1);
        let first = pacer.reserve();
        let second = pacer.reserve();
        let third = pacer.reserve();

        assert_eq!(second, first + WINDOW);
        assert_eq!(third, second + WINDOW);
    }

    #[tokio::test(start_paused = true)]
    async fn test_min_interval_spacing() {
        let pacer = RequestPacer::new(0).with_min_interval(Duration::from_millis(250));
        let first = pacer.reserve();
        let second = pacer.reserve();
        assert_eq!(second - first, Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_pacer_is_noop() {
        let pacer = RequestPacer::new(0);
        assert!(!pacer.is_enabled());
        let started = Instant::now();
        for _ in 0..1000 {
            pacer.acquire().await;
        }
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}

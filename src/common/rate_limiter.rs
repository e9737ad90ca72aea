//! Token-bucket rate limiting for provider requests
//!
//! CryptoCompare meters free-tier keys aggressively; the client acquires a
//! slot before every request so bursts of dashboard refreshes stay inside
//! the per-second budget.

use std::sync::Arc;
use tokio::sync::{Mutex, Semaphore};
use tokio::time::{sleep, Duration, Instant};

/// Poll interval while waiting for the bucket to refill
const WAIT_SLICE: Duration = Duration::from_millis(50);

/// Fixed-window token bucket: `requests_per_second` permits, refilled once
/// the window elapses.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Arc<Semaphore>,
    max_permits: usize,
    window: Duration,
    last_refill: Mutex<Instant>,
}

impl RateLimiter {
    pub fn per_second(requests: usize) -> Self {
        let max_permits = requests.max(1);
        RateLimiter {
            permits: Arc::new(Semaphore::new(max_permits)),
            max_permits,
            window: Duration::from_secs(1),
            last_refill: Mutex::new(Instant::now()),
        }
    }

    /// Wait until a request slot is available
    pub async fn acquire(&self) {
        loop {
            self.refill_if_elapsed().await;
            if let Ok(permit) = self.permits.try_acquire() {
                // Consumed permits come back via refill, not on drop
                permit.forget();
                return;
            }
            sleep(WAIT_SLICE).await;
        }
    }

    async fn refill_if_elapsed(&self) {
        let mut last = self.last_refill.lock().await;
        if last.elapsed() >= self.window {
            let missing = self.max_permits - self.permits.available_permits();
            self.permits.add_permits(missing);
            *last = Instant::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permits_within_budget_do_not_block() {
        let limiter = RateLimiter::per_second(3);
        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert_eq!(limiter.permits.available_permits(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bucket_refills_after_window() {
        let limiter = RateLimiter::per_second(1);
        limiter.acquire().await;

        // Next acquire must wait for the window to roll over
        tokio::time::advance(Duration::from_secs(1)).await;
        limiter.acquire().await;
    }

    #[test]
    fn test_zero_rate_is_clamped_to_one() {
        let limiter = RateLimiter::per_second(0);
        assert_eq!(limiter.max_permits, 1);
    }
}

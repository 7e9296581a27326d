//! Shared minimum-interval rate limiter
//!
//! Scryfall asks for at most ~10 requests/second, so every outbound call
//! goes through one shared limiter. The lock is held across the sleep:
//! concurrent callers queue up and each observes the previous caller's
//! departure time, so two callers can never both decide "no wait needed".

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Enforces a minimum spacing between consecutive calls
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the minimum interval since the previous call has elapsed,
    /// then claim the current instant as the new "last call"
    pub async fn acquire(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

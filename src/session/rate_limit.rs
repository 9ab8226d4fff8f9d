//! Minimum inter-request spacing
//!
//! The upstream both rate-limits and serves best under ordered, low-concurrency
//! access, so there is exactly one in-flight request per session. The limiter
//! only needs to remember when the previous request finished, not a counting or
//! queueing scheme.

use std::sync::Mutex;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Enforces a minimum delay since the completion of the previous request.
#[derive(Debug)]
pub struct RateLimiter {
    min_delay: Option<Duration>,
    last_finished: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter. `None` or a zero delay disables pacing entirely.
    pub fn new(min_delay: Option<Duration>) -> Self {
        Self {
            min_delay: min_delay.filter(|d| !d.is_zero()),
            last_finished: Mutex::new(None),
        }
    }

    /// Wait until the configured spacing since the last completion has passed.
    ///
    /// The first call never waits.
    pub async fn pace(&self) {
        let Some(min_delay) = self.min_delay else {
            return;
        };
        let wait = {
            let last = self
                .last_finished
                .lock()
                .expect("rate limiter state poisoned");
            last.map(|at| min_delay.saturating_sub(at.elapsed()))
        };
        if let Some(wait) = wait {
            if !wait.is_zero() {
                debug!(?wait, "pacing before next request");
                sleep(wait).await;
            }
        }
    }

    /// Record that a request just finished.
    pub fn mark(&self) {
        if self.min_delay.is_some() {
            *self
                .last_finished
                .lock()
                .expect("rate limiter state poisoned") = Some(Instant::now());
        }
    }
}

//! Fixed-window rate limiter keyed by caller.
//!
//! Guards order placement from the console. State is process-local and forgotten on
//! restart. Expired windows are dropped on every check, so the map only holds callers
//! seen within the last window.

use crate::errors::{Error, Result};
use std::{
    collections::HashMap,
    time::{Duration, Instant},
};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    resets_at: Instant,
}

/// Outcome of an allowed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Requests still allowed in the current window
    pub remaining: u32,
    /// Time until the window resets
    pub resets_in: Duration,
}

/// Allows `limit` requests per key in each window of length `window`.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    /// Creates a limiter allowing `limit` requests per `window` for each key.
    #[must_use]
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request for `key` now.
    ///
    /// # Errors
    /// Returns [`Error::RateLimited`] when the key has used up its window.
    pub async fn check(&self, key: &str) -> Result<RateLimitStatus> {
        self.check_at(key, Instant::now()).await
    }

    /// Records a request for `key` at `now`.
    pub async fn check_at(&self, key: &str, now: Instant) -> Result<RateLimitStatus> {
        let mut windows = self.windows.lock().await;
        windows.retain(|_, w| w.resets_at > now);

        let window = windows
            .entry(key.to_string())
            .or_insert(Window {
                count: 0,
                resets_at: now + self.window,
            });

        let resets_in = window.resets_at.saturating_duration_since(now);
        if window.count >= self.limit {
            warn!(key, "Rate limit exceeded");
            return Err(Error::RateLimited {
                retry_after_secs: resets_in.as_secs().max(1),
            });
        }

        window.count += 1;
        Ok(RateLimitStatus {
            remaining: self.limit - window.count,
            resets_in,
        })
    }
}

//! Guess Rate Limiting
//!
//! Enforces a minimum interval between accepted guesses per player.
//! Runs before the evaluator, so a rejected call never costs an attempt.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Call arrived before the interval elapsed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("too fast, retry in {}ms", retry_after.as_millis())]
pub struct RateLimited {
    /// Time until the next call is accepted.
    pub retry_after: Duration,
}

/// Per-key minimum-interval limiter.
#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_accepted: Mutex<BTreeMap<String, Instant>>,
}

impl RateLimiter {
    /// Create a limiter.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(BTreeMap::new()),
        }
    }

    /// Configured interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Accept or reject a call for `key` now.
    pub fn check(&self, key: &str) -> Result<(), RateLimited> {
        self.check_at(key, Instant::now())
    }

    /// Accept or reject a call for `key` at `now`.
    ///
    /// Rejected calls do not move the window.
    pub fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimited> {
        let mut last = self.last_accepted.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = last.get(key) {
            let elapsed = now.saturating_duration_since(*prev);
            if elapsed < self.min_interval {
                return Err(RateLimited { retry_after: self.min_interval - elapsed });
            }
        }
        last.insert(key.to_string(), now);
        Ok(())
    }

    /// Forget keys idle for longer than the interval.
    pub fn prune(&self, now: Instant) -> usize {
        let mut last = self.last_accepted.lock().unwrap_or_else(|e| e.into_inner());
        let before = last.len();
        last.retain(|_, at| now.saturating_duration_since(*at) < self.min_interval);
        before - last.len()
    }

    /// Keys currently tracked.
    pub fn tracked(&self) -> usize {
        self.last_accepted.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

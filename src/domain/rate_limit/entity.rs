//! Rate limit entities

use std::time::Duration;

/// Fixed-window rate limit settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Admits allowed per window per identity
    pub max_requests: u64,
    /// Window length
    pub window: Duration,
}

impl RateLimitConfig {
    pub fn new(max_requests: u64, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }
}

/// Counter value returned by a counter store after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Post-increment count within the current window
    pub count: u64,
    /// Time until the window (and the counter) expires
    pub reset_in: Duration,
}

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    pub reset_in: Duration,
}

impl RateLimitDecision {
    /// Decide from a post-increment count: the request is admitted when the
    /// count before this increment was below the limit.
    pub fn from_count(config: &RateLimitConfig, window: WindowCount) -> Self {
        let previous = window.count.saturating_sub(1);
        let allowed = previous < config.max_requests;

        Self {
            allowed,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset_in: window.reset_in,
        }
    }

    /// Whole seconds until the window resets, never zero for a denial
    pub fn retry_after_secs(&self) -> u64 {
        let secs = self.reset_in.as_secs();
        if self.reset_in.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs.max(1)
        }
    }
}

//! Fixed-window rate limiter
//!
//! Every admission increments the identity's counter; the request is denied
//! once the count before the increment has reached the limit. Bursts across a
//! window boundary are accepted.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::{CounterStore, DomainError, RateLimitConfig, RateLimitDecision};

/// Per-identity fixed-window admission on top of a shared [`CounterStore`]
#[derive(Clone)]
pub struct FixedWindowRateLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
}

impl fmt::Debug for FixedWindowRateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedWindowRateLimiter")
            .field("backend", &self.store.backend())
            .field("config", &self.config)
            .finish()
    }
}

impl FixedWindowRateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request for `identity` and decide whether it is admitted
    ///
    /// Counter-store failures are returned as errors; callers must treat them
    /// as a denial.
    pub async fn admit(&self, identity: &str) -> Result<RateLimitDecision, DomainError> {
        let window = self
            .store
            .increment_in_window(identity, self.config.window)
            .await
            .inspect_err(|e| {
                warn!(
                    backend = self.store.backend(),
                    error = %e,
                    "Rate limit counter store unavailable"
                );
            })?;

        let decision = RateLimitDecision::from_count(&self.config, window);

        debug!(
            identity = %identity,
            count = window.count,
            allowed = decision.allowed,
            remaining = decision.remaining,
            "Rate limit checked"
        );

        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rate_limit::MockCounterStore;
    use crate::domain::WindowCount;
    use crate::infrastructure::rate_limit::InMemoryCounterStore;
    use std::time::Duration;

    fn limiter(max_requests: u64, window: Duration) -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(
            Arc::new(InMemoryCounterStore::new()),
            RateLimitConfig::new(max_requests, window),
        )
    }

    #[tokio::test]
    async fn test_eleventh_request_denied() {
        let limiter = limiter(10, Duration::from_secs(60));

        for i in 0..10 {
            let decision = limiter.admit("demo_user").await.unwrap();
            assert!(decision.allowed, "request {} should be admitted", i + 1);
            assert_eq!(decision.remaining, 9 - i);
        }

        let denied = limiter.admit("demo_user").await.unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert!(denied.retry_after_secs() >= 1);
        assert!(denied.retry_after_secs() <= 60);
    }

    #[tokio::test]
    async fn test_window_resets() {
        let limiter = limiter(2, Duration::from_millis(100));

        assert!(limiter.admit("u").await.unwrap().allowed);
        assert!(limiter.admit("u").await.unwrap().allowed);
        assert!(!limiter.admit("u").await.unwrap().allowed);

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(limiter.admit("u").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_identities_are_independent() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.admit("alice").await.unwrap().allowed);
        assert!(!limiter.admit("alice").await.unwrap().allowed);
        assert!(limiter.admit("bob").await.unwrap().allowed);
    }

    #[tokio::test]
    async fn test_concurrent_burst_admits_exactly_limit() {
        let limiter = Arc::new(limiter(10, Duration::from_secs(60)));

        let handles: Vec<_> = (0..30)
            .map(|_| {
                let limiter = limiter.clone();
                tokio::spawn(async move { limiter.admit("burst").await.unwrap().allowed })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 10);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment_in_window()
            .returning(|_, _| Err(DomainError::cache("connection refused")));
        store.expect_backend().return_const("mock");

        let limiter = FixedWindowRateLimiter::new(Arc::new(store), RateLimitConfig::default());

        assert!(matches!(
            limiter.admit("alice").await,
            Err(DomainError::Cache { .. })
        ));
    }

    #[tokio::test]
    async fn test_key_passed_through() {
        let mut store = MockCounterStore::new();
        store
            .expect_increment_in_window()
            .withf(|key, window| key == "alice" && *window == Duration::from_secs(60))
            .times(1)
            .returning(|_, _| {
                Ok(WindowCount {
                    count: 3,
                    reset_in: Duration::from_secs(10),
                })
            });
        store.expect_backend().return_const("mock");

        let limiter = FixedWindowRateLimiter::new(Arc::new(store), RateLimitConfig::default());
        let decision = limiter.admit("alice").await.unwrap();

        assert!(decision.allowed);
        assert_eq!(decision.remaining, 7);
    }
}

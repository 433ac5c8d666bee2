//! Counter store selection from configuration

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use super::in_memory::{InMemoryCounterStore, InMemoryCounterStoreConfig};
use super::limiter::FixedWindowRateLimiter;
use super::redis::{RedisCounterStore, RedisCounterStoreConfig};
use crate::config::{RateLimitBackend, RateLimitSettings};
use crate::domain::{CounterStore, DomainError, RateLimitConfig};

/// Build the configured counter store, connecting to Redis when selected
pub async fn create_counter_store(
    settings: &RateLimitSettings,
) -> Result<Arc<dyn CounterStore>, DomainError> {
    let store: Arc<dyn CounterStore> = match settings.backend {
        RateLimitBackend::Memory => {
            let config = InMemoryCounterStoreConfig::default()
                .with_time_to_idle(Duration::from_secs(settings.window_seconds.max(1) * 2));
            Arc::new(InMemoryCounterStore::with_config(config))
        }
        RateLimitBackend::Redis => {
            if settings.redis_url.is_empty() {
                return Err(DomainError::configuration(
                    "rate_limit.redis_url is required for the redis backend",
                ));
            }

            let config = RedisCounterStoreConfig::new(&settings.redis_url)
                .with_password(settings.redis_password.clone())
                .with_key_prefix(&settings.key_prefix);
            Arc::new(RedisCounterStore::new(config).await?)
        }
    };

    info!(backend = store.backend(), "Rate limit counter store ready");
    Ok(store)
}

/// Build the limiter over the configured store
pub async fn create_rate_limiter(
    settings: &RateLimitSettings,
) -> Result<FixedWindowRateLimiter, DomainError> {
    if settings.max_requests == 0 || settings.window_seconds == 0 {
        return Err(DomainError::configuration(
            "rate_limit.max_requests and rate_limit.window_seconds must be positive",
        ));
    }

    let store = create_counter_store(settings).await?;
    let config = RateLimitConfig::new(
        settings.max_requests,
        Duration::from_secs(settings.window_seconds),
    );

    Ok(FixedWindowRateLimiter::new(store, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> RateLimitSettings {
        RateLimitSettings {
            backend: RateLimitBackend::Memory,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_memory_backend() {
        let store = create_counter_store(&memory_settings()).await.unwrap();
        assert_eq!(store.backend(), "memory");
    }

    #[tokio::test]
    async fn test_limiter_uses_settings() {
        let settings = RateLimitSettings {
            max_requests: 3,
            window_seconds: 5,
            ..memory_settings()
        };
        let limiter = create_rate_limiter(&settings).await.unwrap();

        assert_eq!(limiter.config().max_requests, 3);
        assert_eq!(limiter.config().window, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_limit_rejected() {
        let settings = RateLimitSettings {
            max_requests: 0,
            ..memory_settings()
        };
        assert!(matches!(
            create_rate_limiter(&settings).await,
            Err(DomainError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_redis_requires_url() {
        let settings = RateLimitSettings {
            backend: RateLimitBackend::Redis,
            redis_url: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            create_counter_store(&settings).await,
            Err(DomainError::Configuration { .. })
        ));
    }
}

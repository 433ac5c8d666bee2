//! Redis counter store

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, IntoConnectionInfo, Script};

use crate::domain::{CounterStore, DomainError, WindowCount};

/// INCR, arm the expiry on the first hit of a window, and report the remaining TTL.
/// Runs as one script so concurrent callers never see a counter without expiry.
const INCREMENT_SCRIPT: &str = r"
local current = redis.call('INCR', KEYS[1])
if current == 1 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
end
local ttl = redis.call('PTTL', KEYS[1])
if ttl < 0 then
    redis.call('PEXPIRE', KEYS[1], ARGV[1])
    ttl = tonumber(ARGV[1])
end
return {current, ttl}
";

/// Configuration for the Redis counter store
#[derive(Clone, Default)]
pub struct RedisCounterStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Overrides any password embedded in the URL
    pub password: Option<String>,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
}

impl fmt::Debug for RedisCounterStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCounterStoreConfig")
            .field("url", &self.url)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl RedisCounterStoreConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_password(mut self, password: Option<String>) -> Self {
        self.password = password.filter(|p| !p.is_empty());
        self
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Fixed-window counters kept in Redis, shared by every API replica
#[derive(Clone)]
pub struct RedisCounterStore {
    connection: ConnectionManager,
    script: Script,
    config: RedisCounterStoreConfig,
}

impl fmt::Debug for RedisCounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCounterStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCounterStore {
    /// Connect to Redis
    pub async fn new(config: RedisCounterStoreConfig) -> Result<Self, DomainError> {
        let mut info = config
            .url
            .as_str()
            .into_connection_info()
            .map_err(|e| DomainError::cache(format!("Invalid Redis URL: {}", e)))?;

        if let Some(password) = &config.password {
            info.redis.password = Some(password.clone());
        }

        let client = Client::open(info)
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self {
            connection,
            script: Script::new(INCREMENT_SCRIPT),
            config,
        })
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment_in_window(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection.clone();
        let window_ms = window.as_millis().max(1) as u64;

        let (count, ttl_ms): (i64, i64) = self
            .script
            .key(&prefixed_key)
            .arg(window_ms)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache(format!("Failed to increment key '{}': {}", key, e))
            })?;

        Ok(WindowCount {
            count: count.max(0) as u64,
            reset_in: Duration::from_millis(ttl_ms.max(0) as u64),
        })
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a running Redis instance.
    // Run with: cargo test -- --ignored

    #[test]
    fn test_config_builder() {
        let config = RedisCounterStoreConfig::new("redis://localhost:6379")
            .with_password(Some("secret".to_string()))
            .with_key_prefix("rate_limit");

        assert_eq!(config.url, "redis://localhost:6379");
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.key_prefix, Some("rate_limit".to_string()));
    }

    #[test]
    fn test_empty_password_is_ignored() {
        let config = RedisCounterStoreConfig::new("redis://localhost").with_password(Some(String::new()));
        assert!(config.password.is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = RedisCounterStoreConfig::new("redis://localhost")
            .with_password(Some("hunter2".to_string()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_window_counting() {
        let store = RedisCounterStore::new(
            RedisCounterStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("test_rl"),
        )
        .await
        .unwrap();

        let key = format!("user-{}", uuid::Uuid::new_v4());

        let first = store
            .increment_in_window(&key, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(first.count, 1);
        assert!(first.reset_in <= Duration::from_secs(60));

        let second = store
            .increment_in_window(&key, Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(second.count, 2);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_window_expires() {
        let store = RedisCounterStore::new(
            RedisCounterStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("test_rl"),
        )
        .await
        .unwrap();

        let key = format!("expiring-{}", uuid::Uuid::new_v4());
        store
            .increment_in_window(&key, Duration::from_millis(200))
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;

        let after = store
            .increment_in_window(&key, Duration::from_millis(200))
            .await
            .unwrap();
        assert_eq!(after.count, 1);
    }
}

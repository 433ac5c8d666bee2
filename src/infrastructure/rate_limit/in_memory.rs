//! In-memory counter store using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::{CounterStore, DomainError, WindowCount};

/// Configuration for the in-memory counter store
#[derive(Debug, Clone)]
pub struct InMemoryCounterStoreConfig {
    /// Maximum number of tracked identities
    pub max_capacity: u64,
    /// Idle counters are evicted after this long
    pub time_to_idle: Duration,
}

impl Default for InMemoryCounterStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 100_000,
            time_to_idle: Duration::from_secs(3600),
        }
    }
}

impl InMemoryCounterStoreConfig {
    pub fn with_time_to_idle(mut self, tti: Duration) -> Self {
        self.time_to_idle = tti;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u64,
    started_at: Instant,
}

/// Process-local fixed-window counters
///
/// Each increment is a single moka upsert, which serializes writers per key.
/// Counters are not shared between replicas.
#[derive(Debug)]
pub struct InMemoryCounterStore {
    cache: MokaCache<String, WindowEntry>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::with_config(InMemoryCounterStoreConfig::default())
    }

    pub fn with_config(config: InMemoryCounterStoreConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_idle(config.time_to_idle)
            .build();

        Self { cache }
    }
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment_in_window(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, DomainError> {
        let now = Instant::now();

        let entry = self
            .cache
            .entry(key.to_string())
            .and_upsert_with(|existing| {
                let next = match existing.map(|e| e.into_value()) {
                    Some(current) if now.duration_since(current.started_at) < window => {
                        WindowEntry {
                            count: current.count + 1,
                            started_at: current.started_at,
                        }
                    }
                    _ => WindowEntry {
                        count: 1,
                        started_at: now,
                    },
                };
                std::future::ready(next)
            })
            .await
            .into_value();

        let elapsed = now.saturating_duration_since(entry.started_at);

        Ok(WindowCount {
            count: entry.count,
            reset_in: window.saturating_sub(elapsed),
        })
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_counts_within_window() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_secs(60);

        let first = store.increment_in_window("alice", window).await.unwrap();
        let second = store.increment_in_window("alice", window).await.unwrap();

        assert_eq!(first.count, 1);
        assert_eq!(second.count, 2);
        assert!(second.reset_in <= window);
        assert!(second.reset_in > Duration::from_secs(59));
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_secs(60);

        store.increment_in_window("alice", window).await.unwrap();
        store.increment_in_window("alice", window).await.unwrap();
        let bob = store.increment_in_window("bob", window).await.unwrap();

        assert_eq!(bob.count, 1);
    }

    #[tokio::test]
    async fn test_window_expiry_restarts_count() {
        let store = InMemoryCounterStore::new();
        let window = Duration::from_millis(50);

        store.increment_in_window("alice", window).await.unwrap();
        store.increment_in_window("alice", window).await.unwrap();

        tokio::time::sleep(Duration::from_millis(80)).await;

        let after = store.increment_in_window("alice", window).await.unwrap();
        assert_eq!(after.count, 1);
    }

    #[tokio::test]
    async fn test_concurrent_increments_are_distinct() {
        let store = Arc::new(InMemoryCounterStore::new());
        let window = Duration::from_secs(60);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.increment_in_window("burst", window).await.unwrap().count
                })
            })
            .collect();

        let mut counts = Vec::new();
        for handle in handles {
            counts.push(handle.await.unwrap());
        }
        counts.sort_unstable();

        assert_eq!(counts, (1..=50).collect::<Vec<u64>>());
    }
}

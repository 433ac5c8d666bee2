//! Counter store trait

use std::time::Duration;

use async_trait::async_trait;

use super::entity::WindowCount;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Shared counter storage with per-key expiry
///
/// Implementations must make `increment_in_window` atomic: concurrent callers
/// for the same key each observe a distinct count.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increments the counter for `key`, creating it with a `window` expiry when
    /// absent or expired, and returns the post-increment count.
    async fn increment_in_window(
        &self,
        key: &str,
        window: Duration,
    ) -> Result<WindowCount, DomainError>;

    /// Human-readable backend name for logs
    fn backend(&self) -> &'static str;
}

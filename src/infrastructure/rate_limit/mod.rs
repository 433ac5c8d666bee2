//! Rate limiting infrastructure - counter stores and the fixed-window limiter

mod factory;
mod in_memory;
mod limiter;
mod redis;

pub use factory::{create_counter_store, create_rate_limiter};
pub use in_memory::{InMemoryCounterStore, InMemoryCounterStoreConfig};
pub use limiter::FixedWindowRateLimiter;
pub use redis::{RedisCounterStore, RedisCounterStoreConfig};

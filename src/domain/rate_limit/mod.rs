//! Rate limit domain
//!
//! Fixed-window admission control types and the atomic counter store the
//! limiter is built on.

mod entity;
mod repository;

pub use entity::{RateLimitConfig, RateLimitDecision, WindowCount};
pub use repository::CounterStore;

#[cfg(test)]
pub use repository::MockCounterStore;

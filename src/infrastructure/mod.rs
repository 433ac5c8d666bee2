//! Infrastructure layer - External service implementations

pub mod auth;
pub mod logging;
pub mod model;
pub mod observability;
pub mod rate_limit;
pub mod services;
pub mod training;

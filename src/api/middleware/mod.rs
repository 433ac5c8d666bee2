//! API middleware

pub mod auth;
pub mod logging;
pub mod metrics;

pub use auth::{extract_bearer_token, BearerCredential, RequireSubject};
pub use logging::logging_middleware;
pub use metrics::metrics_middleware;

//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthSettings, Environment, LogFormat, LoggingConfig, ModelSettings,
    RateLimitBackend, RateLimitSettings, ServerConfig, JWT_SECRET_ENV, REDIS_PASSWORD_ENV,
};

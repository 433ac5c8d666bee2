use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Env var consulted when `auth.jwt_secret` is not configured
pub const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";
/// Env var consulted when `rate_limit.redis_password` is not configured
pub const REDIS_PASSWORD_ENV: &str = "REDIS_PASSWORD";

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub auth: AuthSettings,
    pub rate_limit: RateLimitSettings,
    pub model: ModelSettings,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Deployment environment; production tightens secret checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: Option<String>,
    pub token_expiration_minutes: i64,
    /// Subject issued by `POST /token`
    pub demo_subject: String,
    pub environment: Environment,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("token_expiration_minutes", &self.token_expiration_minutes)
            .field("demo_subject", &self.demo_subject)
            .field("environment", &self.environment)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitBackend {
    #[default]
    Redis,
    Memory,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub backend: RateLimitBackend,
    pub redis_url: String,
    pub redis_password: Option<String>,
    pub key_prefix: String,
    pub max_requests: u64,
    pub window_seconds: u64,
}

impl std::fmt::Debug for RateLimitSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimitSettings")
            .field("backend", &self.backend)
            .field("redis_url", &self.redis_url)
            .field(
                "redis_password",
                &self.redis_password.as_ref().map(|_| "<redacted>"),
            )
            .field("key_prefix", &self.key_prefix)
            .field("max_requests", &self.max_requests)
            .field("window_seconds", &self.window_seconds)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    pub dir: String,
    pub artifact_name: String,
    pub version: String,
    pub min_accuracy: f64,
    pub test_ratio: f64,
    pub seed: u64,
    pub n_estimators: usize,
    pub max_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_allowed_origins: vec!["https://dev.localhost".to_string()],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_expiration_minutes: 30,
            demo_subject: "demo_user".to_string(),
            environment: Environment::default(),
        }
    }
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            backend: RateLimitBackend::default(),
            redis_url: "redis://redis:6379".to_string(),
            redis_password: None,
            key_prefix: "rate_limit".to_string(),
            max_requests: 10,
            window_seconds: 60,
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: "/app/models".to_string(),
            artifact_name: "iris_model.json".to_string(),
            version: "1.0.0".to_string(),
            min_accuracy: 0.8,
            test_ratio: 0.2,
            seed: 42,
            n_estimators: 100,
            max_depth: 5,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut app_config: Self = config.try_deserialize()?;
        app_config.apply_secret_fallbacks(|name| std::env::var(name).ok());

        Ok(app_config)
    }

    /// Fill unset secrets from their conventional env vars
    pub fn apply_secret_fallbacks(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if self.auth.jwt_secret.is_none() {
            self.auth.jwt_secret = lookup(JWT_SECRET_ENV);
        }

        if self.rate_limit.redis_password.is_none() {
            self.rate_limit.redis_password = lookup(REDIS_PASSWORD_ENV).filter(|p| !p.is_empty());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_json(json: &str) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(json, config::FileFormat::Json))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.cors_allowed_origins, vec!["https://dev.localhost"]);
        assert_eq!(config.auth.token_expiration_minutes, 30);
        assert_eq!(config.auth.demo_subject, "demo_user");
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.rate_limit.backend, RateLimitBackend::Redis);
        assert_eq!(config.rate_limit.max_requests, 10);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert_eq!(config.model.artifact_name, "iris_model.json");
        assert_eq!(config.model.seed, 42);
        assert_eq!(config.model.min_accuracy, 0.8);
    }

    #[test]
    fn test_partial_override() {
        let config = from_json(
            r#"{
                "server": { "port": 9000 },
                "auth": { "environment": "production" },
                "rate_limit": { "backend": "memory", "max_requests": 3 },
                "logging": { "format": "json" }
            }"#,
        );

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.auth.environment, Environment::Production);
        assert_eq!(config.rate_limit.backend, RateLimitBackend::Memory);
        assert_eq!(config.rate_limit.max_requests, 3);
        assert_eq!(config.rate_limit.window_seconds, 60);
        assert!(matches!(config.logging.format, LogFormat::Json));
    }

    #[test]
    fn test_secret_fallbacks() {
        let mut config = AppConfig::default();
        config.apply_secret_fallbacks(|name| match name {
            JWT_SECRET_ENV => Some("from-env".to_string()),
            REDIS_PASSWORD_ENV => Some("redis-pass".to_string()),
            _ => None,
        });

        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-env"));
        assert_eq!(config.rate_limit.redis_password.as_deref(), Some("redis-pass"));
    }

    #[test]
    fn test_configured_secret_wins_over_env() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("configured".to_string());
        config.apply_secret_fallbacks(|_| Some("from-env".to_string()));

        assert_eq!(config.auth.jwt_secret.as_deref(), Some("configured"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("super-secret-value".to_string());
        config.rate_limit.redis_password = Some("redis-pass".to_string());

        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-value"));
        assert!(!debug.contains("redis-pass"));
    }
}

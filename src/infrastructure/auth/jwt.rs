//! HS256 access token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use tracing::warn;

use crate::config::{AuthSettings, Environment};
use crate::domain::{AuthError, DomainError};

/// Secrets shipped in sample configs; never accepted for signing
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your-secret-key-change-in-production",
    "change-me-in-production",
    "your-secret-key",
    "changeme",
    "secret",
];

/// Minimum secret length in bytes enforced in production
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user identity); optional so a token without it can be rejected explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl JwtClaims {
    /// Create claims for `subject` expiring `expiration_minutes` from now
    pub fn new(subject: &str, expiration_minutes: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::minutes(expiration_minutes);

        Self {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Configuration for the JWT service
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
}

impl Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[hidden]")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>, expiration_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            expiration_minutes,
        }
    }

    /// Build from settings, rejecting absent or placeholder secrets
    ///
    /// In production a short secret is also rejected; in development it only warns.
    pub fn from_settings(settings: &AuthSettings) -> Result<Self, DomainError> {
        let secret = settings
            .jwt_secret
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                DomainError::configuration(
                    "JWT signing secret is not set (auth.jwt_secret or JWT_SECRET_KEY)",
                )
            })?;

        if PLACEHOLDER_SECRETS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(secret))
        {
            return Err(DomainError::configuration(
                "JWT signing secret is a known placeholder value",
            ));
        }

        if secret.len() < MIN_PRODUCTION_SECRET_LEN {
            match settings.environment {
                Environment::Production => {
                    return Err(DomainError::configuration(format!(
                        "JWT signing secret must be at least {} bytes in production",
                        MIN_PRODUCTION_SECRET_LEN
                    )));
                }
                Environment::Development => {
                    warn!(
                        length = secret.len(),
                        "JWT signing secret is shorter than {} bytes",
                        MIN_PRODUCTION_SECRET_LEN
                    );
                }
            }
        }

        if settings.token_expiration_minutes <= 0 {
            return Err(DomainError::configuration(
                "auth.token_expiration_minutes must be positive",
            ));
        }

        Ok(Self::new(secret, settings.token_expiration_minutes))
    }
}

/// Trait for access token operations
pub trait TokenService: Send + Sync + Debug {
    /// Issue a signed token for `subject`
    fn issue(&self, subject: &str) -> Result<String, DomainError>;

    /// Verify a token and return its subject
    fn verify(&self, token: &str) -> Result<String, AuthError>;

    /// Token lifetime in minutes
    fn expiration_minutes(&self) -> i64;
}

/// JWT service signing with a shared HS256 secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }
}

impl TokenService for JwtService {
    fn issue(&self, subject: &str) -> Result<String, DomainError> {
        let claims = JwtClaims::new(subject, self.config.expiration_minutes);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign JWT: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<String, AuthError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::Malformed,
            })?;

        token_data
            .claims
            .sub
            .filter(|sub| !sub.is_empty())
            .ok_or(AuthError::MissingSubject)
    }

    fn expiration_minutes(&self) -> i64 {
        self.config.expiration_minutes
    }
}

use std::fmt;

use thiserror::Error;

/// Reasons a credential is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No bearer token was presented
    MissingCredential,
    /// Signature does not verify against the configured secret
    InvalidSignature,
    /// The expiry instant has passed
    Expired,
    /// Token verified but carries no subject claim
    MissingSubject,
    /// Token could not be decoded at all
    Malformed,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential => write!(f, "missing credential"),
            Self::InvalidSignature => write!(f, "invalid signature"),
            Self::Expired => write!(f, "token expired"),
            Self::MissingSubject => write!(f, "missing subject claim"),
            Self::Malformed => write!(f, "malformed token"),
        }
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication error: {0}")]
    Auth(AuthError),

    #[error("Rate limit exceeded: {limit} requests per window, resets in {reset_in_seconds}s")]
    RateLimited { limit: u64, reset_in_seconds: u64 },

    #[error("Model accuracy too low: {accuracy:.4} (minimum {threshold})")]
    ModelQuality { accuracy: f64, threshold: f64 },

    #[error("Integrity error: expected digest {expected}, computed {actual}")]
    Integrity { expected: String, actual: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Counter store error: {message}")]
    Cache { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn auth(kind: AuthError) -> Self {
        Self::Auth(kind)
    }

    pub fn rate_limited(limit: u64, reset_in_seconds: u64) -> Self {
        Self::RateLimited {
            limit,
            reset_in_seconds,
        }
    }

    pub fn model_quality(accuracy: f64, threshold: f64) -> Self {
        Self::ModelQuality {
            accuracy,
            threshold,
        }
    }

    pub fn integrity(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::Integrity {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<AuthError> for DomainError {
    fn from(kind: AuthError) -> Self {
        Self::Auth(kind)
    }
}

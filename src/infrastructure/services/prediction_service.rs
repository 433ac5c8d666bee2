//! Prediction service - authenticated, rate-limited inference
//!
//! A request moves through validate -> verify token -> rate admit -> infer ->
//! audit, stopping at the first failing stage. Feature validation runs first
//! so malformed input never touches the token verifier or the counter store.

use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use tracing::{error, info, warn};

use crate::domain::{
    validate_features, AuthError, DomainError, LoadedModel, PredictionResponse,
};
use crate::infrastructure::auth::TokenService;
use crate::infrastructure::observability::{record_prediction, record_rate_limit_rejection};
use crate::infrastructure::rate_limit::FixedWindowRateLimiter;

/// Orchestrates one prediction request against the loaded model
#[derive(Debug, Clone)]
pub struct PredictionService {
    model: LoadedModel,
    token_service: Arc<dyn TokenService>,
    rate_limiter: FixedWindowRateLimiter,
}

impl PredictionService {
    pub fn new(
        model: LoadedModel,
        token_service: Arc<dyn TokenService>,
        rate_limiter: FixedWindowRateLimiter,
    ) -> Self {
        Self {
            model,
            token_service,
            rate_limiter,
        }
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Verify a bearer credential and return its subject
    pub fn authenticate(&self, credential: Option<&str>) -> Result<String, DomainError> {
        let token = credential.ok_or(AuthError::MissingCredential)?;

        self.token_service.verify(token).map_err(|kind| {
            warn!(reason = %kind, "Rejected access token");
            DomainError::auth(kind)
        })
    }

    /// Run the full pipeline for `features` presented with `credential`
    pub async fn predict(
        &self,
        credential: Option<&str>,
        features: &[f64],
    ) -> Result<PredictionResponse, DomainError> {
        let features = validate_features(features)?;

        let subject = self.authenticate(credential)?;

        let decision = self.rate_limiter.admit(&subject).await?;
        if !decision.allowed {
            record_rate_limit_rejection();
            warn!(
                subject = %subject,
                limit = decision.limit,
                "Rate limit exceeded"
            );
            return Err(DomainError::rate_limited(
                decision.limit,
                decision.retry_after_secs(),
            ));
        }

        let started = Instant::now();
        let prediction = self
            .model
            .classifier()
            .predict(features.as_slice())
            .map_err(|e| {
                error!(subject = %subject, error = %e, "Prediction failed");
                DomainError::internal("Prediction failed")
            })?;
        record_prediction(started.elapsed());

        info!(
            subject = %subject,
            prediction = prediction.class,
            model_version = %self.model.version(),
            model_hash = %self.model.digest_prefix(),
            "Prediction served"
        );

        Ok(PredictionResponse {
            prediction: prediction.class,
            probability: prediction.probabilities,
            model_version: self.model.version().to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
        })
    }
}

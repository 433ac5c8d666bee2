//! Prediction endpoint

use axum::extract::State;

use crate::api::middleware::BearerCredential;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::{PredictionRequest, PredictionResponse};
use crate::infrastructure::observability::record_api_request;

/// POST /predict
///
/// The bearer credential is not checked by an extractor: the service
/// validates the features first, then authenticates and applies the rate limit.
pub async fn predict(
    State(state): State<AppState>,
    credential: BearerCredential,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    record_api_request("POST", "/predict");

    let response = state
        .prediction_service
        .predict(credential.as_deref(), &request.features)
        .await?;

    Ok(Json(response))
}

//! Model metadata endpoint

use axum::extract::State;
use serde::Serialize;
use tracing::debug;

use crate::api::middleware::RequireSubject;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::ModelMetadata;
use crate::infrastructure::observability::record_api_request;

pub const METADATA_NOT_FOUND: &str = "Model metadata not found";

/// Either the persisted metadata or a not-found marker
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ModelInfoResponse {
    Found(ModelMetadata),
    Missing { error: String },
}

/// GET /model/info
pub async fn model_info(
    State(state): State<AppState>,
    RequireSubject(subject): RequireSubject,
) -> Result<Json<ModelInfoResponse>, ApiError> {
    record_api_request("GET", "/model/info");
    debug!(subject = %subject, "Model info requested");

    let response = match state.model_store.metadata().await? {
        Some(metadata) => ModelInfoResponse::Found(metadata),
        None => ModelInfoResponse::Missing {
            error: METADATA_NOT_FOUND.to_string(),
        },
    };

    Ok(Json(response))
}

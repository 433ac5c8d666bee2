//! Demo token endpoint

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::observability::record_api_request;

pub const TOKEN_TYPE: &str = "bearer";

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// POST /token
///
/// Issues an access token for the configured demo subject. There is no
/// credential check; this endpoint exists for demonstration only.
pub async fn issue_token(State(state): State<AppState>) -> Result<Json<TokenResponse>, ApiError> {
    record_api_request("POST", "/token");

    let access_token = state.token_service.issue(&state.demo_subject)?;

    info!(
        subject = %state.demo_subject,
        expires_in_minutes = state.token_service.expiration_minutes(),
        "Issued access token"
    );

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

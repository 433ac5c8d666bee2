//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::auth::TokenService;
use crate::infrastructure::services::{ModelStore, PredictionService};

/// Application state shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
    pub token_service: Arc<dyn TokenService>,
    pub model_store: Arc<ModelStore>,
    /// Subject embedded in tokens minted by the demo `/token` endpoint
    pub demo_subject: String,
}

impl AppState {
    pub fn new(
        prediction_service: PredictionService,
        token_service: Arc<dyn TokenService>,
        model_store: Arc<ModelStore>,
        demo_subject: impl Into<String>,
    ) -> Self {
        Self {
            prediction_service: Arc::new(prediction_service),
            token_service,
            model_store,
            demo_subject: demo_subject.into(),
        }
    }
}

//! Secure ML API
//!
//! An authenticated, rate-limited HTTP prediction service:
//! - HS256 bearer tokens with a fixed expiry
//! - Per-subject fixed-window rate limiting over Redis or an in-process cache
//! - A random-forest classifier persisted with a SHA-256 digest and retrained
//!   whenever the stored artifact fails verification
//! - Structured logging, optional OTLP span export and Prometheus metrics

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use config::ModelSettings;
use infrastructure::{
    auth::{JwtConfig, JwtService, TokenService},
    model::FsModelRepository,
    rate_limit::create_rate_limiter,
    services::{ModelStore, ModelStoreConfig, PredictionService},
    training::{iris_dataset, ForestParams, RandomForestTrainer},
};
use tracing::info;

/// Build the model store described by `settings` over the bundled Iris dataset
pub fn create_model_store(settings: &ModelSettings) -> ModelStore {
    let repository = Arc::new(FsModelRepository::new(&settings.dir, &settings.artifact_name));

    let params = ForestParams::default()
        .with_n_estimators(settings.n_estimators)
        .with_max_depth(settings.max_depth)
        .with_random_state(settings.seed);
    let trainer = Arc::new(RandomForestTrainer::new(params));

    let store_config = ModelStoreConfig {
        version: settings.version.clone(),
        min_accuracy: settings.min_accuracy,
        test_ratio: settings.test_ratio,
        seed: settings.seed,
    };

    ModelStore::new(repository, trainer, iris_dataset(), store_config)
}

/// Create the application state with custom configuration
///
/// Validates the signing secret, loads or trains the model and connects the
/// rate limit counter store. Any failure here aborts startup.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_settings(&config.auth)?;
    let token_service: Arc<dyn TokenService> = Arc::new(JwtService::new(jwt_config));

    let model_store = Arc::new(create_model_store(&config.model));
    let model = model_store.load_or_train().await?;
    info!(
        version = %model.version(),
        model_hash = %model.digest_prefix(),
        "Model ready"
    );

    let rate_limiter = create_rate_limiter(&config.rate_limit).await?;

    let prediction_service = PredictionService::new(model, token_service.clone(), rate_limiter);

    Ok(AppState::new(
        prediction_service,
        token_service,
        model_store,
        &config.auth.demo_subject,
    ))
}

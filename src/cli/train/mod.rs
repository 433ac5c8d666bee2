//! Train command - retrains the model and rewrites the persisted artifact

use tracing::{error, info};

use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

/// Retrain unconditionally; fails when the quality gate rejects the model
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_logging(&config.logging);

    let store = crate::create_model_store(&config.model);

    match store.train().await {
        Ok((model, metadata)) => {
            info!(
                version = %model.version(),
                accuracy = format!("{:.4}", metadata.accuracy),
                model_hash = %model.digest_prefix(),
                dir = %config.model.dir,
                "Retraining complete"
            );
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Retraining failed");
            Err(e.into())
        }
    }
}

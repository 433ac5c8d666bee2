//! Infrastructure services

mod model_store;
mod prediction_service;

pub use model_store::{ModelStore, ModelStoreConfig};
pub use prediction_service::PredictionService;

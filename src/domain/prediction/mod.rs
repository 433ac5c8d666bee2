//! Prediction domain
//!
//! Request/response records for the inference endpoint and the feature
//! validation that runs before any credential or rate-limit work.

mod entity;
mod validation;

pub use entity::{ClassPrediction, Features, PredictionRequest, PredictionResponse, FEATURE_COUNT};
pub use validation::{validate_features, FeatureValidationError};

//! Domain layer - Core business logic and entities

pub mod error;
pub mod model;
pub mod prediction;
pub mod rate_limit;

pub use error::{AuthError, DomainError};
pub use model::{
    compute_digest, Classifier, ClassifierTrainer, Dataset, LoadedModel, ModelMetadata,
    ModelRepository, StoredArtifact, TrainTestSplit, DIGEST_PREFIX_LEN,
};
pub use prediction::{
    validate_features, ClassPrediction, FeatureValidationError, Features, PredictionRequest,
    PredictionResponse, FEATURE_COUNT,
};
pub use rate_limit::{CounterStore, RateLimitConfig, RateLimitDecision, WindowCount};

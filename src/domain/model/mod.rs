//! Model domain - trained classifier artifacts, metadata and datasets

mod classifier;
mod dataset;
mod entity;
mod repository;

pub use classifier::{Classifier, ClassifierTrainer};
pub use dataset::{Dataset, TrainTestSplit};
pub use entity::{compute_digest, LoadedModel, ModelMetadata, DIGEST_PREFIX_LEN};
pub use repository::{ModelRepository, StoredArtifact};

//! Classifier capability traits
//!
//! The learner itself is pluggable: the model store only needs to fit,
//! serialize, deserialize and query a classifier.

use std::fmt::Debug;
use std::sync::Arc;

use crate::domain::prediction::ClassPrediction;
use crate::domain::DomainError;

/// A trained classifier
pub trait Classifier: Send + Sync + Debug {
    /// Predict the class and per-class probabilities for one sample
    fn predict(&self, features: &[f64]) -> Result<ClassPrediction, DomainError>;

    /// Number of input features the classifier was fitted on
    fn n_features(&self) -> usize;

    /// Number of target classes
    fn n_classes(&self) -> usize;

    /// Serialize into an artifact blob
    fn to_bytes(&self) -> Result<Vec<u8>, DomainError>;
}

/// Supervised learner producing [`Classifier`]s
pub trait ClassifierTrainer: Send + Sync + Debug {
    /// Short identifier recorded in model metadata
    fn model_type(&self) -> &str;

    /// Hyperparameters recorded in model metadata
    fn hyperparameters(&self) -> serde_json::Value {
        serde_json::Value::Null
    }

    /// Fit a classifier on feature rows `x` and class labels `y` in `0..n_classes`
    ///
    /// `n_classes` comes from the dataset's target names, so a class absent
    /// from `y` still gets a probability slot.
    fn fit(
        &self,
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
    ) -> Result<Arc<dyn Classifier>, DomainError>;

    /// Rebuild a classifier from an artifact blob
    fn from_bytes(&self, bytes: &[u8]) -> Result<Arc<dyn Classifier>, DomainError>;
}

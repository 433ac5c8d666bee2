//! Learner implementations and the bundled training dataset

mod decision_tree;
mod iris;
mod random_forest;

use std::sync::Arc;

pub use iris::{iris_dataset, FEATURE_NAMES, TARGET_NAMES};
pub use random_forest::{ForestParams, MaxFeatures, RandomForest};

use crate::domain::{Classifier, ClassifierTrainer, DomainError};

/// Fits [`RandomForest`] classifiers with fixed hyperparameters
#[derive(Debug, Clone)]
pub struct RandomForestTrainer {
    params: ForestParams,
}

impl RandomForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }
}

impl Default for RandomForestTrainer {
    fn default() -> Self {
        Self::new(ForestParams::default())
    }
}

impl ClassifierTrainer for RandomForestTrainer {
    fn model_type(&self) -> &str {
        "random_forest"
    }

    fn hyperparameters(&self) -> serde_json::Value {
        serde_json::json!({
            "n_estimators": self.params.n_estimators,
            "max_depth": self.params.max_depth,
            "min_samples_split": self.params.min_samples_split,
            "bootstrap": self.params.bootstrap,
            "random_state": self.params.random_state,
        })
    }

    fn fit(
        &self,
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
    ) -> Result<Arc<dyn Classifier>, DomainError> {
        let forest = RandomForest::fit(self.params, x, y, n_classes)?;
        Ok(Arc::new(forest))
    }

    fn from_bytes(&self, bytes: &[u8]) -> Result<Arc<dyn Classifier>, DomainError> {
        Ok(Arc::new(RandomForest::from_bytes(bytes)?))
    }
}

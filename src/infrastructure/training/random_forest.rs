//! Random forest classifier

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::decision_tree::{DecisionTree, TreeParams};
use crate::domain::{ClassPrediction, Classifier, DomainError};

/// Strategy for the number of split candidates per node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MaxFeatures {
    /// Square root of n_features
    Sqrt,
    /// All features
    All,
    /// Fixed number
    Fixed(usize),
}

impl MaxFeatures {
    fn resolve(self, n_features: usize) -> usize {
        let n = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt().floor() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k,
        };
        n.clamp(1, n_features.max(1))
    }
}

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub random_state: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 5,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            random_state: 42,
        }
    }
}

impl ForestParams {
    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }
}

/// Fitted random forest: probabilities are the mean of the trees' leaf distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    params: ForestParams,
    trees: Vec<DecisionTree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForest {
    /// Fit a forest on rows `x` with labels `y` in `0..n_classes`
    pub fn fit(
        params: ForestParams,
        x: &[Vec<f64>],
        y: &[usize],
        n_classes: usize,
    ) -> Result<Self, DomainError> {
        if x.is_empty() {
            return Err(DomainError::validation("Cannot fit a forest on zero samples"));
        }
        if x.len() != y.len() {
            return Err(DomainError::validation(format!(
                "Got {} samples but {} labels",
                x.len(),
                y.len()
            )));
        }
        if params.n_estimators == 0 {
            return Err(DomainError::validation("n_estimators must be at least 1"));
        }

        let n_features = x[0].len();
        if x.iter().any(|row| row.len() != n_features) {
            return Err(DomainError::validation("Training rows have inconsistent widths"));
        }
        if let Some(&label) = y.iter().find(|&&label| label >= n_classes) {
            return Err(DomainError::validation(format!(
                "Label {} outside of {} classes",
                label, n_classes
            )));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split.max(2),
            max_features: params.max_features.resolve(n_features),
        };

        let mut rng = StdRng::seed_from_u64(params.random_state);
        let n_samples = x.len();

        let trees = (0..params.n_estimators)
            .map(|_| {
                let indices: Vec<usize> = if params.bootstrap {
                    (0..n_samples).map(|_| rng.gen_range(0..n_samples)).collect()
                } else {
                    (0..n_samples).collect()
                };
                DecisionTree::fit(x, y, &indices, n_classes, tree_params, &mut rng)
            })
            .collect();

        Ok(Self {
            params,
            trees,
            n_features,
            n_classes,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class distribution over all trees
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, DomainError> {
        if features.len() != self.n_features {
            return Err(DomainError::validation(format!(
                "Expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }
        if self.trees.is_empty() {
            return Err(DomainError::internal("Forest has no trees"));
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let distribution = tree
                .predict_distribution(features)
                .filter(|d| d.len() == self.n_classes)
                .ok_or_else(|| DomainError::internal("Tree shape does not match the forest"))?;
            for (acc, p) in proba.iter_mut().zip(distribution) {
                *acc += p;
            }
        }

        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);

        Ok(proba)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DomainError> {
        let forest: Self = serde_json::from_slice(bytes).map_err(|e| {
            DomainError::storage(format!("Failed to deserialize model artifact: {}", e))
        })?;

        if forest.trees.is_empty() {
            return Err(DomainError::storage("Model artifact has no trees"));
        }
        if forest.trees.iter().any(|t| t.n_classes() != forest.n_classes) {
            return Err(DomainError::storage(
                "Model artifact has trees with mismatched class counts",
            ));
        }
        for tree in &forest.trees {
            tree.check_shape(forest.n_features).map_err(|reason| {
                DomainError::storage(format!("Model artifact is malformed: {}", reason))
            })?;
        }

        Ok(forest)
    }
}

impl Classifier for RandomForest {
    fn predict(&self, features: &[f64]) -> Result<ClassPrediction, DomainError> {
        let proba = self.predict_proba(features)?;
        ClassPrediction::from_probabilities(proba)
            .ok_or_else(|| DomainError::internal("Classifier produced no class probabilities"))
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn to_bytes(&self) -> Result<Vec<u8>, DomainError> {
        serde_json::to_vec(self).map_err(|e| {
            DomainError::internal(format!("Failed to serialize model artifact: {}", e))
        })
    }
}

//! Labelled datasets and the deterministic train/test split

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::DomainError;

/// A labelled tabular dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<usize>,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
}

/// Result of splitting a dataset into train and held-out parts
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Vec<Vec<f64>>,
    pub y_train: Vec<usize>,
    pub x_test: Vec<Vec<f64>>,
    pub y_test: Vec<usize>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.features.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn n_classes(&self) -> usize {
        self.target_names.len()
    }

    /// Check that every row has the declared width and every label is a known class
    pub fn validate(&self, expected_features: usize) -> Result<(), DomainError> {
        if self.n_features() != expected_features {
            return Err(DomainError::validation(format!(
                "Invalid feature count in dataset: {} (expected {})",
                self.n_features(),
                expected_features
            )));
        }

        if self.features.len() != self.targets.len() {
            return Err(DomainError::validation(format!(
                "Dataset has {} rows but {} targets",
                self.features.len(),
                self.targets.len()
            )));
        }

        if let Some(row) = self.features.iter().position(|r| r.len() != expected_features) {
            return Err(DomainError::validation(format!(
                "Dataset row {} has {} features",
                row,
                self.features[row].len()
            )));
        }

        if let Some(&label) = self.targets.iter().find(|&&t| t >= self.n_classes()) {
            return Err(DomainError::validation(format!(
                "Dataset label {} is outside the {} known classes",
                label,
                self.n_classes()
            )));
        }

        Ok(())
    }

    /// Shuffle with a seeded RNG and hold out `test_ratio` of the rows
    pub fn train_test_split(&self, test_ratio: f64, seed: u64) -> Result<TrainTestSplit, DomainError> {
        if !(test_ratio > 0.0 && test_ratio < 1.0) {
            return Err(DomainError::validation(format!(
                "test_ratio must be in (0, 1), got {}",
                test_ratio
            )));
        }

        let n = self.n_samples();
        let n_test = ((n as f64) * test_ratio).round() as usize;

        if n_test == 0 || n_test >= n {
            return Err(DomainError::validation(format!(
                "Cannot hold out {} of {} samples",
                n_test, n
            )));
        }

        let mut indices: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let (test_idx, train_idx) = indices.split_at(n_test);

        Ok(TrainTestSplit {
            x_train: train_idx.iter().map(|&i| self.features[i].clone()).collect(),
            y_train: train_idx.iter().map(|&i| self.targets[i]).collect(),
            x_test: test_idx.iter().map(|&i| self.features[i].clone()).collect(),
            y_test: test_idx.iter().map(|&i| self.targets[i]).collect(),
        })
    }
}

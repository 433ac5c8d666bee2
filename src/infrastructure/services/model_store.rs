//! Model store - integrity-checked load/train lifecycle of the served classifier

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{
    compute_digest, Classifier, ClassifierTrainer, Dataset, DomainError, LoadedModel,
    ModelMetadata, ModelRepository, FEATURE_COUNT,
};

/// Training and acceptance parameters
#[derive(Debug, Clone)]
pub struct ModelStoreConfig {
    pub version: String,
    /// Held-out accuracy below this fails training
    pub min_accuracy: f64,
    pub test_ratio: f64,
    pub seed: u64,
}

impl Default for ModelStoreConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            min_accuracy: 0.8,
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

/// Loads the persisted classifier, retraining when it is absent or fails verification
#[derive(Debug)]
pub struct ModelStore {
    repository: Arc<dyn ModelRepository>,
    trainer: Arc<dyn ClassifierTrainer>,
    dataset: Dataset,
    config: ModelStoreConfig,
}

impl ModelStore {
    pub fn new(
        repository: Arc<dyn ModelRepository>,
        trainer: Arc<dyn ClassifierTrainer>,
        dataset: Dataset,
        config: ModelStoreConfig,
    ) -> Self {
        Self {
            repository,
            trainer,
            dataset,
            config,
        }
    }

    /// Return the persisted model if its digest verifies, otherwise train a new one
    pub async fn load_or_train(&self) -> Result<LoadedModel, DomainError> {
        match self.try_load().await? {
            Some(model) => Ok(model),
            None => self.train().await.map(|(model, _)| model),
        }
    }

    async fn try_load(&self) -> Result<Option<LoadedModel>, DomainError> {
        let Some(stored) = self.repository.load_artifact().await? else {
            info!("No model artifact found, training a new model");
            return Ok(None);
        };

        let actual = compute_digest(&stored.bytes);

        let Some(expected) = stored.stored_digest else {
            warn!(digest = %actual, "Model digest file missing, retraining");
            return Ok(None);
        };

        if expected != actual {
            let err = DomainError::integrity(&expected, &actual);
            warn!(error = %err, "Model integrity check failed, retraining");
            return Ok(None);
        }

        let metadata = match self.repository.load_metadata().await {
            Ok(Some(metadata)) if metadata.digest == actual => metadata,
            Ok(Some(metadata)) => {
                warn!(
                    metadata_digest = %metadata.digest,
                    digest = %actual,
                    "Model metadata describes a different artifact, retraining"
                );
                return Ok(None);
            }
            Ok(None) => {
                warn!(digest = %actual, "Model metadata missing, retraining");
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Model metadata unreadable, retraining");
                return Ok(None);
            }
        };

        let classifier = match self.trainer.from_bytes(&stored.bytes) {
            Ok(classifier) => classifier,
            Err(e) => {
                warn!(error = %e, "Model artifact could not be decoded, retraining");
                return Ok(None);
            }
        };

        if classifier.n_features() != FEATURE_COUNT {
            warn!(
                n_features = classifier.n_features(),
                "Model artifact has the wrong input width, retraining"
            );
            return Ok(None);
        }

        if classifier.n_classes() != self.dataset.n_classes() {
            warn!(
                n_classes = classifier.n_classes(),
                expected = self.dataset.n_classes(),
                "Model artifact has the wrong class count, retraining"
            );
            return Ok(None);
        }

        let model = LoadedModel::new(classifier, actual, metadata.version);
        info!(
            digest = %model.digest(),
            version = %model.version(),
            "Model loaded and verified"
        );

        Ok(Some(model))
    }

    /// Train on the held dataset, gate on held-out accuracy, then persist
    pub async fn train(&self) -> Result<(LoadedModel, ModelMetadata), DomainError> {
        self.dataset.validate(FEATURE_COUNT)?;

        let split = self
            .dataset
            .train_test_split(self.config.test_ratio, self.config.seed)?;

        info!(
            model_type = %self.trainer.model_type(),
            n_train = split.y_train.len(),
            n_test = split.y_test.len(),
            "Training model"
        );

        let n_classes = self.dataset.n_classes();
        let classifier = self
            .trainer
            .fit(&split.x_train, &split.y_train, n_classes)?;
        if classifier.n_classes() != n_classes {
            return Err(DomainError::internal(format!(
                "Trainer produced {} classes for a {}-class dataset",
                classifier.n_classes(),
                n_classes
            )));
        }
        let accuracy = holdout_accuracy(classifier.as_ref(), &split.x_test, &split.y_test)?;

        if accuracy < self.config.min_accuracy {
            return Err(DomainError::model_quality(accuracy, self.config.min_accuracy));
        }

        let bytes = classifier.to_bytes()?;
        let digest = compute_digest(&bytes);

        let metadata = ModelMetadata {
            version: self.config.version.clone(),
            accuracy,
            created_at: Utc::now(),
            digest: digest.clone(),
            model_type: self.trainer.model_type().to_string(),
            feature_names: self.dataset.feature_names.clone(),
            target_names: self.dataset.target_names.clone(),
            n_train_samples: split.y_train.len(),
            n_test_samples: split.y_test.len(),
            hyperparameters: self.trainer.hyperparameters(),
        };

        self.repository.save(&bytes, &digest, &metadata).await?;

        let model = LoadedModel::new(classifier, digest, &self.config.version);
        info!(
            accuracy = format!("{:.4}", accuracy),
            digest = %model.digest(),
            "Model trained and saved"
        );

        Ok((model, metadata))
    }

    /// Persisted metadata, `Ok(None)` when no model was ever saved
    pub async fn metadata(&self) -> Result<Option<ModelMetadata>, DomainError> {
        self.repository.load_metadata().await
    }
}

/// Fraction of `x` rows whose predicted class equals the label in `y`
fn holdout_accuracy(
    classifier: &dyn Classifier,
    x: &[Vec<f64>],
    y: &[usize],
) -> Result<f64, DomainError> {
    if x.is_empty() {
        return Err(DomainError::validation("Held-out set is empty"));
    }

    let mut correct = 0usize;
    for (row, &label) in x.iter().zip(y) {
        if classifier.predict(row)?.class == label {
            correct += 1;
        }
    }

    Ok(correct as f64 / x.len() as f64)
}

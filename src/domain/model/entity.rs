//! Model artifact and metadata types

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::classifier::Classifier;

/// Number of hex characters of the digest written to audit logs
pub const DIGEST_PREFIX_LEN: usize = 8;

/// Compute the hex-encoded SHA-256 digest of an artifact blob
pub fn compute_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Metadata persisted alongside a trained artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub version: String,
    pub accuracy: f64,
    pub created_at: DateTime<Utc>,
    #[serde(alias = "hash")]
    pub digest: String,
    pub model_type: String,
    pub feature_names: Vec<String>,
    pub target_names: Vec<String>,
    pub n_train_samples: usize,
    pub n_test_samples: usize,
    #[serde(default)]
    pub hyperparameters: serde_json::Value,
}

/// A classifier held in memory together with the digest of the bytes it came from
///
/// Immutable once constructed; shared across request tasks through `Arc`.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    classifier: Arc<dyn Classifier>,
    digest: String,
    version: String,
}

impl LoadedModel {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        digest: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            digest: digest.into(),
            version: version.into(),
        }
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Short digest prefix safe to include in logs
    pub fn digest_prefix(&self) -> &str {
        let end = self.digest.len().min(DIGEST_PREFIX_LEN);
        &self.digest[..end]
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether the held classifier can serve predictions
    pub fn is_ready(&self) -> bool {
        self.classifier.n_classes() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_digest_known_value() {
        assert_eq!(
            compute_digest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_metadata_reads_legacy_hash_field() {
        let json = r#"{
            "version": "1.0.0",
            "accuracy": 0.93,
            "created_at": "2024-01-01T00:00:00Z",
            "hash": "abcdef",
            "model_type": "random_forest",
            "feature_names": ["a", "b", "c", "d"],
            "target_names": ["x", "y", "z"],
            "n_train_samples": 120,
            "n_test_samples": 30
        }"#;

        let metadata: ModelMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(metadata.digest, "abcdef");
        assert!(metadata.hyperparameters.is_null());
    }
}

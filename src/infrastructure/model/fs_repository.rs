//! Filesystem-backed model repository
//!
//! Layout inside the model directory:
//!
//! - `<artifact>`: serialized classifier
//! - `<artifact>.sha256`: hex digest of the artifact bytes
//! - `model_metadata.json`: training metadata

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::{DomainError, ModelMetadata, ModelRepository, StoredArtifact};

pub const DIGEST_SUFFIX: &str = ".sha256";
pub const METADATA_FILE_NAME: &str = "model_metadata.json";

/// Stores the artifact, digest and metadata as files in one directory
#[derive(Debug, Clone)]
pub struct FsModelRepository {
    dir: PathBuf,
    artifact_name: String,
}

impl FsModelRepository {
    pub fn new(dir: impl Into<PathBuf>, artifact_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            artifact_name: artifact_name.into(),
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.dir.join(&self.artifact_name)
    }

    pub fn digest_path(&self) -> PathBuf {
        self.dir.join(format!("{}{}", self.artifact_name, DIGEST_SUFFIX))
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join(METADATA_FILE_NAME)
    }
}

#[async_trait]
impl ModelRepository for FsModelRepository {
    async fn load_artifact(&self) -> Result<Option<StoredArtifact>, DomainError> {
        let Some(bytes) = read_optional(&self.artifact_path()).await? else {
            return Ok(None);
        };

        let stored_digest = read_optional(&self.digest_path())
            .await?
            .map(|raw| String::from_utf8_lossy(&raw).trim().to_string());

        Ok(Some(StoredArtifact {
            bytes,
            stored_digest,
        }))
    }

    async fn save(
        &self,
        artifact: &[u8],
        digest: &str,
        metadata: &ModelMetadata,
    ) -> Result<(), DomainError> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to create model directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let metadata_json = serde_json::to_vec_pretty(metadata).map_err(|e| {
            DomainError::storage(format!("Failed to serialize model metadata: {}", e))
        })?;

        // The digest is removed first and written last, so it only exists once
        // the artifact and metadata beside it are both complete.
        remove_if_exists(&self.digest_path()).await?;
        write_atomic(&self.artifact_path(), artifact).await?;
        write_atomic(&self.metadata_path(), &metadata_json).await?;
        write_atomic(&self.digest_path(), digest.as_bytes()).await?;

        debug!(dir = %self.dir.display(), "Model artifact persisted");
        Ok(())
    }

    async fn load_metadata(&self) -> Result<Option<ModelMetadata>, DomainError> {
        let Some(raw) = read_optional(&self.metadata_path()).await? else {
            return Ok(None);
        };

        serde_json::from_slice(&raw).map(Some).map_err(|e| {
            DomainError::storage(format!("Failed to parse model metadata: {}", e))
        })
    }
}

async fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, DomainError> {
    match fs::read(path).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DomainError::storage(format!(
            "Failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}

async fn remove_if_exists(path: &Path) -> Result<(), DomainError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DomainError::storage(format!(
            "Failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write to a sibling temp file, fsync, then rename over the target
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DomainError> {
    let storage_err =
        |e: io::Error| DomainError::storage(format!("Failed to write {}: {}", path.display(), e));

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp).await.map_err(storage_err)?;
    file.write_all(bytes).await.map_err(storage_err)?;
    file.sync_all().await.map_err(storage_err)?;
    drop(file);

    fs::rename(&tmp, path).await.map_err(storage_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn metadata(digest: &str) -> ModelMetadata {
        ModelMetadata {
            version: "1.0.0".to_string(),
            accuracy: 0.95,
            created_at: Utc::now(),
            digest: digest.to_string(),
            model_type: "random_forest".to_string(),
            feature_names: vec!["a".to_string()],
            target_names: vec!["x".to_string(), "y".to_string()],
            n_train_samples: 8,
            n_test_samples: 2,
            hyperparameters: serde_json::Value::Null,
        }
    }

    #[tokio::test]
    async fn test_empty_directory_has_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");

        assert!(repo.load_artifact().await.unwrap().is_none());
        assert!(repo.load_metadata().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path().join("nested"), "model.json");

        repo.save(b"artifact", "abc123", &metadata("abc123"))
            .await
            .unwrap();

        let stored = repo.load_artifact().await.unwrap().unwrap();
        assert_eq!(stored.bytes, b"artifact");
        assert_eq!(stored.stored_digest.as_deref(), Some("abc123"));

        let loaded = repo.load_metadata().await.unwrap().unwrap();
        assert_eq!(loaded.digest, "abc123");
        assert_eq!(loaded.n_train_samples, 8);

        assert!(!dir.path().join("nested/model.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_missing_digest_file() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");
        repo.save(b"artifact", "abc123", &metadata("abc123"))
            .await
            .unwrap();

        std::fs::remove_file(repo.digest_path()).unwrap();

        let stored = repo.load_artifact().await.unwrap().unwrap();
        assert!(stored.stored_digest.is_none());
    }

    #[tokio::test]
    async fn test_digest_is_trimmed() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");
        std::fs::write(repo.artifact_path(), b"artifact").unwrap();
        std::fs::write(repo.digest_path(), "abc123\n").unwrap();

        let stored = repo.load_artifact().await.unwrap().unwrap();
        assert_eq!(stored.stored_digest.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_corrupt_metadata_is_an_error() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");
        std::fs::write(repo.metadata_path(), b"{not json").unwrap();

        assert!(matches!(
            repo.load_metadata().await,
            Err(DomainError::Storage { .. })
        ));
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_model() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");

        repo.save(b"first", "d1", &metadata("d1")).await.unwrap();
        repo.save(b"second", "d2", &metadata("d2")).await.unwrap();

        let stored = repo.load_artifact().await.unwrap().unwrap();
        assert_eq!(stored.bytes, b"second");
        assert_eq!(stored.stored_digest.as_deref(), Some("d2"));
        assert_eq!(repo.load_metadata().await.unwrap().unwrap().digest, "d2");
    }

    #[tokio::test]
    async fn test_failed_metadata_write_leaves_no_digest() {
        let dir = TempDir::new().unwrap();
        let repo = FsModelRepository::new(dir.path(), "model.json");
        repo.save(b"first", "d1", &metadata("d1")).await.unwrap();

        // A non-empty directory in place of the metadata file makes its rename fail
        std::fs::remove_file(repo.metadata_path()).unwrap();
        std::fs::create_dir(repo.metadata_path()).unwrap();
        std::fs::write(repo.metadata_path().join("blocker"), b"x").unwrap();

        assert!(repo.save(b"second", "d2", &metadata("d2")).await.is_err());

        let stored = repo.load_artifact().await.unwrap().unwrap();
        assert!(stored.stored_digest.is_none());
    }
}

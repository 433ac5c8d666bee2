//! Model artifact repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::ModelMetadata;
use crate::domain::DomainError;

/// An artifact blob as read from storage, with whatever digest was stored beside it
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub bytes: Vec<u8>,
    /// `None` when the digest file is absent
    pub stored_digest: Option<String>,
}

/// Durable storage for the serialized classifier, its digest and metadata
#[async_trait]
pub trait ModelRepository: Send + Sync + Debug {
    /// Read the artifact and its stored digest; `Ok(None)` when no artifact exists
    async fn load_artifact(&self) -> Result<Option<StoredArtifact>, DomainError>;

    /// Persist artifact, digest and metadata
    ///
    /// Implementations must never leave a digest on storage that disagrees with
    /// the artifact or metadata next to it, even if interrupted halfway.
    async fn save(
        &self,
        artifact: &[u8],
        digest: &str,
        metadata: &ModelMetadata,
    ) -> Result<(), DomainError>;

    /// Read persisted metadata; `Ok(None)` when it has never been written
    async fn load_metadata(&self) -> Result<Option<ModelMetadata>, DomainError>;
}

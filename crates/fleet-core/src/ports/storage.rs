use async_trait::async_trait;

/// Object storage collaborator.
///
/// Only deletion crosses this boundary: uploads happen outside the core
/// and arrive as opaque URLs. Deletes are best-effort; callers detach
/// them from the owning transaction and only log failures.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn delete(&self, url: &str) -> Result<(), StorageError>;
}

/// Object storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Delete failed: {0}")]
    Delete(String),
}

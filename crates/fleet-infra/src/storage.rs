//! Object store implementations.
//!
//! Uploads happen outside this system; the only call crossing the port
//! is best-effort deletion of an asset by its URL.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use fleet_core::ports::{ObjectStore, StorageError};

/// Records deletions instead of talking to a storage provider. Doubles
/// as the development adapter and the test probe for the fire-and-forget
/// cleanup path.
pub struct RecordingObjectStore {
    deleted: RwLock<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingObjectStore {
    pub fn new() -> Self {
        Self {
            deleted: RwLock::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make subsequent deletes fail, to exercise the logged-only path.
    pub fn fail_deletes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn deleted_urls(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

impl Default for RecordingObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn delete(&self, url: &str) -> Result<(), StorageError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::Delete("provider unreachable".to_string()));
        }
        self.deleted.write().await.push(url.to_string());
        tracing::debug!(url = %url, "object deleted");
        Ok(())
    }
}

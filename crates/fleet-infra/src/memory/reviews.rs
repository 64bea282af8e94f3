use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fleet_core::domain::Review;
use fleet_core::error::RepoError;
use fleet_core::ports::{BaseRepository, ReviewRepository};

/// In-memory review store.
pub struct InMemoryReviewRepository {
    store: RwLock<HashMap<Uuid, Review>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryReviewRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Review, Uuid> for InMemoryReviewRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, review: Review) -> Result<Review, RepoError> {
        self.store.write().await.insert(review.id, review.clone());
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.store.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Review>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|r| r.vehicle_id == vehicle_id)
            .cloned()
            .collect())
    }
}

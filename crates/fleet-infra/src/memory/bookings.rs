use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use fleet_core::domain::Booking;
use fleet_core::error::RepoError;
use fleet_core::ports::{BaseRepository, BookingRepository};

/// In-memory booking store.
pub struct InMemoryBookingRepository {
    store: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Booking, Uuid> for InMemoryBookingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, booking: Booking) -> Result<Booking, RepoError> {
        self.store.write().await.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.store.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, RepoError> {
        Ok(self.store.read().await.values().cloned().collect())
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .filter(|b| b.is_overdue(now))
            .cloned()
            .collect())
    }

    async fn complete_if_pending(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(booking) if !booking.completed => {
                booking.completed = true;
                Ok(true)
            }
            // Already completed, or deleted out from under the sweep.
            _ => Ok(false),
        }
    }
}

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fleet_core::domain::{SortDir, SortField, Vehicle, VehicleQuery};
use fleet_core::error::RepoError;
use fleet_core::ports::{BaseRepository, VehicleRepository};

/// In-memory vehicle registry.
pub struct InMemoryVehicleRepository {
    store: RwLock<HashMap<Uuid, Vehicle>>,
}

impl InMemoryVehicleRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryVehicleRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Vehicle, Uuid> for InMemoryVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Vehicle>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, vehicle: Vehicle) -> Result<Vehicle, RepoError> {
        self.store.write().await.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.store.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl VehicleRepository for InMemoryVehicleRepository {
    async fn list(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, RepoError> {
        let store = self.store.read().await;

        let mut matches: Vec<Vehicle> = store
            .values()
            .filter(|v| {
                query
                    .category
                    .as_deref()
                    .is_none_or(|c| v.category == c)
            })
            .filter(|v| query.min_price.is_none_or(|min| v.price_per_day >= min))
            .filter(|v| query.max_price.is_none_or(|max| v.price_per_day <= max))
            .cloned()
            .collect();

        if let Some((field, dir)) = query.sort {
            matches.sort_by(|a, b| {
                let ord = match field {
                    SortField::Name => a.name.cmp(&b.name),
                    SortField::Category => a.category.cmp(&b.category),
                    SortField::PricePerDay => a
                        .price_per_day
                        .partial_cmp(&b.price_per_day)
                        .unwrap_or(Ordering::Equal),
                    SortField::CreatedAt => a.created_at.cmp(&b.created_at),
                };
                match dir {
                    SortDir::Asc => ord,
                    SortDir::Desc => ord.reverse(),
                }
            });
        }

        Ok(matches
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn try_hold(&self, id: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;
        let vehicle = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        if !vehicle.available {
            return Ok(false);
        }
        vehicle.available = false;
        Ok(true)
    }

    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        let vehicle = store.get_mut(&id).ok_or(RepoError::NotFound)?;
        vehicle.available = available;
        Ok(())
    }
}

//! Vehicle registry: host-gated CRUD and the public listing.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Vehicle, VehicleQuery};
use crate::error::DomainError;
use crate::ports::{ObjectStore, VehicleRepository};

#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub name: String,
    pub category: String,
    pub price_per_day: f64,
    pub image_url: String,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct VehicleUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_per_day: Option<f64>,
    pub available: Option<bool>,
    pub image_url: Option<String>,
}

pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
    storage: Arc<dyn ObjectStore>,
}

impl VehicleService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>, storage: Arc<dyn ObjectStore>) -> Self {
        Self { vehicles, storage }
    }

    pub async fn add(&self, host_id: Uuid, new_vehicle: NewVehicle) -> Result<Vehicle, DomainError> {
        if new_vehicle.price_per_day < 0.0 {
            return Err(DomainError::InvalidQuery(
                "price_per_day must be non-negative".to_string(),
            ));
        }

        let vehicle = Vehicle::new(
            new_vehicle.name,
            new_vehicle.category,
            new_vehicle.price_per_day,
            new_vehicle.image_url,
            host_id,
        );
        let saved = self.vehicles.save(vehicle).await?;
        tracing::info!(vehicle_id = %saved.id, host_id = %host_id, "vehicle added");
        Ok(saved)
    }

    /// Update an owned vehicle. A replaced image has its old object
    /// deleted best-effort in the background.
    pub async fn update(
        &self,
        host_id: Uuid,
        vehicle_id: Uuid,
        update: VehicleUpdate,
    ) -> Result<Vehicle, DomainError> {
        let mut vehicle = self.owned(host_id, vehicle_id).await?;

        if let Some(price) = update.price_per_day {
            if price < 0.0 {
                return Err(DomainError::InvalidQuery(
                    "price_per_day must be non-negative".to_string(),
                ));
            }
            vehicle.price_per_day = price;
        }
        if let Some(name) = update.name {
            vehicle.name = name;
        }
        if let Some(category) = update.category {
            vehicle.category = category;
        }
        if let Some(available) = update.available {
            vehicle.available = available;
        }
        if let Some(image_url) = update.image_url {
            if image_url != vehicle.image_url {
                self.delete_object_detached(vehicle.image_url.clone());
            }
            vehicle.image_url = image_url;
        }

        Ok(self.vehicles.save(vehicle).await?)
    }

    /// Delete an owned vehicle. The stored image asset is removed as a
    /// detached best-effort task; a storage failure never blocks or fails
    /// the record deletion.
    pub async fn delete(&self, host_id: Uuid, vehicle_id: Uuid) -> Result<(), DomainError> {
        let vehicle = self.owned(host_id, vehicle_id).await?;

        self.vehicles.delete(vehicle_id).await?;
        if !vehicle.image_url.is_empty() {
            self.delete_object_detached(vehicle.image_url);
        }

        tracing::info!(vehicle_id = %vehicle_id, "vehicle deleted");
        Ok(())
    }

    pub async fn get(&self, vehicle_id: Uuid) -> Result<Vehicle, DomainError> {
        self.vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or(DomainError::NotFound("vehicle"))
    }

    /// Public listing with category/price filters, allow-listed sort, and
    /// offset/limit pagination.
    pub async fn list(&self, query: VehicleQuery) -> Result<Vec<Vehicle>, DomainError> {
        query.validate()?;
        Ok(self.vehicles.list(&query).await?)
    }

    async fn owned(&self, host_id: Uuid, vehicle_id: Uuid) -> Result<Vehicle, DomainError> {
        let vehicle = self
            .vehicles
            .find_by_id(vehicle_id)
            .await?
            .ok_or(DomainError::NotFound("vehicle"))?;
        if vehicle.host_id != host_id {
            return Err(DomainError::Forbidden);
        }
        Ok(vehicle)
    }

    fn delete_object_detached(&self, url: String) {
        let storage = Arc::clone(&self.storage);
        tokio::spawn(async move {
            if let Err(e) = storage.delete(&url).await {
                tracing::warn!(url = %url, error = %e, "failed to remove stored image");
            }
        });
    }
}

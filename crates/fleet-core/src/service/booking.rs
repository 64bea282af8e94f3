//! Booking lifecycle: creation holds the vehicle, deletion releases it.
//!
//! The availability flag and booking existence move as one unit per
//! transition. The hold itself is a compare-and-swap inside the vehicle
//! repository, so two concurrent creates on the same vehicle cannot both
//! win.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Booking;
use crate::error::DomainError;
use crate::ports::{BookingRepository, Clock, VehicleRepository};

/// Longest bookable window, in whole days. Bounding the duration here
/// also keeps the end-time arithmetic inside chrono's representable
/// range.
const MAX_DURATION_DAYS: i64 = 365;

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            bookings,
            vehicles,
            clock,
        }
    }

    /// Book an available vehicle for a whole number of days.
    ///
    /// Fails `NotFound` when the vehicle is absent and `Unavailable` when
    /// it is already held; a losing caller leaves no booking record.
    pub async fn create(
        &self,
        vehicle_id: Uuid,
        user_id: Uuid,
        duration_days: i64,
    ) -> Result<Booking, DomainError> {
        validate_duration(duration_days)?;

        let held = self
            .vehicles
            .try_hold(vehicle_id)
            .await
            .map_err(|e| match e {
                crate::error::RepoError::NotFound => DomainError::NotFound("vehicle"),
                other => other.into(),
            })?;
        if !held {
            return Err(DomainError::Unavailable(
                "vehicle is not available for booking".to_string(),
            ));
        }

        let booking = Booking::new(vehicle_id, user_id, duration_days, self.clock.now());
        match self.bookings.save(booking).await {
            Ok(saved) => {
                tracing::info!(booking_id = %saved.id, vehicle_id = %vehicle_id, "booking created");
                Ok(saved)
            }
            Err(e) => {
                // Undo the hold so a failed save never strands the vehicle.
                if let Err(release_err) = self.vehicles.set_available(vehicle_id, true).await {
                    tracing::error!(vehicle_id = %vehicle_id, error = %release_err,
                        "failed to release hold after save failure");
                }
                Err(e.into())
            }
        }
    }

    /// Change a booking's duration. The end time is recomputed from the
    /// original booking instant; availability is not re-checked since the
    /// vehicle is already held by this booking.
    pub async fn update(
        &self,
        booking_id: Uuid,
        requester_id: Uuid,
        duration_days: i64,
    ) -> Result<Booking, DomainError> {
        validate_duration(duration_days)?;

        let mut booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))?;
        if booking.user_id != requester_id {
            return Err(DomainError::Forbidden);
        }

        booking.set_duration(duration_days);
        Ok(self.bookings.save(booking).await?)
    }

    /// Cancel a booking, restoring the vehicle's availability.
    pub async fn delete(&self, booking_id: Uuid, requester_id: Uuid) -> Result<(), DomainError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))?;
        if booking.user_id != requester_id {
            return Err(DomainError::Forbidden);
        }

        self.bookings.delete(booking_id).await?;

        // A completed booking no longer holds the vehicle, and by now
        // someone else may; only a pending booking releases on delete.
        // The vehicle may also have been deleted by its host in the
        // meantime; that is not an error for the cancelling user.
        if !booking.completed {
            match self.vehicles.set_available(booking.vehicle_id, true).await {
                Ok(()) | Err(crate::error::RepoError::NotFound) => {}
                Err(e) => return Err(e.into()),
            }
        }

        tracing::info!(booking_id = %booking_id, "booking cancelled");
        Ok(())
    }

    pub async fn get(&self, booking_id: Uuid) -> Result<Booking, DomainError> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>, DomainError> {
        Ok(self.bookings.find_by_user(user_id).await?)
    }

    pub async fn list_all(&self) -> Result<Vec<Booking>, DomainError> {
        Ok(self.bookings.list_all().await?)
    }
}

fn validate_duration(duration_days: i64) -> Result<(), DomainError> {
    if (1..=MAX_DURATION_DAYS).contains(&duration_days) {
        Ok(())
    } else {
        Err(DomainError::InvalidQuery(format!(
            "duration must be between 1 and {MAX_DURATION_DAYS} days"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_bounds_are_inclusive() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(MAX_DURATION_DAYS).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-1).is_err());
        assert!(validate_duration(i64::MAX).is_err());
    }
}

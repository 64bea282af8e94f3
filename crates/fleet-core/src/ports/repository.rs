use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Booking, OtpRecord, Review, User, Vehicle, VehicleQuery};
use crate::error::RepoError;

/// Generic repository trait defining standard keyed-record operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find a record by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save a record (create or update).
    async fn save(&self, record: T) -> Result<T, RepoError>;

    /// Delete a record by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
///
/// `save` enforces uniqueness of email and phone and reports violations
/// as [`RepoError::Constraint`].
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepoError>;

    async fn list_all(&self) -> Result<Vec<User>, RepoError>;
}

/// OTP ledger.
///
/// Issuance and consumption are single methods so an adapter can
/// serialize them per user: two concurrent logins must never leave two
/// live codes, and two concurrent verifications must consume at most one.
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Current challenge for a user, live or expired.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<OtpRecord>, RepoError>;

    /// Store a fresh challenge, atomically superseding any prior record
    /// for the same user.
    async fn replace_for_user(&self, record: OtpRecord) -> Result<(), RepoError>;

    /// Atomically remove and return the user's challenge, but only when
    /// its code matches. Returns `None` when no record matches.
    async fn take_matching(&self, user_id: Uuid, code: u32)
    -> Result<Option<OtpRecord>, RepoError>;

    /// Drop the user's challenge unconditionally (issuance rollback).
    async fn delete_for_user(&self, user_id: Uuid) -> Result<(), RepoError>;

    /// Sweep every record whose expiry has passed; returns the count.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError>;
}

/// Vehicle registry.
#[async_trait]
pub trait VehicleRepository: BaseRepository<Vehicle, Uuid> {
    /// Filtered, sorted, paginated listing.
    async fn list(&self, query: &VehicleQuery) -> Result<Vec<Vehicle>, RepoError>;

    /// Compare-and-swap the availability flag from true to false.
    ///
    /// Returns `Ok(true)` when this caller won the hold, `Ok(false)` when
    /// the vehicle was already held, `Err(NotFound)` when it is absent.
    /// Exactly one of two concurrent calls may observe `Ok(true)`.
    async fn try_hold(&self, id: Uuid) -> Result<bool, RepoError>;

    /// Set the availability flag directly (booking release / completion).
    async fn set_available(&self, id: Uuid, available: bool) -> Result<(), RepoError>;
}

/// Booking store.
#[async_trait]
pub trait BookingRepository: BaseRepository<Booking, Uuid> {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Booking>, RepoError>;

    async fn list_all(&self) -> Result<Vec<Booking>, RepoError>;

    /// Bookings with `completed == false` and `end_time < now`.
    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Booking>, RepoError>;

    /// Compare-and-swap the completed flag from false to true.
    ///
    /// Returns `Ok(false)` when the booking is already completed or no
    /// longer exists, which makes the reconciliation sweep idempotent and
    /// safe against a concurrent delete.
    async fn complete_if_pending(&self, id: Uuid) -> Result<bool, RepoError>;
}

/// Review store.
#[async_trait]
pub trait ReviewRepository: BaseRepository<Review, Uuid> {
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Review>, RepoError>;
}

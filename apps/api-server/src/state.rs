//! Application state - shared across all handlers.

use std::sync::Arc;

use fleet_core::ports::{Clock, ObjectStore, OtpMailer, PasswordService, TokenService};
use fleet_core::service::{AuthService, BookingService, Reconciler, ReviewService, VehicleService};
use fleet_infra::auth::{Argon2PasswordService, JwtTokenService};
use fleet_infra::clock::SystemClock;
use fleet_infra::memory::{
    InMemoryBookingRepository, InMemoryOtpRepository, InMemoryReviewRepository,
    InMemoryUserRepository, InMemoryVehicleRepository,
};
use fleet_infra::notify::TracingOtpMailer;
use fleet_infra::storage::RecordingObjectStore;

/// Shared application state: the domain services and the reconciler,
/// wired to the in-memory keyed-record store.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub vehicles: Arc<VehicleService>,
    pub bookings: Arc<BookingService>,
    pub reviews: Arc<ReviewService>,
    pub reconciler: Arc<Reconciler>,
    pub tokens: Arc<dyn TokenService>,
}

impl AppState {
    /// Build the application state with the in-memory adapters.
    pub fn new() -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let otps = Arc::new(InMemoryOtpRepository::new());
        let vehicles = Arc::new(InMemoryVehicleRepository::new());
        let bookings = Arc::new(InMemoryBookingRepository::new());
        let reviews = Arc::new(InMemoryReviewRepository::new());

        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::from_env());
        let mailer: Arc<dyn OtpMailer> = Arc::new(TracingOtpMailer);
        let storage: Arc<dyn ObjectStore> = Arc::new(RecordingObjectStore::new());
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let auth = Arc::new(AuthService::new(
            users.clone(),
            otps.clone(),
            passwords,
            tokens.clone(),
            mailer,
            clock.clone(),
        ));
        let vehicle_service = Arc::new(VehicleService::new(vehicles.clone(), storage));
        let booking_service = Arc::new(BookingService::new(
            bookings.clone(),
            vehicles.clone(),
            clock.clone(),
        ));
        let review_service = Arc::new(ReviewService::new(reviews, bookings.clone()));
        let reconciler = Arc::new(Reconciler::new(otps, bookings, vehicles, clock));

        tracing::info!("Application state initialized (in-memory store)");

        Self {
            auth,
            vehicles: vehicle_service,
            bookings: booking_service,
            reviews: review_service,
            reconciler,
            tokens,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

//! Domain services - orchestration of the ports into the business flows.

mod auth;
mod booking;
mod reconcile;
mod review;
mod vehicle;

pub use auth::{AuthService, NewUser};
pub use booking::BookingService;
pub use reconcile::{Reconciler, SweepReport};
pub use review::{ReviewService, ReviewUpdate};
pub use vehicle::{NewVehicle, VehicleService, VehicleUpdate};

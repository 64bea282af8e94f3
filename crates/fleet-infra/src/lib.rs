//! # Fleet Infrastructure
//!
//! Concrete implementations of the ports defined in `fleet-core`:
//! password hashing, session tokens, the in-memory keyed-record store,
//! the OTP mailer, object storage, and the clock.

pub mod auth;
pub mod clock;
pub mod memory;
pub mod notify;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use clock::{ManualClock, SystemClock};
pub use memory::{
    InMemoryBookingRepository, InMemoryOtpRepository, InMemoryReviewRepository,
    InMemoryUserRepository, InMemoryVehicleRepository,
};
pub use notify::TracingOtpMailer;
pub use storage::RecordingObjectStore;

#[cfg(test)]
mod tests;

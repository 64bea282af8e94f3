//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod clock;
mod notify;
mod repository;
mod storage;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use clock::Clock;
pub use notify::{NotifyError, OtpMailer};
pub use repository::{
    BaseRepository, BookingRepository, OtpRepository, ReviewRepository, UserRepository,
    VehicleRepository,
};
pub use storage::{ObjectStore, StorageError};

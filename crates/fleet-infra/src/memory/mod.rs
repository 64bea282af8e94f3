//! In-memory keyed-record store.
//!
//! Each store guards its map with a single async `RwLock`, so the
//! compare-and-swap port methods (`try_hold`, `take_matching`,
//! `complete_if_pending`) run under one writer and serialize the races
//! the booking and OTP flows care about. Data is lost on restart.

mod bookings;
mod otps;
mod reviews;
mod users;
mod vehicles;

pub use bookings::InMemoryBookingRepository;
pub use otps::InMemoryOtpRepository;
pub use reviews::InMemoryReviewRepository;
pub use users::InMemoryUserRepository;
pub use vehicles::InMemoryVehicleRepository;

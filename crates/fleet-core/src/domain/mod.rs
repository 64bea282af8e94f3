//! Domain entities - the core business objects.

mod booking;
mod otp;
mod review;
mod user;
mod vehicle;

pub use booking::Booking;
pub use otp::OtpRecord;
pub use review::Review;
pub use user::{Role, User};
pub use vehicle::{SortDir, SortField, Vehicle, VehicleQuery};

//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Auth ---

/// Request to register a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub phone: String,
}

/// First login step: password check, OTP dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Second login step: submit the emailed code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: u32,
}

/// Password-gated switch between the user and host roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRoleRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Public account information; never includes credential material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub location: String,
    pub phone: String,
    pub role: String,
    pub created_at: String,
}

// --- Vehicles ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub name: String,
    pub category: String,
    pub price_per_day: f64,
    pub image_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVehicleRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price_per_day: Option<f64>,
    pub available: Option<bool>,
    pub image_url: Option<String>,
}

/// Listing query string. `sort` takes an allow-listed field name,
/// `order` is `asc` or `desc`; pagination defaults to limit=10, offset=0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListVehiclesParams {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleResponse {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price_per_day: f64,
    pub available: bool,
    pub image_url: String,
    pub host_id: Uuid,
}

// --- Bookings ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingRequest {
    pub duration_days: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub duration_days: i64,
    pub booked_at: String,
    pub end_time: String,
    pub completed: bool,
}

// --- Reviews ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    pub vehicle_id: Uuid,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub vehicle_id: Uuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
}

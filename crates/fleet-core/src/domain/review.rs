use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Review entity - a rating left by the user who held a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub booking_id: Uuid,
    pub vehicle_id: Uuid,
    /// 1 through 5 inclusive.
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub fn new(
        user_id: Uuid,
        booking_id: Uuid,
        vehicle_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            booking_id,
            vehicle_id,
            rating,
            comment: comment.unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

//! Reviews: ratings left by the user who held the booking.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Review, Role};
use crate::error::DomainError;
use crate::ports::{BookingRepository, ReviewRepository};

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ReviewUpdate {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { reviews, bookings }
    }

    /// Create a review for a booking the requester holds.
    pub async fn create(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        vehicle_id: Uuid,
        rating: u8,
        comment: Option<String>,
    ) -> Result<Review, DomainError> {
        validate_rating(rating)?;

        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(DomainError::NotFound("booking"))?;
        if booking.user_id != user_id {
            return Err(DomainError::Forbidden);
        }

        let review = Review::new(user_id, booking_id, vehicle_id, rating, comment);
        Ok(self.reviews.save(review).await?)
    }

    pub async fn list_for_vehicle(&self, vehicle_id: Uuid) -> Result<Vec<Review>, DomainError> {
        Ok(self.reviews.find_by_vehicle(vehicle_id).await?)
    }

    pub async fn update(
        &self,
        user_id: Uuid,
        review_id: Uuid,
        update: ReviewUpdate,
    ) -> Result<Review, DomainError> {
        let mut review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(DomainError::NotFound("review"))?;
        if review.user_id != user_id {
            return Err(DomainError::Forbidden);
        }

        if let Some(rating) = update.rating {
            validate_rating(rating)?;
            review.rating = rating;
        }
        if let Some(comment) = update.comment {
            review.comment = comment;
        }

        Ok(self.reviews.save(review).await?)
    }

    /// Delete a review; the author may, and so may an admin.
    pub async fn delete(
        &self,
        user_id: Uuid,
        role: Role,
        review_id: Uuid,
    ) -> Result<(), DomainError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .ok_or(DomainError::NotFound("review"))?;
        if review.user_id != user_id && role != Role::Admin {
            return Err(DomainError::Forbidden);
        }

        Ok(self.reviews.delete(review_id).await?)
    }
}

fn validate_rating(rating: u8) -> Result<(), DomainError> {
    if (1..=5).contains(&rating) {
        Ok(())
    } else {
        Err(DomainError::InvalidQuery(
            "rating must be between 1 and 5".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }
}

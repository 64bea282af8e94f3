use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking entity - a user's hold on a vehicle for a number of whole days.
///
/// While `completed` is false and `end_time` lies in the future, the
/// referenced vehicle must report `available == false`; completion or
/// deletion returns availability to the vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub user_id: Uuid,
    pub duration_days: i64,
    pub booked_at: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub completed: bool,
}

impl Booking {
    pub fn new(
        vehicle_id: Uuid,
        user_id: Uuid,
        duration_days: i64,
        booked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            vehicle_id,
            user_id,
            duration_days,
            booked_at,
            end_time: booked_at + TimeDelta::days(duration_days),
            completed: false,
        }
    }

    /// Change the duration, recomputing the end time from the original
    /// booking instant.
    pub fn set_duration(&mut self, duration_days: i64) {
        self.duration_days = duration_days;
        self.end_time = self.booked_at + TimeDelta::days(duration_days);
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.end_time < now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_time_is_booked_at_plus_duration() {
        let booked_at = Utc::now();
        let booking = Booking::new(Uuid::new_v4(), Uuid::new_v4(), 2, booked_at);
        assert_eq!(booking.end_time, booked_at + TimeDelta::days(2));
        assert!(!booking.completed);
    }

    #[test]
    fn set_duration_keeps_original_booking_instant() {
        let booked_at = Utc::now();
        let mut booking = Booking::new(Uuid::new_v4(), Uuid::new_v4(), 2, booked_at);
        booking.set_duration(5);
        assert_eq!(booking.booked_at, booked_at);
        assert_eq!(booking.end_time, booked_at + TimeDelta::days(5));
    }

    #[test]
    fn overdue_requires_pending_and_past_end() {
        let booked_at = Utc::now() - TimeDelta::days(3);
        let mut booking = Booking::new(Uuid::new_v4(), Uuid::new_v4(), 2, booked_at);
        assert!(booking.is_overdue(Utc::now()));
        booking.completed = true;
        assert!(!booking.is_overdue(Utc::now()));
    }
}

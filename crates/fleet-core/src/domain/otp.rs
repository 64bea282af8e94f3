use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One-time passcode bound to a single user.
///
/// At most one live record per user exists at verification time; issuing
/// a new challenge supersedes any prior one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: u32,
    pub expires_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn new(user_id: Uuid, code: u32, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            code,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let otp = OtpRecord::new(Uuid::new_v4(), 123456, now);
        assert!(otp.is_expired(now));
        assert!(!otp.is_expired(now - TimeDelta::seconds(1)));
    }
}

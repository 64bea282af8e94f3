use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use fleet_core::domain::OtpRecord;
use fleet_core::error::RepoError;
use fleet_core::ports::OtpRepository;

/// In-memory OTP ledger, keyed by user.
///
/// Keying by user makes "at most one live challenge per user" structural:
/// storing a fresh record supersedes the prior one in the same map slot,
/// and take-then-delete is a single write-lock operation.
pub struct InMemoryOtpRepository {
    store: RwLock<HashMap<Uuid, OtpRecord>>,
}

impl InMemoryOtpRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of records currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemoryOtpRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OtpRepository for InMemoryOtpRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<OtpRecord>, RepoError> {
        Ok(self.store.read().await.get(&user_id).cloned())
    }

    async fn replace_for_user(&self, record: OtpRecord) -> Result<(), RepoError> {
        self.store.write().await.insert(record.user_id, record);
        Ok(())
    }

    async fn take_matching(
        &self,
        user_id: Uuid,
        code: u32,
    ) -> Result<Option<OtpRecord>, RepoError> {
        let mut store = self.store.write().await;
        match store.get(&user_id) {
            Some(record) if record.code == code => Ok(store.remove(&user_id)),
            _ => Ok(None),
        }
    }

    async fn delete_for_user(&self, user_id: Uuid) -> Result<(), RepoError> {
        self.store.write().await.remove(&user_id);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepoError> {
        let mut store = self.store.write().await;
        let before = store.len();
        store.retain(|_, record| !record.is_expired(now));
        Ok((before - store.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn replace_supersedes_prior_challenge() {
        let repo = InMemoryOtpRepository::new();
        let user_id = Uuid::new_v4();
        let expiry = Utc::now() + TimeDelta::minutes(5);

        repo.replace_for_user(OtpRecord::new(user_id, 111111, expiry))
            .await
            .unwrap();
        repo.replace_for_user(OtpRecord::new(user_id, 222222, expiry))
            .await
            .unwrap();

        assert_eq!(repo.len().await, 1);
        let current = repo.find_by_user(user_id).await.unwrap().unwrap();
        assert_eq!(current.code, 222222);
    }

    #[tokio::test]
    async fn take_matching_consumes_exactly_once() {
        let repo = InMemoryOtpRepository::new();
        let user_id = Uuid::new_v4();
        let expiry = Utc::now() + TimeDelta::minutes(5);
        repo.replace_for_user(OtpRecord::new(user_id, 333333, expiry))
            .await
            .unwrap();

        assert!(repo.take_matching(user_id, 333333).await.unwrap().is_some());
        assert!(repo.take_matching(user_id, 333333).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn take_matching_leaves_mismatches_in_place() {
        let repo = InMemoryOtpRepository::new();
        let user_id = Uuid::new_v4();
        let expiry = Utc::now() + TimeDelta::minutes(5);
        repo.replace_for_user(OtpRecord::new(user_id, 444444, expiry))
            .await
            .unwrap();

        assert!(repo.take_matching(user_id, 999999).await.unwrap().is_none());
        assert!(repo.find_by_user(user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_expired_counts_only_stale_records() {
        let repo = InMemoryOtpRepository::new();
        let now = Utc::now();
        repo.replace_for_user(OtpRecord::new(
            Uuid::new_v4(),
            111111,
            now - TimeDelta::minutes(1),
        ))
        .await
        .unwrap();
        repo.replace_for_user(OtpRecord::new(
            Uuid::new_v4(),
            222222,
            now + TimeDelta::minutes(5),
        ))
        .await
        .unwrap();

        assert_eq!(repo.delete_expired(now).await.unwrap(), 1);
        assert_eq!(repo.len().await, 1);
    }
}

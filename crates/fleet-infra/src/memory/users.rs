use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fleet_core::domain::User;
use fleet_core::error::RepoError;
use fleet_core::ports::{BaseRepository, UserRepository};

/// In-memory credential store with unique email and phone.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        // Unique-index checks against every other record.
        for existing in store.values() {
            if existing.id == user.id {
                continue;
            }
            if existing.email == user.email {
                return Err(RepoError::Constraint("email".to_string()));
            }
            if existing.phone == user.phone {
                return Err(RepoError::Constraint("phone".to_string()));
            }
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        if self.store.write().await.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .store
            .read()
            .await
            .values()
            .find(|u| u.phone == phone)
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.store.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, phone: &str) -> User {
        User::new(
            email.to_string(),
            "hash".to_string(),
            "U".to_string(),
            None,
            phone.to_string(),
        )
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@x.com", "1")).await.unwrap();

        let err = repo.save(user("a@x.com", "2")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(f) if f == "email"));
    }

    #[tokio::test]
    async fn duplicate_phone_is_a_constraint_violation() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("a@x.com", "1")).await.unwrap();

        let err = repo.save(user("b@x.com", "1")).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(f) if f == "phone"));
    }

    #[tokio::test]
    async fn save_same_id_updates_in_place() {
        let repo = InMemoryUserRepository::new();
        let mut u = repo.save(user("a@x.com", "1")).await.unwrap();
        u.name = "Renamed".to_string();
        repo.save(u.clone()).await.unwrap();

        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
    }
}

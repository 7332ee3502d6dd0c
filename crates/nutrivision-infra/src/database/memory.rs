//! In-memory user repository, used when no database is configured and in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use nutrivision_core::domain::User;
use nutrivision_core::error::RepoError;
use nutrivision_core::ports::{BaseRepository, UserRepository};

/// HashMap-backed repository enforcing the same uniqueness rules as the
/// `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn find_where(&self, pred: impl Fn(&User) -> bool) -> Option<User> {
        self.users.read().await.values().find(|u| pred(u)).cloned()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn save(&self, entity: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        let taken = users.values().any(|u| {
            u.id != entity.id && (u.username == entity.username || u.email == entity.email)
        });
        if taken {
            return Err(RepoError::Constraint(
                "Username or email already taken.".to_string(),
            ));
        }

        users.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        match self.users.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let email = email.trim();
        Ok(self.find_where(|u| u.email == email).await)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let username = username.trim();
        Ok(self.find_where(|u| u.username == username).await)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<User>, RepoError> {
        Ok(self.find_where(|u| u.matches_login(login)).await)
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut users = self.users.write().await;
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User::new(name, &format!("{}@example.com", name), "hash".to_string())
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryUserRepository::new();
        let saved = repo.save(user("alice")).await.unwrap();

        assert!(repo.find_by_id(saved.id).await.unwrap().is_some());
        assert!(repo.find_by_email("alice@example.com").await.unwrap().is_some());
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        assert!(repo.find_by_login("alice").await.unwrap().is_some());
        assert!(repo.find_by_login("alice@example.com").await.unwrap().is_some());
        assert!(repo.find_by_login("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.save(user("alice")).await.unwrap();

        let clash = User::new("alice", "other@example.com", "hash".to_string());
        let result = repo.save(clash).await;

        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_update_in_place_is_not_a_duplicate() {
        let repo = InMemoryUserRepository::new();
        let mut alice = repo.save(user("alice")).await.unwrap();

        alice.profile.diet = "keto".to_string();
        repo.save(alice.clone()).await.unwrap();

        let stored = repo.find_by_id(alice.id).await.unwrap().unwrap();
        assert_eq!(stored.profile.diet, "keto");
    }

    #[tokio::test]
    async fn test_delete_and_delete_all() {
        let repo = InMemoryUserRepository::new();
        let alice = repo.save(user("alice")).await.unwrap();
        repo.save(user("bob")).await.unwrap();
        repo.save(user("carol")).await.unwrap();

        repo.delete(alice.id).await.unwrap();
        assert!(matches!(repo.delete(alice.id).await, Err(RepoError::NotFound)));

        assert_eq!(repo.delete_all().await.unwrap(), 2);
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }
}

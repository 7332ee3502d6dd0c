use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::profile::{ChatMessage, DietProfile};

/// User entity - credentials plus dietary preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub profile: DietProfile,
    pub chat_history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID, default profile and timestamps.
    ///
    /// `username` and `email` are stored trimmed.
    pub fn new(username: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: email.trim().to_string(),
            password_hash,
            profile: DietProfile::default(),
            chat_history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the dietary profile and bump `updated_at`.
    pub fn set_profile(&mut self, profile: DietProfile) {
        self.profile = profile;
        self.touch();
    }

    /// Mark the entity as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Whether `login` names this user, by email or username.
    pub fn matches_login(&self, login: &str) -> bool {
        let login = login.trim();
        self.email == login || self.username == login
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_trims_and_defaults() {
        let user = User::new("  alice ", " alice@example.com", "hash".to_string());

        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.profile.diet, "none");
        assert!(user.profile.allergies.is_empty());
        assert!(user.chat_history.is_empty());
    }

    #[test]
    fn test_matches_login() {
        let user = User::new("alice", "alice@example.com", "hash".to_string());

        assert!(user.matches_login("alice"));
        assert!(user.matches_login("alice@example.com"));
        assert!(!user.matches_login("bob"));
    }

    #[test]
    fn test_set_profile_updates_timestamp() {
        let mut user = User::new("alice", "alice@example.com", "hash".to_string());
        let before = user.updated_at;

        user.set_profile(DietProfile {
            diet: "vegan".to_string(),
            ..DietProfile::default()
        });

        assert_eq!(user.profile.diet, "vegan");
        assert!(user.updated_at >= before);
    }
}

//! Data Transfer Objects - request/response types for the API.
//!
//! Field names follow the camelCase the web client sends and expects.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Partial update of a user's credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request to login with either an email address or a username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(rename = "emailOrUsername", alias = "email", alias = "username")]
    pub email_or_username: String,
    pub password: String,
}

/// Response to a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub email: String,
    pub username: String,
}

/// Refresh request body. The cookie takes precedence when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// A newly minted access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64,
}

/// Plain acknowledgement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A list field the client may send either as an array or as a
/// comma-separated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringList {
    List(Vec<String>),
    Text(String),
}

impl StringList {
    /// Normalize into trimmed, non-empty entries.
    pub fn into_vec(self) -> Vec<String> {
        let items: Vec<String> = match self {
            StringList::List(items) => items,
            StringList::Text(text) => text.split(',').map(str::to_string).collect(),
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

impl Default for StringList {
    fn default() -> Self {
        StringList::List(Vec::new())
    }
}

/// Replacement dietary profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub health_conditions: StringList,
    pub diet: Option<String>,
    pub allergies: StringList,
    pub favorite_dishes: StringList,
    pub disliked_dishes: StringList,
}

/// Response containing a user's public information. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub diet: String,
    pub health_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub favorite_dishes: Vec<String>,
    pub disliked_dishes: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_accepts_aliases() {
        let a: LoginRequest =
            serde_json::from_str(r#"{"emailOrUsername":"alice","password":"x"}"#).unwrap();
        let b: LoginRequest =
            serde_json::from_str(r#"{"email":"alice@example.com","password":"x"}"#).unwrap();

        assert_eq!(a.email_or_username, "alice");
        assert_eq!(b.email_or_username, "alice@example.com");
    }

    #[test]
    fn test_string_list_from_text() {
        let list: StringList = serde_json::from_str(r#"" peanuts, shellfish ,, ""#).unwrap();
        assert_eq!(list.into_vec(), vec!["peanuts", "shellfish"]);
    }

    #[test]
    fn test_profile_request_defaults_missing_fields() {
        let req: UpdateProfileRequest =
            serde_json::from_str(r#"{"diet":"vegan","allergies":["nuts"]}"#).unwrap();

        assert_eq!(req.diet.as_deref(), Some("vegan"));
        assert_eq!(req.allergies.into_vec(), vec!["nuts"]);
        assert!(req.favorite_dishes.into_vec().is_empty());
    }
}

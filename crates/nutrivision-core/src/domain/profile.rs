use serde::{Deserialize, Serialize};

/// Dietary preferences attached to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DietProfile {
    pub diet: String,
    pub health_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub favorite_dishes: Vec<String>,
    pub disliked_dishes: Vec<String>,
}

impl Default for DietProfile {
    fn default() -> Self {
        Self {
            diet: "none".to_string(),
            health_conditions: Vec::new(),
            allergies: Vec::new(),
            favorite_dishes: Vec::new(),
            disliked_dishes: Vec::new(),
        }
    }
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One entry of a user's embedded chat history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_uses_camel_case() {
        let json = serde_json::to_value(DietProfile::default()).unwrap();

        assert_eq!(json["diet"], "none");
        assert!(json.get("favoriteDishes").is_some());
        assert!(json.get("healthConditions").is_some());
    }

    #[test]
    fn test_chat_role_serialization() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"Eat more greens"}"#).unwrap();

        assert_eq!(msg.role, ChatRole::Assistant);
        assert!(serde_json::from_str::<ChatMessage>(r#"{"role":"bot","content":""}"#).is_err());
    }
}

//! Ports for the external LLM and image-recognition services.
//!
//! Both services own their response formats; the API passes their JSON
//! through unchanged, so results are plain `serde_json::Value`s.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::DietProfile;

/// An uploaded image held in memory.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A chat turn forwarded to the LLM service together with the sender's profile.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: Uuid,
    pub message: String,
    pub chat_id: Option<String>,
    /// Prior image-recognition output supplied by the client.
    pub recognition_result: Option<serde_json::Value>,
    pub image: Option<ImageUpload>,
    pub profile: DietProfile,
}

/// Client for the LLM microservice.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat message and return the service's reply.
    async fn chat(&self, request: ChatRequest) -> Result<serde_json::Value, UpstreamError>;

    /// List the chats stored for a user.
    async fn chat_history(&self, user_id: Uuid) -> Result<serde_json::Value, UpstreamError>;

    /// Fetch the messages of a single chat.
    async fn chat_one(&self, chat_id: &str) -> Result<serde_json::Value, UpstreamError>;
}

/// Client for the image-recognition microservice.
#[async_trait]
pub trait RecognitionClient: Send + Sync {
    /// Recognize food items in an image. `None` forwards an empty form.
    async fn recognize(
        &self,
        image: Option<ImageUpload>,
    ) -> Result<serde_json::Value, UpstreamError>;
}

/// Upstream call failures.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{service} is not configured")]
    NotConfigured { service: &'static str },

    #[error("{service} request failed: {message}")]
    Request {
        service: &'static str,
        message: String,
    },

    #[error("{service} responded with status {status}")]
    Status { service: &'static str, status: u16 },

    #[error("{service} returned an unreadable body: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },
}

use async_trait::async_trait;
use reqwest::multipart::Form;
use uuid::Uuid;

use nutrivision_core::ports::{ChatRequest, LlmClient, UpstreamError};

use super::{UpstreamConfig, image_part, join_url, send_json};

const SERVICE: &str = "LLM service";

/// LLM service client speaking multipart for chat and JSON for history.
pub struct HttpLlmClient {
    client: reqwest::Client,
    base_url: Option<String>,
}

impl HttpLlmClient {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        if config.llm_url.is_none() {
            tracing::warn!("LLM_API_URL not set; chat routes will fail");
        }
        Self {
            client,
            base_url: config.llm_url.clone(),
        }
    }

    fn url(&self, path: &str) -> Result<String, UpstreamError> {
        self.base_url
            .as_deref()
            .map(|base| join_url(base, path))
            .ok_or(UpstreamError::NotConfigured { service: SERVICE })
    }
}

fn json_field<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Multipart form as the LLM service expects it. Profile lists are JSON-encoded.
fn chat_form(request: ChatRequest) -> Result<Form, UpstreamError> {
    let profile = &request.profile;
    let mut form = Form::new()
        .text("message", request.message.clone())
        .text("diet", json_field(&profile.diet))
        .text("Allergies", json_field(&profile.allergies))
        .text("favouriteDishes", json_field(&profile.favorite_dishes))
        .text("dislikedDishes", json_field(&profile.disliked_dishes))
        .text("healthConditions", json_field(&profile.health_conditions))
        .text("userId", request.user_id.to_string());

    if let Some(chat_id) = request.chat_id {
        form = form.text("chatId", chat_id);
    }
    if let Some(result) = request.recognition_result {
        form = form.text("imageRecognitionResult", json_field(&result));
    }
    if let Some(image) = request.image {
        form = form.part("image", image_part(SERVICE, image)?);
    }

    Ok(form)
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn chat(&self, request: ChatRequest) -> Result<serde_json::Value, UpstreamError> {
        let url = self.url("chat")?;
        tracing::info!(user_id = %request.user_id, has_image = request.image.is_some(), "Forwarding chat message");

        let form = chat_form(request)?;
        send_json(SERVICE, self.client.post(url).multipart(form)).await
    }

    async fn chat_history(&self, user_id: Uuid) -> Result<serde_json::Value, UpstreamError> {
        let url = self.url(&format!("chat_history/{}", user_id))?;
        send_json(SERVICE, self.client.get(url)).await
    }

    async fn chat_one(&self, chat_id: &str) -> Result<serde_json::Value, UpstreamError> {
        let url = self.url(&format!("chat_one/{}", chat_id))?;
        send_json(SERVICE, self.client.get(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nutrivision_core::domain::DietProfile;
    use nutrivision_core::ports::ImageUpload;

    #[tokio::test]
    async fn test_unconfigured_client_fails_fast() {
        let client = HttpLlmClient::new(reqwest::Client::new(), &UpstreamConfig::default());

        let result = client.chat_history(Uuid::new_v4()).await;
        assert!(matches!(result, Err(UpstreamError::NotConfigured { .. })));
    }

    #[test]
    fn test_chat_form_includes_optional_parts() {
        let request = ChatRequest {
            user_id: Uuid::new_v4(),
            message: "What's in a Caesar salad?".to_string(),
            chat_id: Some("chat-1".to_string()),
            recognition_result: Some(serde_json::json!({"items": ["lettuce"]})),
            image: Some(ImageUpload {
                filename: "salad.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: vec![0x89, 0x50],
            }),
            profile: DietProfile::default(),
        };

        let form = chat_form(request).unwrap();
        assert!(!form.boundary().is_empty());
    }
}

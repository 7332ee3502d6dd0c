//! HTTP clients for the LLM and image-recognition microservices.

mod llm;
mod recognition;

use std::time::Duration;

use reqwest::multipart::Part;

use nutrivision_core::ports::{ImageUpload, UpstreamError};

pub use llm::HttpLlmClient;
pub use recognition::HttpRecognitionClient;

/// Upstream endpoints and timeouts.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the LLM service. Unset disables the chat routes.
    pub llm_url: Option<String>,
    /// Base URL of the recognition service.
    pub recognition_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            llm_url: None,
            recognition_url: "http://localhost:3001".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl UpstreamConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            llm_url: std::env::var("LLM_API_URL").ok().filter(|s| !s.is_empty()),
            recognition_url: std::env::var("IMAGE_RECOGNITION_API_URL")
                .unwrap_or(defaults.recognition_url),
            timeout: std::env::var("UPSTREAM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
        }
    }
}

/// Build the shared HTTP client.
pub fn http_client(config: &UpstreamConfig) -> Result<reqwest::Client, UpstreamError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| UpstreamError::Request {
            service: "http client",
            message: e.to_string(),
        })
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

fn image_part(service: &'static str, image: ImageUpload) -> Result<Part, UpstreamError> {
    let part = Part::bytes(image.bytes).file_name(image.filename);
    match image.content_type {
        Some(mime) => part.mime_str(&mime).map_err(|e| UpstreamError::Request {
            service,
            message: e.to_string(),
        }),
        None => Ok(part),
    }
}

/// Send a prepared request and decode the JSON body, mapping failures.
async fn send_json(
    service: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<serde_json::Value, UpstreamError> {
    let response = request.send().await.map_err(|e| UpstreamError::Request {
        service,
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(service, status = status.as_u16(), "Upstream returned error status");
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
        });
    }

    response
        .json::<serde_json::Value>()
        .await
        .map_err(|e| UpstreamError::Decode {
            service,
            message: e.to_string(),
        })
}

use async_trait::async_trait;
use reqwest::multipart::Form;

use nutrivision_core::ports::{ImageUpload, RecognitionClient, UpstreamError};

use super::{UpstreamConfig, image_part, join_url, send_json};

const SERVICE: &str = "recognition service";

/// Image-recognition client posting the image to `{base}/recognize`.
pub struct HttpRecognitionClient {
    client: reqwest::Client,
    url: String,
}

impl HttpRecognitionClient {
    pub fn new(client: reqwest::Client, config: &UpstreamConfig) -> Self {
        Self {
            client,
            url: join_url(&config.recognition_url, "recognize"),
        }
    }
}

#[async_trait]
impl RecognitionClient for HttpRecognitionClient {
    async fn recognize(
        &self,
        image: Option<ImageUpload>,
    ) -> Result<serde_json::Value, UpstreamError> {
        let mut form = Form::new();
        if let Some(image) = image {
            tracing::info!(filename = %image.filename, size = image.bytes.len(), "Forwarding image to recognition service");
            form = form.part("image", image_part(SERVICE, image)?);
        }

        send_json(SERVICE, self.client.post(&self.url).multipart(form)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_url() {
        let config = UpstreamConfig {
            recognition_url: "http://vision:3001/".to_string(),
            ..UpstreamConfig::default()
        };
        let client = HttpRecognitionClient::new(reqwest::Client::new(), &config);

        assert_eq!(client.url, "http://vision:3001/recognize");
    }
}

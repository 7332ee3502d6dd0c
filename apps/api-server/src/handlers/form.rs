//! Multipart form reading for the upload routes.

use std::collections::HashMap;

use actix_multipart::Multipart;
use futures::StreamExt;

use nutrivision_core::ports::ImageUpload;

use crate::config::MAX_BODY_BYTES;
use crate::middleware::error::{AppError, AppResult};

/// Name of the file field the web client uses.
const IMAGE_FIELD: &str = "image";

/// A fully buffered multipart form: text fields plus an optional image.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image: Option<ImageUpload>,
}

impl UploadForm {
    /// Trimmed, non-empty text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read every part of `payload`, capping the total size.
pub async fn read_upload_form(mut payload: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            total += chunk.len();
            if total > MAX_BODY_BYTES {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds {} MB",
                    MAX_BODY_BYTES / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        if name == IMAGE_FIELD {
            if bytes.is_empty() {
                continue;
            }
            form.image = Some(ImageUpload {
                filename: filename.unwrap_or_else(|| "upload".to_string()),
                content_type,
                bytes,
            });
        } else {
            let value = String::from_utf8(bytes)
                .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

//! Image recognition proxy.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use crate::handlers::form::read_upload_form;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/recognition - multipart `image` forwarded to the recognition service
pub async fn recognize(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let form = read_upload_form(payload).await?;
    if form.image.is_none() {
        tracing::debug!(user_id = %current.user.id, "Recognition request without image");
    }

    let result = state.recognition.recognize(form.image).await?;
    Ok(HttpResponse::Ok().json(result))
}

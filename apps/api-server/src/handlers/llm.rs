//! LLM chat proxy.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use nutrivision_core::ports::ChatRequest;

use crate::handlers::form::read_upload_form;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/llm/chat
///
/// Multipart fields: `message` (required), `chatId`, `result` (earlier
/// recognition output) and `image`.
pub async fn chat(
    state: web::Data<AppState>,
    current: CurrentUser,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = read_upload_form(payload).await?;

    let message = form
        .text("message")
        .ok_or_else(|| AppError::BadRequest("message is required".to_string()))?
        .to_string();
    let chat_id = form.text("chatId").map(str::to_string);
    let recognition_result = form
        .text("result")
        .map(|r| serde_json::Value::String(r.to_string()));

    let user = current.user;
    let request = ChatRequest {
        user_id: user.id,
        message,
        chat_id,
        recognition_result,
        image: form.image.take(),
        profile: user.profile,
    };

    let reply = state.llm.chat(request).await?;
    Ok(HttpResponse::Ok().json(reply))
}

/// GET /api/llm/chat_history
pub async fn chat_history(
    state: web::Data<AppState>,
    current: CurrentUser,
) -> AppResult<HttpResponse> {
    let history = state.llm.chat_history(current.user.id).await?;
    Ok(HttpResponse::Ok().json(history))
}

/// GET /api/llm/chat_one/{chat_id}
pub async fn chat_one(
    state: web::Data<AppState>,
    _current: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let chat = state.llm.chat_one(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(chat))
}

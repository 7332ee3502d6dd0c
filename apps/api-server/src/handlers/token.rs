//! Token validation and refresh.

use actix_web::{HttpRequest, HttpResponse, web};

use nutrivision_core::ports::{AuthError, TokenKind};
use nutrivision_shared::dto::{MessageResponse, RefreshRequest, TokenResponse};

use crate::handlers::login::REFRESH_COOKIE;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/token/validate
///
/// The token gate has already done the work; this reports its verdict.
pub async fn validate(current: Option<CurrentUser>) -> AppResult<HttpResponse> {
    match current {
        Some(_) => Ok(HttpResponse::Ok().json(MessageResponse::new("Token is valid"))),
        None => Err(AppError::BadRequest("Invalid token".to_string())),
    }
}

/// POST /api/token/refresh
///
/// The refresh token comes from the `refreshToken` cookie or, failing
/// that, the JSON body.
pub async fn refresh(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Option<web::Json<RefreshRequest>>,
) -> AppResult<HttpResponse> {
    let refresh_token = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| body.and_then(|b| b.into_inner().refresh_token))
        .ok_or_else(|| AppError::BadRequest("Refresh token is required".to_string()))?;

    if state.blacklist.is_revoked(&refresh_token).await {
        return Err(AuthError::TokenRevoked.into());
    }

    let claims = state
        .tokens
        .validate_token(&refresh_token, TokenKind::Refresh)?;

    let user = state
        .users
        .find_by_id(claims.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = state.tokens.generate_access_token(user.id, &user.email)?;
    tracing::debug!(user_id = %user.id, "Access token refreshed");

    Ok(HttpResponse::Ok().json(TokenResponse {
        token,
        expires_in: state.tokens.access_expiration_seconds(),
    }))
}

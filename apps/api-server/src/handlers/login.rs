//! Login and logout.

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpRequest, HttpResponse, web};

use nutrivision_core::ports::{AuthError, TokenKind};
use nutrivision_shared::dto::{LoginRequest, LoginResponse, MessageResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Cookie carrying the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";
const REFRESH_COOKIE_PATH: &str = "/api";

fn refresh_cookie(token: String, max_age_secs: i64, secure: bool) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token)
        .path(REFRESH_COOKIE_PATH)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

fn expired_refresh_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(REFRESH_COOKIE, "")
        .path(REFRESH_COOKIE_PATH)
        .finish();
    cookie.make_removal();
    cookie
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_login(&req.email_or_username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::info!(user_id = %user.id, "Login rejected: wrong password");
        return Err(AuthError::InvalidCredentials.into());
    }

    let pair = state.tokens.generate_pair(user.id, &user.email)?;
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie(
            pair.refresh_token.clone(),
            pair.refresh_expires_in,
            state.settings.secure_cookies,
        ))
        .json(LoginResponse {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_in: pair.access_expires_in,
            email: user.email,
            username: user.username,
        }))
}

/// POST /api/login/logout
///
/// Revokes the presented access token and, when the refresh cookie is
/// present and valid, the refresh token too. An expired access token is
/// ignored so the refresh cookie can still be revoked.
pub async fn logout(
    state: web::Data<AppState>,
    current: Option<CurrentUser>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let refresh_token = req
        .cookie(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    if current.is_none() && refresh_token.is_none() {
        return Err(AppError::Unauthorized);
    }

    if let Some(current) = &current {
        state
            .blacklist
            .revoke(&current.token, current.token_expires_at)
            .await?;
    }

    if let Some(token) = refresh_token {
        match state.tokens.validate_token(&token, TokenKind::Refresh) {
            Ok(claims) => {
                state.blacklist.revoke(&token, claims.expires_at()).await?;
            }
            Err(e) => tracing::debug!(error = %e, "Ignoring unusable refresh cookie on logout"),
        }
    }

    tracing::info!(user_id = ?current.as_ref().map(|c| c.user.id), "User logged out");

    Ok(HttpResponse::Ok()
        .cookie(expired_refresh_cookie())
        .json(MessageResponse::new("Logged out successfully")))
}

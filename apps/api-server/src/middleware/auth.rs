//! Token gate middleware and the authenticated-user extractor.
//!
//! For every request carrying `Authorization: Bearer <token>` the gate
//! sweeps expired blacklist entries, rejects revoked tokens, validates the
//! token as an access token and attaches the owning user to the request.
//! Requests without a bearer token pass through anonymously; handlers that
//! need a user extract [`CurrentUser`], which fails with 401 when none is
//! attached.

use std::future::{Ready, ready};
use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{self, HeaderMap};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use chrono::{DateTime, Utc};
use futures::future::LocalBoxFuture;

use nutrivision_core::domain::User;
use nutrivision_core::ports::{AuthError, TokenKind};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// The user behind the request's bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// The raw access token, kept so logout can revoke it.
    pub token: String,
    pub token_expires_at: DateTime<Utc>,
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<CurrentUser>()
                .cloned()
                .ok_or(AppError::Unauthorized),
        )
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// A header using another scheme is treated as absent.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AuthError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        Some(_) => Err(AuthError::MissingAuth),
        None => Ok(None),
    }
}

/// Session routes where an expired or malformed bearer token counts as
/// absent, so a stale client can still log in, refresh or log out.
/// Revoked tokens are rejected everywhere.
const STALE_TOKEN_PATHS: &[&str] = &["/api/login", "/api/login/logout", "/api/token/refresh"];

fn tolerates_stale_token(path: &str) -> bool {
    STALE_TOKEN_PATHS.contains(&path)
}

/// Resolve a bearer token to its user. `Ok(None)` when the user no longer exists.
async fn authenticate(state: &AppState, token: &str) -> Result<Option<CurrentUser>, AppError> {
    let purged = state.blacklist.purge_expired().await;
    if purged > 0 {
        tracing::debug!(purged, "Expired blacklist entries removed");
    }

    if state.blacklist.is_revoked(token).await {
        tracing::info!("Rejected blacklisted token");
        return Err(AuthError::TokenRevoked.into());
    }

    let claims = state.tokens.validate_token(token, TokenKind::Access)?;

    let user = state.users.find_by_id(claims.user_id).await?;
    if user.is_none() {
        tracing::info!(user_id = %claims.user_id, "Token subject no longer exists");
    }

    Ok(user.map(|user| CurrentUser {
        user,
        token: token.to_string(),
        token_expires_at: claims.expires_at(),
    }))
}

/// Token gate middleware factory.
pub struct TokenGate {
    state: AppState,
}

impl TokenGate {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = TokenGateService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGateService {
            service: Rc::new(service),
            state: self.state.clone(),
        }))
    }
}

pub struct TokenGateService<S> {
    service: Rc<S>,
    state: AppState,
}

impl<S, B> Service<ServiceRequest> for TokenGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let state = self.state.clone();

        Box::pin(async move {
            let outcome = match bearer_token(req.headers()) {
                Ok(Some(token)) => authenticate(&state, &token).await,
                Ok(None) => Ok(None),
                Err(e) => Err(AppError::from(e)),
            };

            let outcome = match outcome {
                Err(AppError::Auth(
                    AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth,
                )) if tolerates_stale_token(req.path()) => {
                    tracing::debug!(path = %req.path(), "Ignoring unusable bearer token");
                    Ok(None)
                }
                other => other,
            };

            match outcome {
                Ok(Some(current)) => {
                    req.extensions_mut().insert(current);
                }
                Ok(None) => {}
                Err(err) => {
                    return Ok(req.error_response(err).map_into_right_body());
                }
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

//! Error handling - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use std::fmt;

use nutrivision_core::error::{DomainError, RepoError};
use nutrivision_core::ports::{AuthError, UpstreamError};
use nutrivision_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    Conflict(String),
    PayloadTooLarge(String),
    TooManyRequests { retry_after_secs: u64 },
    Auth(AuthError),
    Upstream(UpstreamError),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::PayloadTooLarge(msg) => write!(f, "Payload too large: {}", msg),
            AppError::TooManyRequests { retry_after_secs } => {
                write!(f, "Too many requests, retry after {}s", retry_after_secs)
            }
            AppError::Auth(err) => write!(f, "Authentication failed: {}", err),
            AppError::Upstream(err) => write!(f, "Upstream failure: {}", err),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Auth(err) => match err {
                AuthError::HashingError(_) | AuthError::Backend(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::UNAUTHORIZED,
            },
            AppError::Upstream(err) => match err {
                UpstreamError::NotConfigured { .. } => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden(detail) => ErrorResponse::forbidden().with_detail(detail),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::PayloadTooLarge(detail) => {
                ErrorResponse::new(413, "Payload Too Large").with_detail(detail)
            }
            AppError::TooManyRequests { retry_after_secs } => {
                ErrorResponse::new(429, "Too Many Requests").with_detail(format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_after_secs
                ))
            }
            AppError::Auth(err) => auth_error_body(err),
            AppError::Upstream(err) => {
                tracing::error!(error = %err, "Upstream call failed");
                match err {
                    UpstreamError::NotConfigured { .. } => {
                        ErrorResponse::new(503, "Service Unavailable").with_detail(err.to_string())
                    }
                    _ => ErrorResponse::bad_gateway(err.to_string()),
                }
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests { retry_after_secs } = self {
            builder.insert_header(("Retry-After", retry_after_secs.to_string()));
        }
        builder.json(error)
    }
}

fn auth_error_body(err: &AuthError) -> ErrorResponse {
    match err {
        AuthError::InvalidCredentials => {
            ErrorResponse::unauthorized().with_detail("Invalid email/username or password")
        }
        AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
            .with_detail("Your authentication token has expired. Please login again."),
        AuthError::InvalidToken(_) => {
            ErrorResponse::new(401, "Invalid Token").with_detail("token missing or invalid")
        }
        AuthError::TokenRevoked => ErrorResponse::new(401, "Invalid Token")
            .with_detail("Token is invalid or blacklisted"),
        AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
            .with_detail("Please provide a valid Bearer token in the Authorization header."),
        AuthError::HashingError(msg) | AuthError::Backend(msg) => {
            tracing::error!("Auth backend error: {}", msg);
            ErrorResponse::internal_error()
        }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::UserNotFound { id } => {
                AppError::NotFound(format!("user with id {} not found", id))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::DuplicateUser => {
                AppError::Conflict("Username or email already taken.".to_string())
            }
            DomainError::Unauthorized => AppError::Unauthorized,
            DomainError::Forbidden(msg) => AppError::Forbidden(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) | RepoError::Query(msg) | RepoError::Corrupt(msg) => {
                tracing::error!("Database error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Auth(err)
    }
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        AppError::Upstream(err)
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::Auth(AuthError::TokenRevoked).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Auth(AuthError::HashingError("x".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(RepoError::Constraint("dup".into())).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(UpstreamError::Status {
                service: "LLM service",
                status: 500
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::from(UpstreamError::NotConfigured {
                service: "LLM service"
            })
            .status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_rate_limit_response_has_retry_after() {
        let response = AppError::TooManyRequests {
            retry_after_secs: 42,
        }
        .error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get("Retry-After").unwrap(), "42");
    }
}

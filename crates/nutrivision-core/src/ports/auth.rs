//! Authentication and token lifecycle ports.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which credential a token represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claims decoded from a valid token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub kind: TokenKind,
    pub exp: i64,
}

impl TokenClaims {
    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_in: i64,
    pub refresh_expires_in: i64,
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a short-lived access token.
    fn generate_access_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Issue a long-lived refresh token.
    fn generate_refresh_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError>;

    /// Issue both tokens at once.
    fn generate_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.generate_access_token(user_id, email)?,
            refresh_token: self.generate_refresh_token(user_id, email)?,
            access_expires_in: self.access_expiration_seconds(),
            refresh_expires_in: self.refresh_expiration_seconds(),
        })
    }

    /// Validate and decode a token of the expected kind.
    fn validate_token(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError>;

    /// Access token lifetime in seconds.
    fn access_expiration_seconds(&self) -> i64;

    /// Refresh token lifetime in seconds.
    fn refresh_expiration_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Revocation list for tokens that were logged out before expiring.
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    /// Revoke `token` until `expires_at`. Tokens already past expiry are ignored.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;

    /// Whether `token` is currently revoked.
    async fn is_revoked(&self, token: &str) -> bool;

    /// Drop entries whose token has expired. Returns how many were removed.
    async fn purge_expired(&self) -> usize;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email/username or password")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token is invalid or blacklisted")]
    TokenRevoked,

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),

    #[error("Blacklist backend error: {0}")]
    Backend(String),
}

//! JWT token service implementation.
//!
//! Access and refresh tokens are signed with separate secrets and carry a
//! `kind` claim, so one can never stand in for the other.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nutrivision_core::ports::{AuthError, TokenClaims, TokenKind, TokenService};

const DEFAULT_ACCESS_SECRET: &str = "change-me-in-production";
const DEFAULT_REFRESH_SECRET: &str = "change-me-too-in-production";

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            access_secret: DEFAULT_ACCESS_SECRET.to_string(),
            refresh_secret: DEFAULT_REFRESH_SECRET.to_string(),
            access_ttl_secs: 60 * 60,
            refresh_ttl_secs: 7 * 24 * 60 * 60,
            issuer: "nutrivision-api".to_string(),
        }
    }
}

impl JwtConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let access_secret =
            std::env::var("JWT_SECRET").unwrap_or_else(|_| defaults.access_secret.clone());
        let refresh_secret = std::env::var("REFRESH_TOKEN_SECRET")
            .unwrap_or_else(|_| defaults.refresh_secret.clone());

        if access_secret == DEFAULT_ACCESS_SECRET || refresh_secret == DEFAULT_REFRESH_SECRET {
            let is_production = std::env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default JWT secrets in production! Set JWT_SECRET and REFRESH_TOKEN_SECRET."
                );
            } else {
                tracing::warn!(
                    "Using default JWT secrets. Set JWT_SECRET and REFRESH_TOKEN_SECRET for production use."
                );
            }
        }

        Self {
            access_secret,
            refresh_secret,
            access_ttl_secs: std::env::var("ACCESS_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.access_ttl_secs),
            refresh_ttl_secs: std::env::var("REFRESH_TOKEN_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.refresh_ttl_secs),
            issuer: std::env::var("JWT_ISSUER").unwrap_or(defaults.issuer),
        }
    }
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    email: String,
    kind: TokenKind,
    exp: i64,
    iat: i64,
    iss: String,
    jti: String, // keeps tokens issued in the same second distinct
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// JWT-based token service.
pub struct JwtTokenService {
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        Self {
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            config,
        }
    }

    pub fn from_env() -> Self {
        Self::new(JwtConfig::from_env())
    }

    fn keys(&self, kind: TokenKind) -> &KeyPair {
        match kind {
            TokenKind::Access => &self.access_keys,
            TokenKind::Refresh => &self.refresh_keys,
        }
    }

    fn ttl(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.config.access_ttl_secs,
            TokenKind::Refresh => self.config.refresh_ttl_secs,
        }
    }

    fn issue(&self, user_id: Uuid, email: &str, kind: TokenKind) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::seconds(self.ttl(kind));

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            kind,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.keys(kind).encoding)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl TokenService for JwtTokenService {
    fn generate_access_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue(user_id, email, TokenKind::Access)
    }

    fn generate_refresh_token(&self, user_id: Uuid, email: &str) -> Result<String, AuthError> {
        self.issue(user_id, email, TokenKind::Refresh)
    }

    fn validate_token(&self, token: &str, kind: TokenKind) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.keys(kind).decoding, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        if token_data.claims.kind != kind {
            return Err(AuthError::InvalidToken("Unexpected token kind".to_string()));
        }

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(TokenClaims {
            user_id,
            email: token_data.claims.email,
            kind,
            exp: token_data.claims.exp,
        })
    }

    fn access_expiration_seconds(&self) -> i64 {
        self.config.access_ttl_secs
    }

    fn refresh_expiration_seconds(&self) -> i64 {
        self.config.refresh_ttl_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            access_secret: "access-secret".to_string(),
            refresh_secret: "refresh-secret".to_string(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 7 * 24 * 3600,
            issuer: "test-issuer".to_string(),
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = JwtTokenService::new(test_config());
        let user_id = Uuid::new_v4();

        let token = service
            .generate_access_token(user_id, "alice@example.com")
            .unwrap();
        let claims = service.validate_token(&token, TokenKind::Access).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.kind, TokenKind::Access);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let service = JwtTokenService::new(test_config());
        let refresh = service
            .generate_refresh_token(Uuid::new_v4(), "alice@example.com")
            .unwrap();

        let result = service.validate_token(&refresh, TokenKind::Access);

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
        assert!(service.validate_token(&refresh, TokenKind::Refresh).is_ok());
    }

    #[test]
    fn test_kind_mismatch_with_shared_secret() {
        let service = JwtTokenService::new(JwtConfig {
            refresh_secret: "access-secret".to_string(),
            ..test_config()
        });
        let refresh = service
            .generate_refresh_token(Uuid::new_v4(), "alice@example.com")
            .unwrap();

        assert!(service.validate_token(&refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(JwtConfig {
            access_ttl_secs: -10,
            ..test_config()
        });
        let token = service
            .generate_access_token(Uuid::new_v4(), "alice@example.com")
            .unwrap();

        let result = service.validate_token(&token, TokenKind::Access);
        assert!(matches!(result, Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config());

        let result = service.validate_token("invalid-token", TokenKind::Access);
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(test_config());
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "other-issuer".to_string(),
            ..test_config()
        });

        let token = service1
            .generate_access_token(Uuid::new_v4(), "alice@example.com")
            .unwrap();

        assert!(service2.validate_token(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_pair_and_expirations() {
        let service = JwtTokenService::new(test_config());
        let pair = service
            .generate_pair(Uuid::new_v4(), "alice@example.com")
            .unwrap();

        assert_ne!(pair.access_token, pair.refresh_token);
        assert_eq!(pair.access_expires_in, 3600);
        assert_eq!(pair.refresh_expires_in, 604800);
    }
}

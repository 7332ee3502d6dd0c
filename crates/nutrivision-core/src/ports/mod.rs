//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod rate_limit;
mod repository;
mod upstream;

pub use auth::{
    AuthError, PasswordService, TokenBlacklist, TokenClaims, TokenKind, TokenPair, TokenService,
};
pub use cache::{Cache, CacheError};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, UserRepository};
pub use upstream::{ChatRequest, ImageUpload, LlmClient, RecognitionClient, UpstreamError};

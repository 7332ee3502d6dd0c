//! # NutriVision Infrastructure
//!
//! Concrete implementations of the ports defined in `nutrivision-core`:
//! persistence, token handling, caching, rate limiting and the upstream
//! service clients.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL user store via SeaORM
//! - `auth` - JWT + Argon2 authentication and the token blacklist
//! - `rate-limit` - Rate limiting via governor
//! - `upstream` - reqwest clients for the LLM and recognition services

pub mod cache;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

#[cfg(feature = "upstream")]
pub mod upstream;

pub use cache::InMemoryCache;
pub use database::InMemoryUserRepository;

#[cfg(feature = "postgres")]
pub use database::PostgresUserRepository;

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, CacheTokenBlacklist, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "upstream")]
pub use upstream::{HttpLlmClient, HttpRecognitionClient, UpstreamConfig};

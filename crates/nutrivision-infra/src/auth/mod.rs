//! Authentication implementations.

mod blacklist;
mod jwt;
mod password;

pub use blacklist::CacheTokenBlacklist;
pub use jwt::{JwtConfig, JwtTokenService};
pub use password::Argon2PasswordService;

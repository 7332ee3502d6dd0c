//! Application configuration loaded from environment variables.

use std::env;

use nutrivision_infra::database::DatabaseConfig;
use nutrivision_infra::{JwtConfig, RateLimitConfig, UpstreamConfig};

/// Largest accepted JSON body or image upload.
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub upstream: UpstreamConfig,
    pub login_rate_limit: RateLimitConfig,
    pub settings: Settings,
}

/// Behavior switches read by handlers at request time.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Enables `DELETE /api/users`. Off unless explicitly set.
    pub allow_bulk_delete: bool,
    /// Mark the refresh cookie `Secure`.
    pub secure_cookies: bool,
    /// Cron expression for the blacklist sweep.
    pub blacklist_purge_cron: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            allow_bulk_delete: false,
            secure_cookies: false,
            blacklist_purge_cron: "0 * * * * *".to_string(),
        }
    }
}

fn env_flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let is_production = env::var("RUST_ENV")
            .map(|v| v == "production" || v == "prod")
            .unwrap_or(false);
        let defaults = Settings::default();

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3003),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            upstream: UpstreamConfig::from_env(),
            login_rate_limit: RateLimitConfig::login_from_env(),
            settings: Settings {
                allow_bulk_delete: env_flag("ALLOW_BULK_DELETE", false),
                secure_cookies: env_flag("SECURE_COOKIES", is_production),
                blacklist_purge_cron: env::var("BLACKLIST_PURGE_CRON")
                    .unwrap_or(defaults.blacklist_purge_cron),
            },
        }
    }
}

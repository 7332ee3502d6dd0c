//! Application state - shared across all handlers and middleware.

use std::sync::Arc;

use nutrivision_core::ports::{
    Cache, LlmClient, PasswordService, RateLimiter, RecognitionClient, TokenBlacklist,
    TokenService, UserRepository,
};
use nutrivision_infra::database::{PostgresUserRepository, connect};
use nutrivision_infra::upstream::http_client;
use nutrivision_infra::{
    Argon2PasswordService, CacheTokenBlacklist, HttpLlmClient, HttpRecognitionClient,
    InMemoryCache, InMemoryRateLimiter, InMemoryUserRepository, JwtTokenService,
};

use crate::config::{AppConfig, Settings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub blacklist: Arc<dyn TokenBlacklist>,
    pub llm: Arc<dyn LlmClient>,
    pub recognition: Arc<dyn RecognitionClient>,
    pub login_limiter: Arc<dyn RateLimiter>,
    pub settings: Settings,
}

impl AppState {
    /// Build the application state with the configured implementations.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let users: Arc<dyn UserRepository> = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(conn) => Arc::new(PostgresUserRepository::new(conn)),
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                    Arc::new(InMemoryUserRepository::new())
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Arc::new(InMemoryUserRepository::new())
            }
        };

        // Process-local: revocations are lost on restart.
        let cache: Arc<dyn Cache> = Arc::new(InMemoryCache::new());

        let client = http_client(&config.upstream)
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        tracing::info!("Application state initialized");

        Ok(Self {
            users,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            blacklist: Arc::new(CacheTokenBlacklist::new(cache)),
            llm: Arc::new(HttpLlmClient::new(client.clone(), &config.upstream)),
            recognition: Arc::new(HttpRecognitionClient::new(client, &config.upstream)),
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_rate_limit.clone())),
            settings: config.settings.clone(),
        })
    }
}

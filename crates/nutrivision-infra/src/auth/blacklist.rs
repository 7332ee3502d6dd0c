//! Token revocation list on top of the [`Cache`] port.
//!
//! Each revoked token is stored under `revoked:<token>` with a TTL equal
//! to the token's remaining lifetime, so an entry never outlives the token.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nutrivision_core::ports::{AuthError, Cache, TokenBlacklist};

const KEY_PREFIX: &str = "revoked:";

/// Blacklist backed by any cache implementation.
pub struct CacheTokenBlacklist {
    cache: Arc<dyn Cache>,
}

impl CacheTokenBlacklist {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    fn key(token: &str) -> String {
        format!("{}{}", KEY_PREFIX, token)
    }
}

#[async_trait]
impl TokenBlacklist for CacheTokenBlacklist {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        let remaining = match (expires_at - Utc::now()).to_std() {
            Ok(remaining) if !remaining.is_zero() => remaining,
            _ => {
                tracing::debug!("Token already expired, not blacklisting");
                return Ok(());
            }
        };

        self.cache
            .set(&Self::key(token), "1", Some(remaining))
            .await
            .map_err(|e| AuthError::Backend(e.to_string()))?;

        tracing::debug!(ttl_secs = remaining.as_secs(), "Token blacklisted");
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> bool {
        self.cache.exists(&Self::key(token)).await
    }

    async fn purge_expired(&self) -> usize {
        self.cache.purge_expired().await
    }
}

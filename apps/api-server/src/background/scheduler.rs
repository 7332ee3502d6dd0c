//! Cron-driven maintenance using tokio-cron-scheduler.
//!
//! The token gate already sweeps the blacklist on every authenticated
//! request; this job keeps it bounded while the server is idle.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use nutrivision_core::ports::TokenBlacklist;

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
}

impl Scheduler {
    pub async fn new() -> Result<Self, JobSchedulerError> {
        Ok(Self {
            inner: JobScheduler::new().await?,
        })
    }

    /// Register a cron job. `schedule` uses the six-field form with seconds.
    pub async fn add_cron<F, Fut>(
        &self,
        schedule: &str,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    /// Periodically drop expired revocations.
    pub async fn add_blacklist_sweep(
        &self,
        schedule: &str,
        blacklist: Arc<dyn TokenBlacklist>,
    ) -> Result<uuid::Uuid, JobSchedulerError> {
        self.add_cron(schedule, move || {
            let blacklist = blacklist.clone();
            async move {
                let purged = blacklist.purge_expired().await;
                if purged > 0 {
                    tracing::info!(purged, "Blacklist sweep removed expired tokens");
                }
            }
        })
        .await
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};
    use nutrivision_infra::{CacheTokenBlacklist, InMemoryCache};

    #[tokio::test]
    async fn test_rejects_malformed_schedule() {
        let scheduler = Scheduler::new().await.unwrap();
        let blacklist: Arc<dyn TokenBlacklist> =
            Arc::new(CacheTokenBlacklist::new(Arc::new(InMemoryCache::new())));

        assert!(
            scheduler
                .add_blacklist_sweep("not a cron line", blacklist)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_registers_sweep() {
        let scheduler = Scheduler::new().await.unwrap();
        let blacklist: Arc<dyn TokenBlacklist> =
            Arc::new(CacheTokenBlacklist::new(Arc::new(InMemoryCache::new())));
        blacklist
            .revoke("tok", Utc::now() + TimeDelta::hours(1))
            .await
            .unwrap();

        assert!(
            scheduler
                .add_blacklist_sweep("0 * * * * *", blacklist.clone())
                .await
                .is_ok()
        );
        assert!(blacklist.is_revoked("tok").await);
    }
}

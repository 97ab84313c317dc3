//! Periodic background refresh of every tracked service.

use super::cache::StatusCache;
use super::config::SchedulerConfig;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Drives [`StatusCache::force_refresh_all`] on a fixed interval.
pub struct Scheduler {
    cache: StatusCache,
    interval: Duration,
}

/// Shortest refresh period; a zero interval is raised to this.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

impl Scheduler {
    pub fn new(cache: StatusCache, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            tracing::warn!(
                min_seconds = MIN_INTERVAL.as_secs(),
                "Zero scheduler interval, using minimum"
            );
            MIN_INTERVAL
        } else {
            interval
        };
        Self { cache, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn from_config(cache: StatusCache, config: &SchedulerConfig) -> Self {
        Self::new(cache, Duration::from_secs(config.interval_seconds))
    }

    /// Populate the cache, then keep refreshing it in the background.
    ///
    /// The first full refresh completes before this returns, so readers never
    /// observe an empty cache. The returned handle resolves once `cancel_token`
    /// fires.
    pub async fn start(self, cancel_token: CancellationToken) -> JoinHandle<()> {
        self.run_cycle().await;

        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            tracing::info!(
                interval_seconds = self.interval.as_secs(),
                services = self.cache.tracked_services().len(),
                "Status scheduler started"
            );

            loop {
                tokio::select! {
                    _ = cancel_token.cancelled() => {
                        tracing::info!("Status scheduler shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        self.run_cycle().await;
                    }
                }
            }
        })
    }

    async fn run_cycle(&self) {
        let cycle_id = uuid::Uuid::new_v4();
        let started = Instant::now();
        let statuses = self.cache.force_refresh_all().await;
        let unknown = statuses
            .iter()
            .filter(|s| s.state() == super::StatusState::Unknown)
            .count();
        tracing::debug!(
            cycle_id = %cycle_id,
            services_refreshed = statuses.len(),
            unknown,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Status refresh cycle completed"
        );
    }
}

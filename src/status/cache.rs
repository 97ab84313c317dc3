//! TTL-bounded status cache with single-flight refresh and fallback chaining.
//!
//! Per service the entry moves `Empty -> Fresh -> Stale -> Refreshing -> Fresh`.
//! A refresh runs as its own task: callers that find the entry stale join the
//! refresh already in flight instead of starting another, and a caller giving
//! up does not cancel it.

use super::config::{SeverityThresholds, TrackedService};
use super::error::StatusError;
use super::fallback::FallbackClassifier;
use super::source::StatusSource;
use super::types::ServiceStatus;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

type RefreshFuture = Shared<BoxFuture<'static, Arc<ServiceStatus>>>;

/// The refresh currently running for one service.
struct InFlight {
    id: u64,
    future: RefreshFuture,
}

/// Cache entry of one tracked service.
struct Slot {
    display_name: String,
    value: Option<Arc<ServiceStatus>>,
    expires_at: Option<Instant>,
    in_flight: Option<InFlight>,
}

impl Slot {
    fn fresh_value(&self, now: Instant) -> Option<Arc<ServiceStatus>> {
        match (&self.value, self.expires_at) {
            (Some(value), Some(expires_at)) if now < expires_at => Some(Arc::clone(value)),
            _ => None,
        }
    }
}

struct Inner {
    services: Vec<TrackedService>,
    slots: DashMap<String, Slot>,
    source: Arc<dyn StatusSource>,
    fallback: Arc<dyn FallbackClassifier>,
    ttl: Duration,
    thresholds: SeverityThresholds,
    next_refresh_id: AtomicU64,
}

/// Status cache and primary-to-fallback orchestrator.
///
/// Cheap to clone; clones share the same cache.
#[derive(Clone)]
pub struct StatusCache {
    inner: Arc<Inner>,
}

impl StatusCache {
    /// Create a cache over a fixed set of services.
    ///
    /// Services are looked up by key; a repeated key keeps its first entry.
    pub fn new(
        services: Vec<TrackedService>,
        source: Arc<dyn StatusSource>,
        fallback: Arc<dyn FallbackClassifier>,
        ttl: Duration,
    ) -> Self {
        let slots = DashMap::new();
        let mut unique = Vec::with_capacity(services.len());
        for service in services {
            if slots.contains_key(&service.key) {
                continue;
            }
            slots.insert(
                service.key.clone(),
                Slot {
                    display_name: service.display_name.clone(),
                    value: None,
                    expires_at: None,
                    in_flight: None,
                },
            );
            unique.push(service);
        }

        Self {
            inner: Arc::new(Inner {
                services: unique,
                slots,
                source,
                fallback,
                ttl,
                thresholds: SeverityThresholds::default(),
                next_refresh_id: AtomicU64::new(1),
            }),
        }
    }

    /// Replace the severity thresholds. Must be called before the cache is shared.
    pub fn with_thresholds(mut self, thresholds: SeverityThresholds) -> Self {
        match Arc::get_mut(&mut self.inner) {
            Some(inner) => inner.thresholds = thresholds,
            None => tracing::warn!("Severity thresholds ignored: status cache already shared"),
        }
        self
    }

    pub fn tracked_services(&self) -> &[TrackedService] {
        &self.inner.services
    }

    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Current status of a tracked service.
    ///
    /// Served from cache while fresh. Otherwise joins or starts a refresh and
    /// waits for it; an unreachable source yields an `Unknown` status, not an
    /// error.
    pub async fn get_status(&self, service_key: &str) -> Result<Arc<ServiceStatus>, StatusError> {
        let future = {
            let mut slot = self
                .inner
                .slots
                .get_mut(service_key)
                .ok_or_else(|| StatusError::UntrackedService(service_key.to_string()))?;

            if let Some(value) = slot.fresh_value(Instant::now()) {
                return Ok(value);
            }
            self.join_or_start(service_key, &mut slot)
        };
        Ok(future.await)
    }

    /// Refresh every tracked service regardless of freshness.
    ///
    /// A service that is already refreshing is joined, not fetched twice.
    pub async fn force_refresh_all(&self) -> Vec<Arc<ServiceStatus>> {
        let futures: Vec<RefreshFuture> = self
            .inner
            .services
            .iter()
            .filter_map(|service| {
                let mut slot = self.inner.slots.get_mut(&service.key)?;
                Some(self.join_or_start(&service.key, &mut slot))
            })
            .collect();
        futures::future::join_all(futures).await
    }

    /// Last cached value of a service, fresh or not, without I/O.
    pub fn cached(&self, service_key: &str) -> Option<Arc<ServiceStatus>> {
        self.inner
            .slots
            .get(service_key)
            .and_then(|slot| slot.value.clone())
    }

    /// Cached status of every tracked service, in registry order.
    ///
    /// Services never refreshed appear as `Unknown` placeholders.
    pub fn snapshot(&self) -> Vec<Arc<ServiceStatus>> {
        self.inner
            .services
            .iter()
            .map(|service| {
                self.cached(&service.key).unwrap_or_else(|| {
                    Arc::new(ServiceStatus::unknown(&service.key, &service.display_name))
                })
            })
            .collect()
    }

    /// Whether a refresh is currently running for a service.
    pub fn is_refreshing(&self, service_key: &str) -> bool {
        self.inner
            .slots
            .get(service_key)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    /// Join the refresh in flight for `slot`, or start one.
    ///
    /// Runs with the slot locked, so the spawned task cannot commit before the
    /// in-flight marker is recorded.
    fn join_or_start(&self, service_key: &str, slot: &mut Slot) -> RefreshFuture {
        if let Some(in_flight) = &slot.in_flight {
            return in_flight.future.clone();
        }

        let id = self.inner.next_refresh_id.fetch_add(1, Ordering::Relaxed);
        let key = service_key.to_string();
        let display_name = slot.display_name.clone();

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn({
            let key = key.clone();
            let display_name = display_name.clone();
            async move {
                let guard = InFlightGuard {
                    inner: Arc::clone(&inner),
                    key: key.clone(),
                    id,
                };
                let status = inner.refresh(&key, &display_name).await;
                let committed = inner.commit(&key, id, status);
                drop(guard);
                committed
            }
        });

        let future = async move {
            match task.await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!(service = %key, error = %e, "Status refresh task failed");
                    Arc::new(ServiceStatus::unknown(&key, &display_name))
                }
            }
        }
        .boxed()
        .shared();

        slot.in_flight = Some(InFlight {
            id,
            future: future.clone(),
        });
        future
    }
}

impl Inner {
    /// Primary source, then the fallback when the primary is inconclusive.
    async fn refresh(&self, service_key: &str, display_name: &str) -> ServiceStatus {
        let started = Instant::now();
        let primary = self.source.fetch_status(service_key).await;
        metrics::histogram!("outpost_status_source_latency_seconds",
            "service" => service_key.to_string()
        )
        .record(started.elapsed().as_secs_f64());

        let (result, label) = if primary.is_unknown() {
            metrics::counter!("outpost_status_fallback_total",
                "service" => service_key.to_string()
            )
            .increment(1);

            let fallback = self
                .fallback
                .classify(service_key, &cache_hint_key(service_key))
                .await;
            if fallback.is_unknown() {
                (primary, self.source.label())
            } else {
                (fallback, self.fallback.label())
            }
        } else {
            (primary, self.source.label())
        };

        metrics::counter!("outpost_status_refresh_total",
            "service" => service_key.to_string(),
            "source" => label.to_string()
        )
        .increment(1);

        ServiceStatus::from_result(service_key, display_name, &result, label, &self.thresholds)
    }

    /// Store a refreshed status and release the in-flight marker.
    fn commit(&self, service_key: &str, id: u64, status: ServiceStatus) -> Arc<ServiceStatus> {
        let status = Arc::new(status);
        if let Some(mut slot) = self.slots.get_mut(service_key) {
            let previous = slot.value.as_ref().map(|v| v.state());
            if previous != Some(status.state()) {
                tracing::info!(
                    service = service_key,
                    old_state = ?previous,
                    new_state = %status.state(),
                    source = status.source_label(),
                    "Service status changed"
                );
            }
            slot.value = Some(Arc::clone(&status));
            slot.expires_at = Some(Instant::now() + self.ttl);
            if slot.in_flight.as_ref().is_some_and(|f| f.id == id) {
                slot.in_flight = None;
            }
        }
        status
    }

    fn release(&self, service_key: &str, id: u64) {
        if let Some(mut slot) = self.slots.get_mut(service_key) {
            if slot.in_flight.as_ref().is_some_and(|f| f.id == id) {
                slot.in_flight = None;
            }
        }
    }
}

/// Releases the in-flight marker if the refresh task unwinds.
struct InFlightGuard {
    inner: Arc<Inner>,
    key: String,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.inner.release(&self.key, self.id);
    }
}

/// Cache hint sent to the fallback provider for a service.
pub fn cache_hint_key(service_key: &str) -> String {
    format!("outpost-status:{service_key}")
}

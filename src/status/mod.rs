//! External service status collection.
//!
//! A [`StatusCache`] serves per-service outage status from memory and refreshes
//! expired entries through the primary [`StatusSource`], falling back to a
//! [`FallbackClassifier`] when the primary is inconclusive. A [`Scheduler`]
//! keeps the cache warm independently of read traffic.

mod cache;
mod config;
mod error;
mod fallback;
mod scheduler;
mod source;
mod types;


pub use cache::{cache_hint_key, StatusCache};
pub use config::*;
pub use error::*;
pub use fallback::{AiFallbackClassifier, DisabledFallback, FallbackClassifier};
pub use scheduler::Scheduler;
pub use source::{
    classify_indicator, extract_indicator, html_to_text, report_count, StatusSource,
    StatusSourceClient,
};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

/// Build a cache wired to the HTTP primary source and the configured fallback.
pub fn build_cache(
    services: Vec<TrackedService>,
    status: &StatusConfig,
    fallback: &FallbackConfig,
) -> StatusCache {
    let source: Arc<dyn StatusSource> = Arc::new(StatusSourceClient::new(status.clone()));
    let classifier: Arc<dyn FallbackClassifier> = if fallback.enabled {
        Arc::new(AiFallbackClassifier::new(fallback.clone()))
    } else {
        Arc::new(DisabledFallback)
    };
    StatusCache::new(
        services,
        source,
        classifier,
        Duration::from_secs(status.ttl_seconds),
    )
    .with_thresholds(status.thresholds)
}

//! Outpost - external status and device telemetry aggregation
//!
//! Two independent pipelines:
//!
//! - [`status`]: a TTL-bounded cache of third-party service outage status,
//!   refreshed on demand and on a schedule, with a fallback classifier for
//!   when the primary source is blocked or unreadable.
//! - [`gateway`] and [`telemetry`]: reads and commands against TR-069 managed
//!   devices, with the raw parameter tree normalized into typed views.

pub mod cli;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod status;
pub mod telemetry;

//! Configuration module for Outpost
//!
//! Layered configuration loading from a TOML file, environment variables,
//! and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`OUTPOST_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use outpost::config::OutpostConfig;
//!
//! let toml = r#"
//! [status]
//! ttl_seconds = 120
//!
//! [[services]]
//! key = "vivo"
//! display_name = "Vivo"
//! "#;
//! let config: OutpostConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.status.ttl_seconds, 120);
//! assert_eq!(config.services[0].key, "vivo");
//! ```

pub mod error;
pub mod logging;

pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

pub use crate::gateway::AcsConfig;
pub use crate::status::{FallbackConfig, SchedulerConfig, StatusConfig, TrackedService};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Unified configuration for the status cache, the fallback classifier,
/// the scheduler, the device-management client and logging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutpostConfig {
    /// Primary status source and cache TTL
    pub status: StatusConfig,
    /// Model-based fallback classifier
    pub fallback: FallbackConfig,
    /// Background refresh
    pub scheduler: SchedulerConfig,
    /// Device-management server
    pub acs: AcsConfig,
    /// Tracked services, in display order
    pub services: Vec<TrackedService>,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl OutpostConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse {
                    path: p.to_path_buf(),
                    message: e.to_string(),
                })
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored and the previous value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("OUTPOST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("OUTPOST_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        if let Ok(ttl) = std::env::var("OUTPOST_STATUS_TTL") {
            if let Ok(secs) = ttl.trim().parse() {
                self.status.ttl_seconds = secs;
            }
        }
        if let Ok(interval) = std::env::var("OUTPOST_SCHEDULER_INTERVAL") {
            if let Ok(secs) = interval.trim().parse() {
                self.scheduler.interval_seconds = secs;
            }
        }

        if let Ok(url) = std::env::var("OUTPOST_ACS_URL") {
            if !url.trim().is_empty() {
                self.acs.base_url = url.trim().to_string();
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.status.ttl_seconds == 0 {
            return Err(ConfigError::invalid(
                "status.ttl_seconds",
                "TTL must be non-zero",
            ));
        }
        if !self.status.url_template.contains("{service}") {
            return Err(ConfigError::invalid(
                "status.url_template",
                "template must contain the {service} placeholder",
            ));
        }
        if self.scheduler.interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "scheduler.interval_seconds",
                "interval must be non-zero",
            ));
        }
        if self.acs.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("acs.base_url", "URL cannot be empty"));
        }

        let mut seen = HashSet::new();
        for (i, service) in self.services.iter().enumerate() {
            if service.key.trim().is_empty() {
                return Err(ConfigError::invalid(
                    format!("services[{}].key", i),
                    "key cannot be empty",
                ));
            }
            if !seen.insert(service.key.as_str()) {
                return Err(ConfigError::invalid(
                    format!("services[{}].key", i),
                    format!("duplicate service key '{}'", service.key),
                ));
            }
        }

        Ok(())
    }
}

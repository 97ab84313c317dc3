//! Configuration for status collection and refresh scheduling.

use serde::{Deserialize, Serialize};

/// Browser identity sent to the primary source, which rejects obvious bots.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// A service whose status is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedService {
    /// Key used in source URLs and lookups (e.g. "vivo")
    pub key: String,
    /// Human-readable name (e.g. "Vivo")
    pub display_name: String,
}

impl TrackedService {
    pub fn new(key: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
        }
    }
}

/// Report counts at which a degraded service escalates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub major_reports: u32,
    pub critical_reports: u32,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            major_reports: 100,
            critical_reports: 500,
        }
    }
}

/// Primary status source and cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Seconds a cached status stays fresh
    pub ttl_seconds: u64,
    /// Page URL per service; `{service}` is replaced by the service key
    pub url_template: String,
    /// Label recorded on statuses produced by this source
    pub source_label: String,
    pub user_agent: String,
    pub timeout_seconds: u64,
    /// Phrases identifying the sentence that carries the verdict
    pub indicator_markers: Vec<String>,
    #[serde(flatten)]
    pub thresholds: SeverityThresholds,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            url_template: "https://downdetector.com.br/fora-do-ar/{service}/".to_string(),
            source_label: "downdetector".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: 10,
            indicator_markers: vec![
                "relatórios de usuários".to_string(),
                "relatos de usuários".to_string(),
                "user reports".to_string(),
            ],
            thresholds: SeverityThresholds::default(),
        }
    }
}

/// Secondary, model-based classifier settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    pub enabled: bool,
    /// OpenAI-compatible API root
    pub base_url: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    pub timeout_seconds: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            timeout_seconds: 15,
        }
    }
}

/// Background refresh settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Seconds between full refresh cycles
    pub interval_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 300,
        }
    }
}

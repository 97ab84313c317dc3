//! Logging configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// How `init_tracing` renders events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-line output
    #[default]
    #[serde(alias = "text")]
    Pretty,
    /// One JSON object per event, for log shippers
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the TOML spellings plus `text`, ignoring case and padding, so the
/// `OUTPOST_LOG_FORMAT` override reads the same values as the file.
impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [LogFormat::Pretty, LogFormat::Json]
            .into_iter()
            .find(|format| wanted.eq_ignore_ascii_case(format.as_str()))
            .or_else(|| wanted.eq_ignore_ascii_case("text").then_some(LogFormat::Pretty))
            .ok_or_else(|| {
                ConfigError::invalid(
                    "logging.format",
                    format!("expected 'pretty' or 'json', got '{}'", wanted),
                )
            })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Per-module levels, keyed by module under `outpost::` (e.g. {"status": "debug"})
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_levels: Option<HashMap<String, String>>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            component_levels: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Pretty);
        assert!(config.component_levels.is_none());
    }

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str(" Pretty ").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("TEXT").unwrap(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_format_invalid_names_field() {
        let err = LogFormat::from_str("xml").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "logging.format"
        ));
        assert!(err.to_string().contains("'xml'"));
    }

    #[test]
    fn test_log_format_display_matches_toml() {
        for format in [LogFormat::Pretty, LogFormat::Json] {
            let parsed: LoggingConfig =
                toml::from_str(&format!("format = \"{}\"", format)).unwrap();
            assert_eq!(parsed.format, format);
        }
        let aliased: LoggingConfig = toml::from_str(r#"format = "text""#).unwrap();
        assert_eq!(aliased.format, LogFormat::Pretty);
    }

    #[test]
    fn test_component_levels_from_toml() {
        let config: LoggingConfig = toml::from_str(
            r#"
            format = "json"
            [component_levels]
            status = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(
            config.component_levels.unwrap().get("status").map(String::as_str),
            Some("debug")
        );
    }
}

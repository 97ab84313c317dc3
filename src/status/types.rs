//! Status values shared by the sources, the cache and its readers.

use super::config::SeverityThresholds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict of a single status source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Operational,
    Degraded,
    /// Source unreachable, blocked, or inconclusive
    Unknown,
}

/// What a source observed for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawStatusResult {
    pub state: Classification,
    pub raw_indicator_text: String,
    /// User report count backing the verdict, 0 when the source has none
    pub report_signal: u32,
}

impl RawStatusResult {
    pub fn new(state: Classification, raw_indicator_text: impl Into<String>) -> Self {
        Self {
            state,
            raw_indicator_text: raw_indicator_text.into(),
            report_signal: 0,
        }
    }

    /// An inconclusive result; `reason` is kept for diagnostics.
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::new(Classification::Unknown, reason)
    }

    pub fn with_reports(mut self, report_signal: u32) -> Self {
        self.report_signal = report_signal;
        self
    }

    pub fn is_unknown(&self) -> bool {
        self.state == Classification::Unknown
    }
}

/// Published state of a tracked service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusState {
    Operational,
    Minor,
    Major,
    Critical,
    Unknown,
}

impl StatusState {
    /// Derive the published state from a classification and its report count.
    pub fn derive(
        classification: Classification,
        report_signal: u32,
        thresholds: &SeverityThresholds,
    ) -> Self {
        match classification {
            Classification::Operational => StatusState::Operational,
            Classification::Unknown => StatusState::Unknown,
            Classification::Degraded if report_signal >= thresholds.critical_reports => {
                StatusState::Critical
            }
            Classification::Degraded if report_signal >= thresholds.major_reports => {
                StatusState::Major
            }
            Classification::Degraded => StatusState::Minor,
        }
    }

    /// Any of the outage severities.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self,
            StatusState::Minor | StatusState::Major | StatusState::Critical
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusState::Operational => "operational",
            StatusState::Minor => "minor",
            StatusState::Major => "major",
            StatusState::Critical => "critical",
            StatusState::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable snapshot of one service's status.
///
/// The state is always derived from a source result; there is no setter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    service_key: String,
    display_name: String,
    state: StatusState,
    report_signal: u32,
    source_label: String,
    indicator_text: String,
    observed_at: DateTime<Utc>,
}

/// Source label of a status nobody has been able to produce yet.
pub const NO_SOURCE: &str = "none";

impl ServiceStatus {
    pub fn from_result(
        service_key: &str,
        display_name: &str,
        result: &RawStatusResult,
        source_label: &str,
        thresholds: &SeverityThresholds,
    ) -> Self {
        Self {
            service_key: service_key.to_string(),
            display_name: display_name.to_string(),
            state: StatusState::derive(result.state, result.report_signal, thresholds),
            report_signal: result.report_signal,
            source_label: source_label.to_string(),
            indicator_text: result.raw_indicator_text.clone(),
            observed_at: Utc::now(),
        }
    }

    /// Well-formed placeholder for a service with no usable observation.
    pub fn unknown(service_key: &str, display_name: &str) -> Self {
        Self {
            service_key: service_key.to_string(),
            display_name: display_name.to_string(),
            state: StatusState::Unknown,
            report_signal: 0,
            source_label: NO_SOURCE.to_string(),
            indicator_text: String::new(),
            observed_at: Utc::now(),
        }
    }

    pub fn service_key(&self) -> &str {
        &self.service_key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn state(&self) -> StatusState {
        self.state
    }

    pub fn report_signal(&self) -> u32 {
        self.report_signal
    }

    pub fn source_label(&self) -> &str {
        &self.source_label
    }

    pub fn indicator_text(&self) -> &str {
        &self.indicator_text
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

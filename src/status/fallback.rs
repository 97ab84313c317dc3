//! Fallback status classification through an OpenAI-compatible chat API.
//!
//! Only consulted when the primary source returned `Unknown`.

use super::config::FallbackConfig;
use super::error::ClassificationError;
use super::types::{Classification, RawStatusResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const SYSTEM_PROMPT: &str = "You report the current operational status of consumer internet, \
telecom and online services in Brazil. Answer only with a JSON object of the form \
{\"status\": \"operational\" | \"degraded\" | \"unknown\", \"reports\": <integer estimate of \
recent user outage reports, 0 if none>, \"summary\": <one short sentence>}. \
Use \"unknown\" when you are not confident.";

/// A secondary source of per-service verdicts.
#[async_trait]
pub trait FallbackClassifier: Send + Sync + 'static {
    fn label(&self) -> &str;

    /// Classify a service. `cache_hint` lets the provider reuse work across
    /// identical requests. Never fails; unavailability is `Unknown`.
    async fn classify(&self, service_key: &str, cache_hint: &str) -> RawStatusResult;
}

/// Fallback that never has an opinion. Used when classification is disabled.
pub struct DisabledFallback;

#[async_trait]
impl FallbackClassifier for DisabledFallback {
    fn label(&self) -> &str {
        "disabled"
    }

    async fn classify(&self, _service_key: &str, _cache_hint: &str) -> RawStatusResult {
        RawStatusResult::unknown(ClassificationError::Disabled.to_string())
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct Verdict {
    status: String,
    #[serde(default)]
    reports: Option<u32>,
    #[serde(default)]
    summary: Option<String>,
}

/// Model-backed classifier.
pub struct AiFallbackClassifier {
    client: Client,
    config: FallbackConfig,
    api_key: Option<String>,
    label: String,
}

impl AiFallbackClassifier {
    /// Create a classifier reading its API key from the configured environment variable.
    pub fn new(config: FallbackConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to build HTTP client");
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Self::with_client(config, client, api_key)
    }

    /// Create a classifier with an explicit client and key (for testing).
    pub fn with_client(config: FallbackConfig, client: Client, api_key: Option<String>) -> Self {
        let label = format!("ai:{}", config.model);
        Self {
            client,
            config,
            api_key,
            label,
        }
    }

    async fn try_classify(
        &self,
        service_key: &str,
        cache_hint: &str,
    ) -> Result<RawStatusResult, ClassificationError> {
        if !self.config.enabled {
            return Err(ClassificationError::Disabled);
        }
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| ClassificationError::MissingCredential(self.config.api_key_env.clone()))?;

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "temperature": 0,
            "response_format": {"type": "json_object"},
            "prompt_cache_key": cache_hint,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": format!("Service: {service_key}")}
            ]
        });

        let response = self
            .client
            .post(&url)
            .header("authorization", format!("Bearer {api_key}"))
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassificationError::Timeout(self.config.timeout_seconds)
                } else {
                    ClassificationError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ClassificationError::Upstream { status, message });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            ClassificationError::InvalidResponse(format!("failed to parse completion: {e}"))
        })?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ClassificationError::InvalidResponse("empty completion".to_string()))?;

        parse_verdict(&content)
    }
}

/// Map the model's JSON answer onto the three-state contract.
fn parse_verdict(content: &str) -> Result<RawStatusResult, ClassificationError> {
    let verdict: Verdict = serde_json::from_str(content.trim()).map_err(|e| {
        ClassificationError::InvalidResponse(format!("answer is not a verdict object: {e}"))
    })?;
    let state = match verdict.status.trim().to_lowercase().as_str() {
        "operational" => Classification::Operational,
        "degraded" => Classification::Degraded,
        "unknown" => Classification::Unknown,
        other => {
            return Err(ClassificationError::InvalidResponse(format!(
                "unexpected status '{other}'"
            )))
        }
    };
    Ok(
        RawStatusResult::new(state, verdict.summary.unwrap_or_default())
            .with_reports(verdict.reports.unwrap_or(0)),
    )
}

#[async_trait]
impl FallbackClassifier for AiFallbackClassifier {
    fn label(&self) -> &str {
        &self.label
    }

    async fn classify(&self, service_key: &str, cache_hint: &str) -> RawStatusResult {
        match self.try_classify(service_key, cache_hint).await {
            Ok(result) => {
                tracing::debug!(
                    service = service_key,
                    state = ?result.state,
                    "Fallback classifier answered"
                );
                result
            }
            Err(error) => {
                tracing::warn!(
                    service = service_key,
                    error = %error,
                    "Fallback classification unavailable"
                );
                RawStatusResult::unknown(error.to_string())
            }
        }
    }
}

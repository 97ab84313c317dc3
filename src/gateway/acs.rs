//! HTTP client for an ACS northbound interface (GenieACS-style).
//!
//! - Read: `GET /devices?query={"_id": "<device>"}` returns the full parameter tree
//! - Write: `POST /devices/<device>/tasks?connection_request` submits a task;
//!   `200` means the device ran it during the request, `202` means it was queued

use super::config::AcsConfig;
use super::error::RemoteManagementError;
use super::types::{Accepted, DeviceIdentity, DeviceTask};
use super::DeviceManagement;
use crate::telemetry::ParameterTree;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Device-management client over HTTP.
pub struct AcsClient {
    base_url: Url,
    client: Client,
    username: Option<String>,
    password: Option<String>,
    timeout: Duration,
    connection_request: bool,
    task_timeout_ms: u64,
}

impl AcsClient {
    /// Create a client with its own connection pool.
    pub fn new(config: &AcsConfig) -> Result<Self, RemoteManagementError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RemoteManagementError::Configuration(e.to_string()))?;
        Self::with_client(config, client)
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(config: &AcsConfig, client: Client) -> Result<Self, RemoteManagementError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            RemoteManagementError::Configuration(format!("invalid ACS URL {}: {e}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(RemoteManagementError::Configuration(format!(
                "ACS URL cannot be a base: {}",
                config.base_url
            )));
        }
        let password = config
            .password_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());

        Ok(Self {
            base_url,
            client,
            username: config.username.clone(),
            password,
            timeout: Duration::from_secs(config.timeout_seconds),
            connection_request: config.connection_request,
            task_timeout_ms: config.task_timeout_ms,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.username {
            Some(user) => builder.basic_auth(user, self.password.as_deref()),
            None => builder,
        }
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        device: &DeviceIdentity,
    ) -> Result<reqwest::Response, RemoteManagementError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(RemoteManagementError::Unauthorized(status.as_u16()))
            }
            StatusCode::NOT_FOUND => Err(RemoteManagementError::UnknownDevice(device.to_string())),
            _ => {
                let message = response.text().await.unwrap_or_default();
                Err(RemoteManagementError::Upstream {
                    status: status.as_u16(),
                    message: if message.is_empty() {
                        status.to_string()
                    } else {
                        message
                    },
                })
            }
        }
    }
}

#[async_trait]
impl DeviceManagement for AcsClient {
    async fn fetch_tree(
        &self,
        device: &DeviceIdentity,
    ) -> Result<ParameterTree, RemoteManagementError> {
        let url = self.url(&["devices"]);
        let query = serde_json::json!({ "_id": device.as_str() }).to_string();
        debug!(device = %device, "fetching parameter tree");

        let response = self
            .authorize(self.client.get(url).query(&[("query", query)]))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RemoteManagementError::from_reqwest(e, self.timeout_ms()))?;
        let response = self.check_status(response, device).await?;

        let documents: Vec<Value> = response.json().await.map_err(|e| {
            RemoteManagementError::InvalidResponse(format!("failed to parse device list: {e}"))
        })?;

        documents
            .into_iter()
            .next()
            .map(ParameterTree::new)
            .ok_or_else(|| RemoteManagementError::UnknownDevice(device.to_string()))
    }

    async fn submit_task(
        &self,
        device: &DeviceIdentity,
        task: DeviceTask,
    ) -> Result<Accepted, RemoteManagementError> {
        let mut url = self.url(&["devices", device.as_str(), "tasks"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("timeout", &self.task_timeout_ms.to_string());
            if self.connection_request {
                query.append_key_only("connection_request");
            }
        }
        debug!(device = %device, task = task.name(), "submitting task");

        let response = self
            .authorize(self.client.post(url).json(&task.body()))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RemoteManagementError::from_reqwest(e, self.timeout_ms()))?;
        let response = self.check_status(response, device).await?;
        let queued = response.status() == StatusCode::ACCEPTED;

        // The task document is informational; an empty or odd body still means accepted.
        let task_id = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body.get("_id").and_then(Value::as_str).map(str::to_string));

        Ok(Accepted {
            device: device.clone(),
            task: task.name().to_string(),
            queued,
            task_id,
        })
    }
}

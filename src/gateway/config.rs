//! Configuration for the device-management client.

use serde::{Deserialize, Serialize};

/// Connection settings for the auto-configuration server's northbound API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcsConfig {
    /// Base URL of the northbound interface
    pub base_url: String,
    /// Basic-auth user, if the server requires one
    pub username: Option<String>,
    /// Environment variable holding the basic-auth password
    pub password_env: Option<String>,
    /// Timeout for each request
    pub timeout_seconds: u64,
    /// Ask the server to wake the device immediately when submitting tasks
    pub connection_request: bool,
    /// How long the server may wait for the device before queueing a task
    pub task_timeout_ms: u64,
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7557".to_string(),
            username: None,
            password_env: Some("OUTPOST_ACS_PASSWORD".to_string()),
            timeout_seconds: 10,
            connection_request: true,
            task_timeout_ms: 3000,
        }
    }
}

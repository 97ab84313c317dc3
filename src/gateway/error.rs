//! Error types for remote device management.

use thiserror::Error;

/// Failures reported by the device-management boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteManagementError {
    /// Network connectivity error (DNS, connection refused, etc.)
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded its deadline
    #[error("request timeout after {0}ms")]
    Timeout(u64),

    /// Credentials rejected by the management server
    #[error("authentication rejected with HTTP {0}")]
    Unauthorized(u16),

    /// Management server answered with an error status
    #[error("management server error {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// No device registered under this identity
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    /// Client could not be set up from configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl RemoteManagementError {
    /// Map a transport error, distinguishing timeouts.
    pub fn from_reqwest(e: reqwest::Error, timeout_ms: u64) -> Self {
        if e.is_timeout() {
            Self::Timeout(timeout_ms)
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Errors surfaced by [`RemoteCommandGateway`](super::RemoteCommandGateway).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The MAC is not associated with any access point of the device
    #[error("no wireless client {mac} on device {device}")]
    DeviceNotFound { device: String, mac: String },

    #[error(transparent)]
    RemoteManagement(#[from] RemoteManagementError),
}

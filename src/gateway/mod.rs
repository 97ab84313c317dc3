//! Remote command gateway for managed CPE devices.
//!
//! Read paths fetch the device's parameter tree and normalize it through
//! [`crate::telemetry`]. Write paths submit named tasks to the
//! device-management server and return an [`Accepted`] acknowledgement; there
//! is no "applied" confirmation in this API.
//!
//! The gateway holds no mutable state and never retries. Retry policy belongs
//! to the caller.

mod acs;
mod config;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use acs::AcsClient;
pub use config::AcsConfig;
pub use error::*;
pub use types::*;

use crate::telemetry::{self, paths, ConnectedDevice, DeviceInfo, ParameterTree};
use async_trait::async_trait;
use std::sync::Arc;

/// Object refreshed by [`RemoteCommandGateway::refresh`].
pub const REFRESH_ROOT: &str = "InternetGatewayDevice";

/// The device-management boundary.
#[async_trait]
pub trait DeviceManagement: Send + Sync + 'static {
    /// Fetch the full parameter tree of a device.
    async fn fetch_tree(
        &self,
        device: &DeviceIdentity,
    ) -> Result<ParameterTree, RemoteManagementError>;

    /// Submit a task for a device and return once the server accepted it.
    async fn submit_task(
        &self,
        device: &DeviceIdentity,
        task: DeviceTask,
    ) -> Result<Accepted, RemoteManagementError>;
}

/// Issues reads and commands against managed devices.
#[derive(Clone)]
pub struct RemoteCommandGateway {
    backend: Arc<dyn DeviceManagement>,
}

impl RemoteCommandGateway {
    pub fn new(backend: Arc<dyn DeviceManagement>) -> Self {
        Self { backend }
    }

    /// Build a gateway talking HTTP to the configured ACS.
    pub fn from_config(config: &AcsConfig) -> Result<Self, RemoteManagementError> {
        Ok(Self::new(Arc::new(AcsClient::new(config)?)))
    }

    /// Identity, firmware and optical levels of a device.
    pub async fn get_info(&self, device: &DeviceIdentity) -> Result<DeviceInfo, GatewayError> {
        let tree = self.backend.fetch_tree(device).await?;
        Ok(telemetry::build_device_info(&tree, device.as_str()))
    }

    /// Clients currently attached to a device, wired and wireless.
    pub async fn get_connected_devices(
        &self,
        device: &DeviceIdentity,
    ) -> Result<Vec<ConnectedDevice>, GatewayError> {
        let tree = self.backend.fetch_tree(device).await?;
        Ok(telemetry::build_connected_devices(&tree))
    }

    pub async fn reboot(&self, device: &DeviceIdentity) -> Result<Accepted, GatewayError> {
        self.submit(device, DeviceTask::Reboot).await
    }

    /// Ask the device to re-report its whole parameter tree.
    pub async fn refresh(&self, device: &DeviceIdentity) -> Result<Accepted, GatewayError> {
        self.submit(
            device,
            DeviceTask::RefreshObject {
                object_name: REFRESH_ROOT.to_string(),
            },
        )
        .await
    }

    pub async fn set_parameter(
        &self,
        device: &DeviceIdentity,
        path: &str,
        value: ParameterValue,
    ) -> Result<Accepted, GatewayError> {
        self.submit(
            device,
            DeviceTask::SetParameterValues {
                values: vec![(path.to_string(), value)],
            },
        )
        .await
    }

    /// Block or unblock a wireless client by MAC.
    ///
    /// The block flag is addressed by access-point and association index, which
    /// shift as clients come and go, so the current tree is read first to find
    /// the client. Nothing is written when the MAC is not associated.
    pub async fn toggle_block(
        &self,
        device: &DeviceIdentity,
        mac: &str,
        block: bool,
    ) -> Result<Accepted, GatewayError> {
        let tree = self.backend.fetch_tree(device).await?;
        let slot = telemetry::locate_wireless_client(&tree, mac).ok_or_else(|| {
            GatewayError::DeviceNotFound {
                device: device.to_string(),
                mac: mac.to_string(),
            }
        })?;

        tracing::info!(
            device = %device,
            mac,
            block,
            access_point = slot.access_point,
            index = slot.index,
            "Toggling wireless client block"
        );

        self.set_parameter(
            device,
            &paths::block_parameter(slot.access_point, slot.index),
            ParameterValue::Bool(block),
        )
        .await
    }

    async fn submit(
        &self,
        device: &DeviceIdentity,
        task: DeviceTask,
    ) -> Result<Accepted, GatewayError> {
        let name = task.name();
        match self.backend.submit_task(device, task).await {
            Ok(accepted) => {
                tracing::info!(
                    device = %device,
                    task = name,
                    queued = accepted.queued,
                    "Device task accepted"
                );
                Ok(accepted)
            }
            Err(e) => {
                tracing::warn!(device = %device, task = name, error = %e, "Device task rejected");
                Err(e.into())
            }
        }
    }
}

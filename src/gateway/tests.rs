//! Unit tests for the remote command gateway.

use super::*;
use serde_json::json;
use std::sync::Mutex;

/// In-memory management server recording every submitted task.
struct MockManagement {
    tree: Result<ParameterTree, RemoteManagementError>,
    submitted: Mutex<Vec<DeviceTask>>,
    reject_tasks: Option<RemoteManagementError>,
}

impl MockManagement {
    fn with_tree(tree: serde_json::Value) -> Self {
        Self {
            tree: Ok(ParameterTree::new(tree)),
            submitted: Mutex::new(Vec::new()),
            reject_tasks: None,
        }
    }

    fn failing(error: RemoteManagementError) -> Self {
        Self {
            tree: Err(error.clone()),
            submitted: Mutex::new(Vec::new()),
            reject_tasks: Some(error),
        }
    }

    fn submitted(&self) -> Vec<DeviceTask> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceManagement for MockManagement {
    async fn fetch_tree(
        &self,
        _device: &DeviceIdentity,
    ) -> Result<ParameterTree, RemoteManagementError> {
        self.tree.clone()
    }

    async fn submit_task(
        &self,
        device: &DeviceIdentity,
        task: DeviceTask,
    ) -> Result<Accepted, RemoteManagementError> {
        if let Some(e) = &self.reject_tasks {
            return Err(e.clone());
        }
        let name = task.name().to_string();
        self.submitted.lock().unwrap().push(task);
        Ok(Accepted {
            device: device.clone(),
            task: name,
            queued: false,
            task_id: Some("task-1".to_string()),
        })
    }
}

fn wireless_tree() -> serde_json::Value {
    json!({
        "InternetGatewayDevice": {
            "DeviceInfo": {
                "ModelName": ["HG8245H", "t", "xsd:string"]
            },
            "LANDevice": {"1": {"WLANConfiguration": {
                "1": {"AssociatedDevice": {
                    "1": {"AssociatedDeviceMACAddress": ["11:11:11:11:11:11", "t", "xsd:string"]}
                }},
                "2": {"AssociatedDevice": {
                    "3": {"AssociatedDeviceMACAddress": ["22:22:22:22:22:22", "t", "xsd:string"]}
                }}
            }}}
        }
    })
}

fn gateway(mock: &Arc<MockManagement>) -> RemoteCommandGateway {
    RemoteCommandGateway::new(mock.clone())
}

#[tokio::test]
async fn test_toggle_block_writes_located_index() {
    let mock = Arc::new(MockManagement::with_tree(wireless_tree()));
    let device = DeviceIdentity::from("dev-1");

    let ack = gateway(&mock)
        .toggle_block(&device, "22:22:22:22:22:22", true)
        .await
        .unwrap();

    assert_eq!(ack.task, "setParameterValues");
    assert!(!ack.queued);
    assert_eq!(
        mock.submitted(),
        vec![DeviceTask::SetParameterValues {
            values: vec![(
                "InternetGatewayDevice.LANDevice.1.WLANConfiguration.2.AssociatedDevice.3.Block"
                    .to_string(),
                ParameterValue::Bool(true)
            )]
        }]
    );
}

#[tokio::test]
async fn test_toggle_block_unblock_writes_false() {
    let mock = Arc::new(MockManagement::with_tree(wireless_tree()));
    gateway(&mock)
        .toggle_block(&DeviceIdentity::from("dev-1"), "11:11:11:11:11:11", false)
        .await
        .unwrap();

    match &mock.submitted()[0] {
        DeviceTask::SetParameterValues { values } => {
            assert!(values[0].0.ends_with("WLANConfiguration.1.AssociatedDevice.1.Block"));
            assert_eq!(values[0].1, ParameterValue::Bool(false));
        }
        other => panic!("unexpected task {other:?}"),
    }
}

#[tokio::test]
async fn test_toggle_block_unknown_mac_fails_without_write() {
    let mock = Arc::new(MockManagement::with_tree(wireless_tree()));
    let result = gateway(&mock)
        .toggle_block(&DeviceIdentity::from("dev-1"), "99:99:99:99:99:99", true)
        .await;

    assert_eq!(
        result,
        Err(GatewayError::DeviceNotFound {
            device: "dev-1".to_string(),
            mac: "99:99:99:99:99:99".to_string()
        })
    );
    assert!(mock.submitted().is_empty());
}

#[tokio::test]
async fn test_toggle_block_read_failure_propagates() {
    let mock = Arc::new(MockManagement::failing(RemoteManagementError::Timeout(
        10_000,
    )));
    let result = gateway(&mock)
        .toggle_block(&DeviceIdentity::from("dev-1"), "11:11:11:11:11:11", true)
        .await;
    assert_eq!(
        result,
        Err(GatewayError::RemoteManagement(
            RemoteManagementError::Timeout(10_000)
        ))
    );
}

#[tokio::test]
async fn test_reboot_and_refresh_submit_named_tasks() {
    let mock = Arc::new(MockManagement::with_tree(json!({})));
    let gw = gateway(&mock);
    let device = DeviceIdentity::from("dev-1");

    assert_eq!(gw.reboot(&device).await.unwrap().task, "reboot");
    assert_eq!(gw.refresh(&device).await.unwrap().task, "refreshObject");
    assert_eq!(
        mock.submitted(),
        vec![
            DeviceTask::Reboot,
            DeviceTask::RefreshObject {
                object_name: REFRESH_ROOT.to_string()
            }
        ]
    );
}

#[tokio::test]
async fn test_command_failure_is_typed() {
    let error = RemoteManagementError::Unauthorized(401);
    let mock = Arc::new(MockManagement::failing(error.clone()));
    let result = gateway(&mock).reboot(&DeviceIdentity::from("dev-1")).await;
    assert_eq!(result, Err(GatewayError::RemoteManagement(error)));
}

#[tokio::test]
async fn test_get_info_normalizes_tree() {
    let mock = Arc::new(MockManagement::with_tree(wireless_tree()));
    let info = gateway(&mock)
        .get_info(&DeviceIdentity::from("4857-SERIAL"))
        .await
        .unwrap();
    assert_eq!(info.model, "HG8245H");
    assert_eq!(info.serial_number, "4857-SERIAL");
    assert_eq!(info.manufacturer, "Huawei");
}

#[tokio::test]
async fn test_get_connected_devices_lists_both_access_points() {
    let mock = Arc::new(MockManagement::with_tree(wireless_tree()));
    let devices = gateway(&mock)
        .get_connected_devices(&DeviceIdentity::from("dev-1"))
        .await
        .unwrap();
    let ids: Vec<_> = devices.iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["wifi-1-1", "wifi-2-3"]);
}

#[test]
fn test_gateway_error_display() {
    let err = GatewayError::DeviceNotFound {
        device: "dev-1".to_string(),
        mac: "aa:bb".to_string(),
    };
    assert_eq!(err.to_string(), "no wireless client aa:bb on device dev-1");

    let err: GatewayError = RemoteManagementError::Network("refused".to_string()).into();
    assert_eq!(err.to_string(), "network error: refused");
}

//! Command and acknowledgement types for the device-management boundary.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

/// Opaque key addressing one managed device (ACS device id / serial).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceIdentity {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for DeviceIdentity {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// A typed value for a parameter write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    String(String),
}

impl ParameterValue {
    /// XML schema type tag expected by the CWMP `SetParameterValues` call.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ParameterValue::Bool(_) => "xsd:boolean",
            ParameterValue::Int(_) => "xsd:int",
            ParameterValue::UInt(_) => "xsd:unsignedInt",
            ParameterValue::String(_) => "xsd:string",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            ParameterValue::Bool(b) => json!(b),
            ParameterValue::Int(i) => json!(i),
            ParameterValue::UInt(u) => json!(u),
            ParameterValue::String(s) => json!(s),
        }
    }

    /// Interpret CLI-style text: booleans, then integers, then a plain string.
    pub fn parse_loose(raw: &str) -> Self {
        match raw.trim() {
            "true" => ParameterValue::Bool(true),
            "false" => ParameterValue::Bool(false),
            text => text
                .parse::<u64>()
                .map(ParameterValue::UInt)
                .or_else(|_| text.parse::<i64>().map(ParameterValue::Int))
                .unwrap_or_else(|_| ParameterValue::String(raw.to_string())),
        }
    }
}

/// A named task submitted to the management server for one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceTask {
    Reboot,
    RefreshObject { object_name: String },
    SetParameterValues { values: Vec<(String, ParameterValue)> },
}

impl DeviceTask {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceTask::Reboot => "reboot",
            DeviceTask::RefreshObject { .. } => "refreshObject",
            DeviceTask::SetParameterValues { .. } => "setParameterValues",
        }
    }

    /// Request body in the northbound task format.
    pub fn body(&self) -> Value {
        match self {
            DeviceTask::Reboot => json!({ "name": self.name() }),
            DeviceTask::RefreshObject { object_name } => json!({
                "name": self.name(),
                "objectName": object_name,
            }),
            DeviceTask::SetParameterValues { values } => {
                let triples: Vec<Value> = values
                    .iter()
                    .map(|(path, value)| json!([path, value.to_json(), value.type_tag()]))
                    .collect();
                json!({
                    "name": self.name(),
                    "parameterValues": triples,
                })
            }
        }
    }
}

/// Acknowledgement that a task was accepted for execution.
///
/// This is not a confirmation that the device applied it. A task the server
/// could not deliver right away is `queued` and runs at the device's next
/// inform; callers that need the effect must re-read the device later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub device: DeviceIdentity,
    pub task: String,
    pub queued: bool,
    pub task_id: Option<String>,
}

//! Shared fixtures for Outpost integration tests.

#![allow(dead_code)]

use outpost::gateway::AcsConfig;
use outpost::status::{FallbackConfig, StatusConfig};
use serde_json::{json, Value};

// =============================================================================
// Outage pages
// =============================================================================

/// An outage page whose verdict sentence is `indicator`.
pub fn outage_page(service: &str, indicator: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
  <title>{service} fora do ar? Situação atual e problemas</title>
  <script>window.dataLayer = [{{"problema": "falha"}}];</script>
  <style>.h2 {{ font-weight: bold; }}</style>
</head>
<body>
  <header><a href="/">Início</a></header>
  <main>
    <h1>{service} fora do ar?</h1>
    <div class="h2 entry-title">{indicator}</div>
    <p>Gráfico de relatos nas últimas 24 horas</p>
  </main>
</body>
</html>"#
    )
}

/// A Cloudflare-style interstitial without any indicator sentence.
pub fn challenge_page() -> &'static str {
    r#"<!DOCTYPE html><html><head><title>Just a moment...</title></head>
<body><div id="cf-chl-widget"></div><noscript>Enable JavaScript and cookies to continue</noscript></body></html>"#
}

/// Status config pointing at a mock server.
pub fn status_config(base_uri: &str) -> StatusConfig {
    StatusConfig {
        url_template: format!("{base_uri}/fora-do-ar/{{service}}/"),
        timeout_seconds: 2,
        ..StatusConfig::default()
    }
}

/// Fallback config pointing at a mock server.
pub fn fallback_config(base_uri: &str) -> FallbackConfig {
    FallbackConfig {
        base_url: base_uri.to_string(),
        timeout_seconds: 2,
        ..FallbackConfig::default()
    }
}

/// Chat completion whose answer is the given verdict object.
pub fn completion(verdict: Value) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": verdict.to_string()},
            "finish_reason": "stop"
        }]
    })
}

// =============================================================================
// ACS documents
// =============================================================================

/// ACS config pointing at a mock server.
pub fn acs_config(base_uri: &str) -> AcsConfig {
    AcsConfig {
        base_url: base_uri.to_string(),
        password_env: None,
        timeout_seconds: 2,
        ..AcsConfig::default()
    }
}

fn leaf(value: Value, kind: &str) -> Value {
    json!({"_value": value, "_timestamp": "2024-05-02T12:00:00.000Z", "_type": kind, "_writable": false})
}

/// A device document as returned by `GET /devices`, using object leaves.
///
/// One wired laptop, one phone seen both in the host table and on the 5 GHz
/// radio, and one tablet on the 2.4 GHz radio.
pub fn device_document(id: &str) -> Value {
    json!({
        "_id": id,
        "_lastInform": "2024-05-02T12:00:00.000Z",
        "InternetGatewayDevice": {
            "_object": true,
            "DeviceInfo": {
                "Manufacturer": leaf(json!("Huawei Technologies Co., Ltd"), "xsd:string"),
                "ModelName": leaf(json!("EG8145V5"), "xsd:string"),
                "SerialNumber": leaf(json!("485754430A1B2C3D"), "xsd:string"),
                "SoftwareVersion": leaf(json!("V5R020C10S115"), "xsd:string"),
                "UpTime": leaf(json!(86400), "xsd:unsignedInt")
            },
            "WANDevice": {"1": {"X_GponInterafceConfig": {
                "TransceiverTemperature": leaf(json!(47), "xsd:int"),
                "RXPower": leaf(json!("-19.14"), "xsd:string"),
                "TXPower": leaf(json!("2.31"), "xsd:string")
            }}},
            "LANDevice": {"1": {
                "Hosts": {"Host": {
                    "_object": true,
                    "1": {
                        "Active": leaf(json!(true), "xsd:boolean"),
                        "HostName": leaf(json!("laptop"), "xsd:string"),
                        "IPAddress": leaf(json!("192.168.100.10"), "xsd:string"),
                        "MACAddress": leaf(json!("10:20:30:40:50:60"), "xsd:string"),
                        "InterfaceType": leaf(json!("Ethernet"), "xsd:string")
                    },
                    "2": {
                        "Active": leaf(json!("true"), "xsd:boolean"),
                        "HostName": leaf(json!("phone"), "xsd:string"),
                        "IPAddress": leaf(json!("192.168.100.11"), "xsd:string"),
                        "MACAddress": leaf(json!("A4-50-46-11-22-33"), "xsd:string"),
                        "InterfaceType": leaf(json!("802.11"), "xsd:string")
                    },
                    "3": {
                        "Active": leaf(json!(false), "xsd:boolean"),
                        "HostName": leaf(json!("old-tv"), "xsd:string"),
                        "MACAddress": leaf(json!("00:11:22:33:44:55"), "xsd:string")
                    }
                }},
                "WLANConfiguration": {
                    "1": {"AssociatedDevice": {
                        "1": {
                            "AssociatedDeviceMACAddress": leaf(json!("f0:99:b6:aa:bb:cc"), "xsd:string"),
                            "AssociatedDeviceIPAddress": leaf(json!("192.168.100.12"), "xsd:string"),
                            "X_HW_RSSI": leaf(json!(-75), "xsd:int"),
                            "LastDataDownlinkRate": leaf(json!(72000), "xsd:unsignedInt"),
                            "LastDataUplinkRate": leaf(json!(36000), "xsd:unsignedInt")
                        }
                    }},
                    "2": {"AssociatedDevice": {
                        "1": {
                            "AssociatedDeviceMACAddress": leaf(json!("a4:50:46:11:22:33"), "xsd:string"),
                            "X_HW_RSSI": leaf(json!(-45), "xsd:int"),
                            "LastDataDownlinkRate": leaf(json!(866000), "xsd:unsignedInt"),
                            "LastDataUplinkRate": leaf(json!(433000), "xsd:unsignedInt")
                        }
                    }}
                }
            }}
        }
    })
}

//! Typed device views built from a raw parameter tree.

use super::paths;
use super::tree::ParameterTree;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Manufacturer reported when the tree does not carry one.
pub const DEFAULT_MANUFACTURER: &str = "Huawei";

/// Placeholder for missing text fields.
pub const UNKNOWN: &str = "Unknown";

/// How a client is attached to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    Wifi,
    Ethernet,
}

/// Optical levels of the PON transceiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OpticalPower {
    pub rx_dbm: Option<f64>,
    pub tx_dbm: Option<f64>,
}

/// Identity and health of a managed device. Rebuilt on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub firmware_version: String,
    pub uptime_seconds: u64,
    pub temperature_celsius: Option<f64>,
    pub optical_power: OpticalPower,
}

/// Link rates in Mbps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bandwidth {
    pub download_mbps: f64,
    pub upload_mbps: f64,
}

/// A client seen by the device on its LAN or WLAN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectedDevice {
    pub id: String,
    pub display_name: String,
    pub ip_address: Option<String>,
    pub mac_address: String,
    pub connection_type: ConnectionType,
    pub connected: bool,
    pub signal_percent: Option<u8>,
    pub bandwidth: Option<Bandwidth>,
}

/// Position of an associated wireless client in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WirelessSlot {
    pub access_point: u32,
    pub index: u32,
}

/// Convert an RSSI reading in dBm to a 0-100 signal quality.
///
/// Linear between -90 dBm (0%) and -30 dBm (100%), clamped outside.
pub fn signal_percent(dbm: Option<f64>) -> Option<u8> {
    let dbm = dbm.filter(|d| !d.is_nan())?;
    if dbm >= -30.0 {
        return Some(100);
    }
    if dbm <= -90.0 {
        return Some(0);
    }
    Some((((dbm + 90.0) / 60.0) * 100.0).round() as u8)
}

/// Canonical form of a MAC address for comparisons.
pub fn normalize_mac(mac: &str) -> String {
    mac.trim().to_ascii_lowercase().replace('-', ":")
}

/// Build the device identity view. Every field falls back on its own.
pub fn build_device_info(tree: &ParameterTree, device_key: &str) -> DeviceInfo {
    DeviceInfo {
        manufacturer: tree
            .text(paths::MANUFACTURER)
            .unwrap_or_else(|| DEFAULT_MANUFACTURER.to_string()),
        model: tree
            .text(paths::MODEL)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        serial_number: tree
            .text(paths::SERIAL_NUMBER)
            .unwrap_or_else(|| device_key.to_string()),
        firmware_version: tree
            .text(paths::FIRMWARE_VERSION)
            .unwrap_or_else(|| UNKNOWN.to_string()),
        uptime_seconds: tree.unsigned(paths::UPTIME).unwrap_or(0),
        temperature_celsius: tree.number(paths::TEMPERATURE),
        optical_power: OpticalPower {
            rx_dbm: tree.number(paths::RX_POWER),
            tx_dbm: tree.number(paths::TX_POWER),
        },
    }
}

/// Build the merged wired + wireless client list.
///
/// A MAC reported by both the host table and an access point appears once,
/// as the wireless record.
pub fn build_connected_devices(tree: &ParameterTree) -> Vec<ConnectedDevice> {
    merge_by_mac(wired_hosts(tree), wireless_clients(tree))
}

/// Find the access point and index of an associated client by MAC.
pub fn locate_wireless_client(tree: &ParameterTree, mac: &str) -> Option<WirelessSlot> {
    let wanted = normalize_mac(mac);
    paths::ACCESS_POINTS.into_iter().find_map(|access_point| {
        let node = paths::associated_devices(access_point);
        tree.indices(&node).into_iter().find_map(|index| {
            let found = tree.text(&paths::field(&node, index, "AssociatedDeviceMACAddress"))?;
            (normalize_mac(&found) == wanted).then_some(WirelessSlot {
                access_point,
                index,
            })
        })
    })
}

fn wired_hosts(tree: &ParameterTree) -> Vec<ConnectedDevice> {
    tree.indices(paths::HOSTS)
        .into_iter()
        .filter(|&i| tree.flag(&paths::field(paths::HOSTS, i, "Active")))
        .map(|i| {
            let mac = tree
                .text(&paths::field(paths::HOSTS, i, "MACAddress"))
                .unwrap_or_default();
            let interface = tree
                .text(&paths::field(paths::HOSTS, i, "InterfaceType"))
                .unwrap_or_default();
            ConnectedDevice {
                id: format!("host-{i}"),
                display_name: tree
                    .text(&paths::field(paths::HOSTS, i, "HostName"))
                    .unwrap_or_else(|| fallback_name(&mac)),
                ip_address: tree.text(&paths::field(paths::HOSTS, i, "IPAddress")),
                mac_address: mac,
                connection_type: if interface.contains("802.11") {
                    ConnectionType::Wifi
                } else {
                    ConnectionType::Ethernet
                },
                connected: true,
                signal_percent: None,
                bandwidth: None,
            }
        })
        .collect()
}

fn wireless_clients(tree: &ParameterTree) -> Vec<ConnectedDevice> {
    let mut clients = Vec::new();
    for access_point in paths::ACCESS_POINTS {
        let node = paths::associated_devices(access_point);
        for index in tree.indices(&node) {
            let Some(mac) = tree.text(&paths::field(&node, index, "AssociatedDeviceMACAddress"))
            else {
                continue;
            };
            let download = tree.number(&paths::field(&node, index, "LastDataDownlinkRate"));
            let upload = tree.number(&paths::field(&node, index, "LastDataUplinkRate"));
            let bandwidth = (download.is_some() || upload.is_some()).then(|| Bandwidth {
                download_mbps: download.unwrap_or(0.0) / 1000.0,
                upload_mbps: upload.unwrap_or(0.0) / 1000.0,
            });

            clients.push(ConnectedDevice {
                id: format!("wifi-{access_point}-{index}"),
                display_name: tree
                    .text(&paths::field(&node, index, "HostName"))
                    .unwrap_or_else(|| mac.clone()),
                ip_address: tree.text(&paths::field(&node, index, "AssociatedDeviceIPAddress")),
                mac_address: mac,
                connection_type: ConnectionType::Wifi,
                connected: true,
                signal_percent: signal_percent(
                    tree.number(&paths::field(&node, index, "X_HW_RSSI")),
                ),
                bandwidth,
            });
        }
    }
    clients
}

fn fallback_name(mac: &str) -> String {
    if mac.is_empty() {
        UNKNOWN.to_string()
    } else {
        mac.to_string()
    }
}

fn merge_by_mac(
    wired: Vec<ConnectedDevice>,
    mut wireless: Vec<ConnectedDevice>,
) -> Vec<ConnectedDevice> {
    // Stale associations can list the same station under both radios; first wins.
    let mut seen = HashSet::new();
    wireless.retain(|d| seen.insert(normalize_mac(&d.mac_address)));

    let positions: HashMap<String, usize> = wireless
        .iter()
        .enumerate()
        .map(|(i, d)| (normalize_mac(&d.mac_address), i))
        .collect();

    let mut merged = Vec::with_capacity(wired.len() + wireless.len());
    for host in wired {
        let slot = (!host.mac_address.is_empty())
            .then(|| positions.get(&normalize_mac(&host.mac_address)))
            .flatten();
        match slot {
            Some(&i) => {
                let radio = &mut wireless[i];
                if radio.display_name.eq_ignore_ascii_case(&radio.mac_address) {
                    radio.display_name = host.display_name;
                }
                if radio.ip_address.is_none() {
                    radio.ip_address = host.ip_address;
                }
            }
            None => merged.push(host),
        }
    }
    merged.extend(wireless);
    merged
}

//! Well-known parameter paths of the ONT data model.

pub const MANUFACTURER: &str = "InternetGatewayDevice.DeviceInfo.Manufacturer";
pub const MODEL: &str = "InternetGatewayDevice.DeviceInfo.ModelName";
pub const SERIAL_NUMBER: &str = "InternetGatewayDevice.DeviceInfo.SerialNumber";
pub const FIRMWARE_VERSION: &str = "InternetGatewayDevice.DeviceInfo.SoftwareVersion";
pub const UPTIME: &str = "InternetGatewayDevice.DeviceInfo.UpTime";

pub const TEMPERATURE: &str =
    "InternetGatewayDevice.WANDevice.1.X_GponInterafceConfig.TransceiverTemperature";
pub const RX_POWER: &str = "InternetGatewayDevice.WANDevice.1.X_GponInterafceConfig.RXPower";
pub const TX_POWER: &str = "InternetGatewayDevice.WANDevice.1.X_GponInterafceConfig.TXPower";

/// Wired/LAN host table, keyed by host index.
pub const HOSTS: &str = "InternetGatewayDevice.LANDevice.1.Hosts.Host";

/// Access-point indices that carry associated wireless clients (2.4 GHz, 5 GHz).
pub const ACCESS_POINTS: [u32; 2] = [1, 2];

/// Node holding the wireless clients of one access point.
pub fn associated_devices(access_point: u32) -> String {
    format!("InternetGatewayDevice.LANDevice.1.WLANConfiguration.{access_point}.AssociatedDevice")
}

/// Writable block flag of one associated wireless client.
pub fn block_parameter(access_point: u32, index: u32) -> String {
    format!("{}.{index}.Block", associated_devices(access_point))
}

/// Join a node path with a child index and field name.
pub fn field(node: &str, index: u32, name: &str) -> String {
    format!("{node}.{index}.{name}")
}

//! Output formatting helpers for CLI commands

use crate::gateway::Accepted;
use crate::status::{ServiceStatus, StatusState};
use crate::telemetry::{ConnectedDevice, ConnectionType, DeviceInfo};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;
use std::sync::Arc;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

/// Colored state label
pub fn state_label(state: StatusState) -> String {
    match state {
        StatusState::Operational => "Operational".green().to_string(),
        StatusState::Minor => "Minor".yellow().to_string(),
        StatusState::Major => "Major".red().to_string(),
        StatusState::Critical => "Critical".red().bold().to_string(),
        StatusState::Unknown => "Unknown".dimmed().to_string(),
    }
}

/// Format service statuses as a table
pub fn format_status_table(statuses: &[Arc<ServiceStatus>]) -> String {
    let mut table = new_table(vec!["Service", "State", "Reports", "Source", "Observed"]);

    for s in statuses {
        table.add_row(vec![
            Cell::new(s.display_name()),
            Cell::new(state_label(s.state())),
            Cell::new(s.report_signal()),
            Cell::new(s.source_label()),
            Cell::new(s.observed_at().format("%Y-%m-%d %H:%M:%S UTC")),
        ]);
    }

    table.to_string()
}

/// Format service statuses as JSON
pub fn format_status_json(statuses: &[Arc<ServiceStatus>]) -> String {
    let statuses: Vec<&ServiceStatus> = statuses.iter().map(Arc::as_ref).collect();
    to_json(&json!({ "services": statuses }))
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

/// Format device identity and optical levels
pub fn format_device_info(info: &DeviceInfo) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Manufacturer: {}", info.manufacturer);
    let _ = writeln!(output, "Model:        {}", info.model);
    let _ = writeln!(output, "Serial:       {}", info.serial_number);
    let _ = writeln!(output, "Firmware:     {}", info.firmware_version);
    let _ = writeln!(output, "Uptime:       {}", format_uptime(info.uptime_seconds));
    let _ = writeln!(
        output,
        "Temperature:  {}",
        or_dash(info.temperature_celsius.map(|t| format!("{t:.1} °C")))
    );
    let _ = writeln!(
        output,
        "Optical RX:   {}",
        or_dash(info.optical_power.rx_dbm.map(|p| format!("{p:.2} dBm")))
    );
    let _ = write!(
        output,
        "Optical TX:   {}",
        or_dash(info.optical_power.tx_dbm.map(|p| format!("{p:.2} dBm")))
    );
    output
}

/// Format device info as JSON
pub fn format_device_info_json(info: &DeviceInfo) -> String {
    to_json(info)
}

/// Format connected clients as a table
pub fn format_hosts_table(devices: &[ConnectedDevice]) -> String {
    let mut table = new_table(vec!["Name", "MAC", "IP", "Link", "Signal", "Down/Up"]);

    for d in devices {
        let link = match d.connection_type {
            ConnectionType::Wifi => "Wi-Fi".cyan().to_string(),
            ConnectionType::Ethernet => "Ethernet".to_string(),
        };
        table.add_row(vec![
            Cell::new(&d.display_name),
            Cell::new(&d.mac_address),
            Cell::new(or_dash(d.ip_address.as_deref())),
            Cell::new(link),
            Cell::new(or_dash(d.signal_percent.map(|p| format!("{p}%")))),
            Cell::new(or_dash(d.bandwidth.map(|b| {
                format!("{:.1}/{:.1} Mbps", b.download_mbps, b.upload_mbps)
            }))),
        ]);
    }

    table.to_string()
}

/// Format connected clients as JSON
pub fn format_hosts_json(devices: &[ConnectedDevice]) -> String {
    to_json(&json!({ "devices": devices }))
}

/// One-line acknowledgement of a submitted command
pub fn format_accepted(accepted: &Accepted) -> String {
    let outcome = if accepted.queued {
        "queued until the device connects".yellow().to_string()
    } else {
        "accepted".green().to_string()
    };
    let mut line = format!(
        "{} {} {} for {}",
        "✓".green(),
        accepted.task,
        outcome,
        accepted.device
    );
    if let Some(id) = &accepted.task_id {
        let _ = write!(line, " (task {})", id);
    }
    line
}

/// Format an acknowledgement as JSON
pub fn format_accepted_json(accepted: &Accepted) -> String {
    to_json(accepted)
}

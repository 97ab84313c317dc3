//! CLI module for Outpost
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Keep the status cache warm until interrupted
//! - `status` - Refresh and print service status
//! - `device` - Read telemetry from and send commands to a managed device
//! - `config` - Configuration utilities (init)
//!
//! # Example
//!
//! ```bash
//! # Run the background refresher with default config
//! outpost serve
//!
//! # One-shot status of every tracked service, as JSON
//! outpost status --json
//!
//! # Block a wireless client
//! outpost device block 00259E-HG8245H-4857544312345678 aa:bb:cc:dd:ee:ff
//! ```

pub mod config;
pub mod device;
pub mod output;
pub mod serve;
pub mod status;

pub use config::handle_config_init;

use crate::config::{ConfigError, OutpostConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Outpost - service outage status and CPE telemetry
#[derive(Parser, Debug)]
#[command(
    name = "outpost",
    version,
    about = "Service outage status cache and TR-069 device telemetry"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Refresh tracked services on a schedule until interrupted
    Serve(ServeArgs),
    /// Refresh and show service status
    Status(StatusArgs),
    /// Managed device telemetry and commands
    #[command(subcommand)]
    Device(DeviceCommands),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "outpost.toml")]
    pub config: PathBuf,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "OUTPOST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override the status TTL in seconds
    #[arg(long)]
    pub ttl: Option<u64>,

    /// Override the refresh interval in seconds
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Disable fallback classification
    #[arg(long)]
    pub no_fallback: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Service key; all tracked services when omitted
    pub service: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "outpost.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum DeviceCommands {
    /// Show identity, firmware and optical levels
    Info(DeviceArgs),
    /// List connected clients
    Hosts(DeviceArgs),
    /// Reboot the device
    Reboot(DeviceArgs),
    /// Ask the device to re-report its parameters
    Refresh(DeviceArgs),
    /// Write one parameter
    Set(DeviceSetArgs),
    /// Block a wireless client by MAC
    Block(DeviceBlockArgs),
    /// Unblock a wireless client by MAC
    Unblock(DeviceBlockArgs),
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device identifier as known to the ACS
    pub device: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "outpost.toml")]
    pub config: PathBuf,
}

#[derive(Args, Debug)]
pub struct DeviceSetArgs {
    #[command(flatten)]
    pub target: DeviceArgs,

    /// Full parameter path
    pub path: String,

    /// New value; true/false and integers are typed accordingly
    pub value: String,
}

#[derive(Args, Debug)]
pub struct DeviceBlockArgs {
    #[command(flatten)]
    pub target: DeviceArgs,

    /// MAC address of the wireless client
    pub mac: String,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "outpost.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Load the config file if present, otherwise defaults, then env overrides.
pub fn load_config(path: &Path) -> Result<OutpostConfig, ConfigError> {
    let config = if path.exists() {
        OutpostConfig::load(Some(path))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        OutpostConfig::default()
    };
    Ok(config.with_env_overrides())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["outpost", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("outpost.toml"));
                assert!(args.interval.is_none());
                assert!(!args.no_fallback);
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "outpost",
            "serve",
            "-c",
            "custom.toml",
            "-i",
            "60",
            "--ttl",
            "30",
        ])
        .unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.config, PathBuf::from("custom.toml"));
                assert_eq!(args.interval, Some(60));
                assert_eq!(args.ttl, Some(30));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_status_single_service() {
        let cli = Cli::try_parse_from(["outpost", "status", "vivo", "--json"]).unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert_eq!(args.service.as_deref(), Some("vivo"));
                assert!(args.json);
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_parse_device_block() {
        let cli = Cli::try_parse_from([
            "outpost",
            "device",
            "block",
            "CPE-1",
            "aa:bb:cc:dd:ee:ff",
        ])
        .unwrap();
        match cli.command {
            Commands::Device(DeviceCommands::Block(args)) => {
                assert_eq!(args.target.device, "CPE-1");
                assert_eq!(args.mac, "aa:bb:cc:dd:ee:ff");
            }
            _ => panic!("Expected Device Block command"),
        }
    }

    #[test]
    fn test_cli_parse_device_set() {
        let cli = Cli::try_parse_from([
            "outpost",
            "device",
            "set",
            "CPE-1",
            "InternetGatewayDevice.ManagementServer.PeriodicInformInterval",
            "300",
        ])
        .unwrap();
        match cli.command {
            Commands::Device(DeviceCommands::Set(args)) => {
                assert_eq!(args.target.device, "CPE-1");
                assert_eq!(args.value, "300");
            }
            _ => panic!("Expected Device Set command"),
        }
    }

    #[test]
    fn test_cli_device_requires_identifier() {
        assert!(Cli::try_parse_from(["outpost", "device", "reboot"]).is_err());
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["outpost", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => {
                assert!(args.force);
                assert_eq!(args.output, PathBuf::from("outpost.toml"));
            }
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let config = load_config(Path::new("/nonexistent/outpost.toml")).unwrap();
        assert_eq!(config.status.url_template, OutpostConfig::default().status.url_template);
    }
}

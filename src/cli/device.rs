//! Device command implementation

use crate::cli::output::{
    format_accepted, format_accepted_json, format_device_info, format_device_info_json,
    format_hosts_json, format_hosts_table,
};
use crate::cli::{load_config, DeviceArgs, DeviceCommands};
use crate::gateway::{DeviceIdentity, ParameterValue, RemoteCommandGateway};
use anyhow::Context;

/// Handle `outpost device <command>`
pub async fn handle_device(command: &DeviceCommands) -> anyhow::Result<String> {
    let target = match command {
        DeviceCommands::Info(args)
        | DeviceCommands::Hosts(args)
        | DeviceCommands::Reboot(args)
        | DeviceCommands::Refresh(args) => args,
        DeviceCommands::Set(args) => &args.target,
        DeviceCommands::Block(args) | DeviceCommands::Unblock(args) => &args.target,
    };
    let gateway = connect(target)?;
    run_device_command(&gateway, command).await
}

fn connect(target: &DeviceArgs) -> anyhow::Result<RemoteCommandGateway> {
    let config = load_config(&target.config)?;
    RemoteCommandGateway::from_config(&config.acs)
        .with_context(|| format!("cannot reach ACS at {}", config.acs.base_url))
}

/// Run a device command against a gateway and format its outcome.
pub async fn run_device_command(
    gateway: &RemoteCommandGateway,
    command: &DeviceCommands,
) -> anyhow::Result<String> {
    let output = match command {
        DeviceCommands::Info(args) => {
            let info = gateway.get_info(&identity(args)).await?;
            if args.json {
                format_device_info_json(&info)
            } else {
                format_device_info(&info)
            }
        }
        DeviceCommands::Hosts(args) => {
            let devices = gateway.get_connected_devices(&identity(args)).await?;
            if args.json {
                format_hosts_json(&devices)
            } else {
                format_hosts_table(&devices)
            }
        }
        DeviceCommands::Reboot(args) => {
            let accepted = gateway.reboot(&identity(args)).await?;
            render_accepted(args, &accepted)
        }
        DeviceCommands::Refresh(args) => {
            let accepted = gateway.refresh(&identity(args)).await?;
            render_accepted(args, &accepted)
        }
        DeviceCommands::Set(args) => {
            let value = ParameterValue::parse_loose(&args.value);
            let accepted = gateway
                .set_parameter(&identity(&args.target), &args.path, value)
                .await?;
            render_accepted(&args.target, &accepted)
        }
        DeviceCommands::Block(args) | DeviceCommands::Unblock(args) => {
            let block = matches!(command, DeviceCommands::Block(_));
            let accepted = gateway
                .toggle_block(&identity(&args.target), &args.mac, block)
                .await?;
            render_accepted(&args.target, &accepted)
        }
    };
    Ok(output)
}

fn identity(args: &DeviceArgs) -> DeviceIdentity {
    DeviceIdentity::new(args.device.trim())
}

fn render_accepted(args: &DeviceArgs, accepted: &crate::gateway::Accepted) -> String {
    if args.json {
        format_accepted_json(accepted)
    } else {
        format_accepted(accepted)
    }
}

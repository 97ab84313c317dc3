use clap::Parser;
use outpost::cli::{
    device::handle_device, handle_config_init, serve::run_serve, status::handle_status, Cli,
    Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Status(args) => handle_status(&args).await.map(|output| println!("{}", output)),
        Commands::Device(cmd) => handle_device(&cmd).await.map(|output| println!("{}", output)),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => {
                handle_config_init(&args).map(|output| println!("{}", output))
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

//! `machina`, a command-line client for the machina VM management backend.
//!
//! Every invocation builds a fresh [`Session`] against the configured
//! backend URL and runs one command through it. Diagnostics go to stderr
//! via `RUST_LOG`; command output goes to stdout, as tables or `--json`.

mod bootstrap_cmd;
mod config;
mod disk_cmd;
mod identity_cmd;
mod image_cmd;
mod instance_cmd;
mod network_cmd;
mod output;
mod task_cmd;

use clap::{Parser, Subcommand};
use machina_client::Session;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

#[derive(Debug, Parser)]
#[command(name = "machina", about = "Manage virtual machines through a machina backend", version)]
struct Cli {
    /// Backend base URL (overrides MACHINA_URL and the config file)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Emit raw JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage virtual disks
    Disk(disk_cmd::DiskCli),
    /// Manage OS images
    Image(image_cmd::ImageCli),
    /// Manage virtual networks
    Network(network_cmd::NetworkCli),
    /// Manage login identities
    Identity(identity_cmd::IdentityCli),
    /// Manage bootstrap configurations
    Bootstrap(bootstrap_cmd::BootstrapCli),
    /// Manage virtual machine instances
    Instance(instance_cmd::InstanceCli),
    /// Inspect background tasks
    Task(task_cmd::TaskCli),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    let url = config.resolve_url(cli.url, std::env::var("MACHINA_URL").ok());
    let session = Session::connect(url);

    match cli.command {
        Command::Disk(cmd) => cmd.run(&session, cli.json).await,
        Command::Image(cmd) => cmd.run(&session, cli.json).await,
        Command::Network(cmd) => cmd.run(&session, cli.json).await,
        Command::Identity(cmd) => cmd.run(&session, cli.json).await,
        Command::Bootstrap(cmd) => cmd.run(&session, cli.json).await,
        Command::Instance(cmd) => cmd.run(&session, cli.json).await,
        Command::Task(cmd) => cmd.run(&session, cli.json).await,
    }
}

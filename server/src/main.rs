mod config;
mod http;
mod session;
mod view;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use platform_obs::{ObsConfig, init_tracing};
use tracing::info;

use crate::{
    config::AppConfig,
    http::{AppState, ServeConfig},
};

#[derive(Parser, Debug)]
#[command(name = "employee-roster", version, about = "In-memory employee roster page")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the roster page over HTTP.
    Serve(ServeCommand),
}

#[derive(Args, Debug)]
struct ServeCommand {
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,
    #[arg(long, default_value_t = 8080)]
    port: u16,
    #[arg(long, help = "Start every session with an empty roster")]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    match cli.command {
        Command::Serve(cmd) => run_server(cmd, config).await,
    }
}

async fn run_server(cmd: ServeCommand, mut config: AppConfig) -> Result<()> {
    if cmd.no_seed {
        config.seed_roster = false;
    }
    info!(?config, "starting employee roster");
    let state = AppState::new(config);
    http::serve(ServeConfig::new(cmd.host, cmd.port), state).await
}

//! slotwatch - watches the SBAT practical-exam API for open slots

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod notify;
mod slots;
mod token;

use cli::{Cli, Commands};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run => cli::run::run(cli.config.as_deref()).await,
        Commands::Init => cli::init::run(cli.config.as_deref()).await,
        Commands::Status => cli::status::run(cli.config.as_deref()),
        Commands::Version => {
            println!("slotwatch version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

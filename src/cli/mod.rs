//! CLI command definitions and handlers

use clap::{Parser, Subcommand};

pub mod init;
pub mod run;
pub mod status;

/// Watches the SBAT practical-exam API for open slots and posts matches to a webhook
#[derive(Parser, Debug)]
#[command(name = "slotwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Override config file location
    #[arg(long, global = true, env = "SLOTWATCH_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, global = true, env = "SLOTWATCH_DEBUG", hide_env = true)]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Perform one polling pass over all configured exam centers
    Run,

    /// Initialize slotwatch configuration
    Init,

    /// Show configuration and cached-token status
    Status,

    /// Display version information
    Version,
}

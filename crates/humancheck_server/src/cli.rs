//! Command-line interface for the verification service.

use clap::{Parser, Subcommand};

/// humancheck - human-verification challenge service
#[derive(Parser, Debug)]
#[command(name = "humancheck_server")]
#[command(about = "HTTP service hosting are-you-human challenges", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP verification server
    Serve {
        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Path to a TOML config file
        #[arg(long)]
        config: Option<std::path::PathBuf>,
    },
}

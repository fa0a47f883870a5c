//! humancheck server binary.

use anyhow::Result;
use clap::Parser;
use humancheck_server::cli::{Cli, Command};
use humancheck_server::{ServerConfig, SessionManager, router};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, host, config } => serve(host, port, config).await,
    }
}

/// Run the HTTP verification server.
async fn serve(host: Option<String>, port: Option<u16>, config: Option<PathBuf>) -> Result<()> {
    let mut config = match config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };
    config.apply_bind_overrides(host, port);

    let addr = config.bind_addr();
    let sessions = SessionManager::new(Arc::new(config));
    let app = router(sessions);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "verification service ready");
    axum::serve(listener, app).await?;

    Ok(())
}

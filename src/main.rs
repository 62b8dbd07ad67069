//! Repo Relay
//!
//! A stateless HTTP relay built with Tokio and Axum that fronts a repository
//! inspector service and reshapes its answers into a stable JSON contract.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────┐
//!                     │                    REPO RELAY                    │
//!                     │                                                  │
//!   Client Request    │  ┌─────────┐    ┌──────────┐    ┌────────────┐   │
//!   ──────────────────┼─▶│  http   │───▶│ handlers │───▶│  upstream  │───┼──▶ Inspector
//!                     │  │ server  │    │(validate)│    │   client   │   │
//!                     │  └─────────┘    └──────────┘    └─────┬──────┘   │
//!                     │                                       │          │
//!   Client Response   │  ┌─────────┐    ┌──────────────┐      │          │
//!   ◀─────────────────┼──│response │◀───│  normalize   │◀─────┘          │
//!                     │  │ (JSON)  │    │ (map/errors) │                 │
//!                     │  └─────────┘    └──────────────┘                 │
//!                     │                                                  │
//!                     │   config · observability · lifecycle             │
//!                     └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use repo_relay::config::load_config;
use repo_relay::lifecycle::{spawn_signal_listener, Shutdown};
use repo_relay::observability::init_logging;
use repo_relay::HttpServer;

#[derive(Parser)]
#[command(name = "repo-relay")]
#[command(about = "HTTP relay in front of the repository inspector", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref(), cli.bind.as_deref())?;

    init_logging(&config.observability);

    tracing::info!("repo-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        request_timeout_secs = config.upstream.request_timeout_secs,
        log_level = %config.observability.log_level,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    spawn_signal_listener(&shutdown);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

// SPDX-License-Identifier: MIT

//! Entry point for the control-plane HTTP server: binds the listener,
//! wires up an in-memory store, and serves the wire-protocol routes.

use clap::Parser;
use fulcrum_api::AppState;
use fulcrum_store::Store;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Fulcrum control-plane server")]
struct Cli {
    /// Address the HTTP listener binds to.
    #[arg(long, env = "FULCRUM_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    listen_addr: SocketAddr,

    /// How long a claimed job may run before it's reclaimed, e.g. "5m".
    #[arg(long, env = "FULCRUM_JOB_TIMEOUT", default_value = "5m")]
    job_timeout: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let job_timeout = humantime::parse_duration(&cli.job_timeout)?;

    let store = Arc::new(Store::new());
    let state = AppState { store, job_timeout };

    let listener = tokio::net::TcpListener::bind(cli.listen_addr).await?;
    tracing::info!(addr = %cli.listen_addr, "fulcrum-server listening");
    axum::serve(listener, fulcrum_api::router(state)).await?;
    Ok(())
}

// SPDX-License-Identifier: MIT

//! Entry point for the agent runtime: loads configuration, connects to
//! the control plane, and runs the polling loops until interrupted.

use clap::Parser;
use fulcrum_agent::{AgentConfig, AgentRuntime};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Fulcrum agent runtime")]
struct Cli {
    /// Path to a JSON config file; `TESTAGENT_*` environment variables
    /// override whatever it sets.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = AgentConfig::load(cli.config.as_deref())?;

    let mut runtime = AgentRuntime::new(config)?;
    runtime.start().await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    runtime.shutdown().await?;
    Ok(())
}

//! devportd — the DevPort daemon.
//!
//! Single binary that assembles the local developer runtime:
//! - Runtime configuration (profiles, directories, dispatch rules)
//! - Environment collaborator
//! - Command registry with the built-in command set
//! - Dispatch chain
//! - Admin API and gateway
//!
//! # Usage
//!
//! ```text
//! devportd run --config devport.toml
//! devportd check --config devport.toml
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use devport_api::ApiState;
use devport_commands::CommandRegistry;
use devport_commands::builtin::register_builtin;
use devport_core::Config;
use devport_dispatch::{DecompressStage, DispatchChain, DispatchStage};
use devport_env::Env;
use devport_gateway::Gateway;
use serde_json::json;
use tokio::sync::watch;
use tracing::info;

#[derive(Parser)]
#[command(name = "devportd", about = "DevPort daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the gateway with the given configuration.
    Run {
        /// Path to the configuration file.
        #[arg(long, default_value = "devport.toml")]
        config: PathBuf,

        /// Override the configured HTTP port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Validate a configuration file and exit.
    Check {
        /// Path to the configuration file.
        #[arg(long, default_value = "devport.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,devportd=debug,devport=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run { config, port } => run(config, port).await,
        Command::Check { config } => check(&config),
    }
}

fn check(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::from_file(config_path)?;
    config.validate()?;
    info!(path = ?config_path, "configuration OK");
    Ok(())
}

async fn run(config_path: PathBuf, port_override: Option<u16>) -> anyhow::Result<()> {
    info!("DevPort daemon starting");

    // Configuration faults are fatal here, before anything listens.
    let config = Config::from_file(&config_path)?;
    config.validate()?;
    let port = port_override.unwrap_or(config.runtime.http_port);

    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let paths = config.paths(base);
    std::fs::create_dir_all(&paths.data_dir)?;
    std::fs::create_dir_all(&paths.projects_dir)?;

    // ── Assemble subsystems ────────────────────────────────────

    // Environment collaborator.
    let profiles: Vec<String> = config.profile.iter().map(|p| p.name.clone()).collect();
    let mut env = Env::new(paths).with_value("profiles", json!(profiles));
    if let Some(profile) = config.default_profile() {
        env = env
            .with_value("default_profile", json!(profile.name.clone()))
            .with_value("remote_host", json!(profile.remote_host.clone()));
    }
    info!(profiles = config.profile.len(), "environment initialized");

    // Command registry.
    let mut registry = CommandRegistry::new();
    register_builtin(&mut registry, &config.commands.disabled)?;
    info!(commands = registry.len(), "command registry built");
    let registry = Arc::new(registry);

    // Dispatch chain.
    let mut stages: Vec<Arc<dyn DispatchStage>> = Vec::new();
    for rule in &config.dispatch {
        let mut stage = DecompressStage::new(rule.compile()?);
        if let Some(max_buffer) = rule.max_buffer {
            stage = stage.with_max_buffer(max_buffer);
        }
        stages.push(Arc::new(stage));
    }
    info!(stages = stages.len(), "dispatch chain assembled");
    let chain = Arc::new(DispatchChain::new(stages));

    // Admin router.
    let router = devport_api::build_router(ApiState {
        registry,
        env: env.clone(),
    });

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    // ── Serve ──────────────────────────────────────────────────

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let gateway = Gateway::new(addr, chain, router, env);
    gateway.serve(shutdown_rx).await?;

    info!("DevPort daemon stopped");
    Ok(())
}

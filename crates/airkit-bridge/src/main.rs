//! Airkit Bridge - metrics feed to smart-home accessory.
//!
//! Run with: `cargo run -p airkit-bridge`

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use airkit_bridge::{AccessoryInfo, AccessoryServer, Config};
use airkit_core::Bridge;

/// Airkit Bridge - polls a sensor metrics feed and publishes it as a
/// smart-home accessory.
#[derive(Parser, Debug)]
#[command(name = "airkit-bridge")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sensor host including scheme (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Sensor port (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Seconds to sleep between polls (overrides config).
    #[arg(short, long)]
    sleep: Option<u64>,

    /// Development mode: publish random temperatures instead of sensor data.
    #[arg(long)]
    dev: bool,

    /// Accessory bind address (overrides config).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("airkit_bridge=info".parse()?)
                .add_directive("airkit_core=info".parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default().unwrap_or_default(),
    };

    // Override config with CLI args
    if let Some(host) = args.host {
        config.sensor.host = host;
    }
    if let Some(port) = args.port {
        config.sensor.port = port;
    }
    if let Some(sleep) = args.sleep {
        config.sensor.poll_interval = sleep;
    }
    if args.dev {
        config.sensor.development = true;
    }
    if let Some(bind) = args.bind {
        config.accessory.bind = bind;
    }

    config.validate()?;

    run(config).await
}

async fn run(config: Config) -> anyhow::Result<()> {
    let server = AccessoryServer::new(AccessoryInfo::from(&config.accessory));
    let app = server.router();

    // The accessory transport must be serving before the first poll cycle
    // publishes into it.
    let addr: SocketAddr = config
        .accessory
        .bind
        .parse()
        .with_context(|| format!("invalid bind address {:?}", config.accessory.bind))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind accessory transport on {addr}"))?;
    info!("Accessory transport listening on {}", addr);

    let (stop_tx, stop_rx) = watch::channel(false);
    let poller = tokio::spawn(Bridge::new(config.bridge_config(), server).run(stop_rx));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stop_tx))
        .await?;

    // Cooperative stop: wait for the poller to finish its current cycle.
    // No timeout; a hung fetch holds shutdown until its own 30s deadline.
    let _ = poller.await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal(stop_tx: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for ctrl-c: {}", e);
    }
    info!("Received shutdown signal, stopping bridge");
    let _ = stop_tx.send(true);
}

// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Demonstration binary: loads gateway descriptors from a JSON registry
//! file, connects a session per descriptor, and logs every event until
//! interrupted.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use sensor_gateway::{FileRegistry, GatewayEvent, GatewayManager, GatewayManagerConfig, GatewayRegistry};

#[derive(Debug, Parser)]
#[command(name = "sensor-gatewayd", about = "Gateway connection subsystem demonstration host")]
struct Cli {
    /// Path to a JSON file containing an array of gateway descriptors.
    #[arg(long, env = "GATEWAY_REGISTRY_PATH")]
    registry: PathBuf,

    #[command(flatten)]
    config: GatewayManagerConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let registry = FileRegistry::load(&cli.registry)?;
    let manager = GatewayManager::new(cli.config);

    let mut events = manager.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            log_event(&event);
        }
    });

    for descriptor in registry.all() {
        info!(gateway_id = %descriptor.id, "connecting");
        manager.connect(descriptor);
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    manager.cleanup().await;
    Ok(())
}

fn log_event(event: &GatewayEvent) {
    match event {
        GatewayEvent::StatusChange { gateway_id, state, .. } => {
            info!(%gateway_id, ?state, "status change");
        }
        GatewayEvent::Connected { gateway_id, .. } => info!(%gateway_id, "connected"),
        GatewayEvent::Authenticated { gateway_id, .. } => info!(%gateway_id, "authenticated"),
        GatewayEvent::Disconnected { gateway_id, reason, .. } => {
            info!(%gateway_id, ?reason, "disconnected");
        }
        GatewayEvent::Error { gateway_id, error } => {
            tracing::warn!(%gateway_id, message = %error.message, code = ?error.code, "gateway error");
        }
        GatewayEvent::Message { gateway_id, envelope } => {
            tracing::debug!(%gateway_id, ty = %envelope.ty, "unrecognized message type");
        }
    }
}

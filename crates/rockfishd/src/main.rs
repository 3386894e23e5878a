//! rockfishd — Rockfish geometry service daemon.
//!
//! Composition root: owns the single ActivityLog, GeometryEngine, and
//! ServiceHost instances and wires them together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};

use rockfish_core::codec::GeometryCodec;
use rockfish_core::config::RockfishConfig;
use rockfish_server::{ActivityLog, AppState, ReferenceEngine, ServiceHost};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config
    if let Err(e) = RockfishConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let config = RockfishConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        RockfishConfig::default()
    });

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        log_policy = %config.log.policy,
        "rockfishd starting"
    );

    // Activity log
    let log = Arc::new(ActivityLog::new(config.log.policy));
    if log.start() {
        tracing::info!("activity log started");
    } else {
        tracing::info!("activity logging disabled");
    }

    // Service host
    let state = AppState {
        engine: Arc::new(ReferenceEngine),
        log: log.clone(),
        codec: Arc::new(GeometryCodec::new()),
        display_name: config.server.display_name.clone(),
        verbose_faults: true,
    };
    let bind_addr: SocketAddr = format!("0.0.0.0:{}", config.server.port)
        .parse()
        .context("invalid service port")?;
    let host = ServiceHost::new(bind_addr, state);
    host.start().await?;

    tokio::signal::ctrl_c().await.ok();
    tracing::info!("shutdown signal received");

    host.stop().await;
    log.stop().await;
    // Final drain so headers from the last five seconds are not lost.
    log.flush();

    Ok(())
}

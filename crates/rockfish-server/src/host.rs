//! Service host lifecycle.
//!
//! `Stopped` → `start()` → `Running` → `stop()` → `Stopped`. Start runs a
//! fixed sequence — listener, endpoint, fault detail, open — and any
//! step's failure rolls the host back to `Stopped` with a readable cause;
//! the host is never left half-open.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::service::{self, AppState};

struct Running {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

pub struct ServiceHost {
    bind_addr: SocketAddr,
    state: AppState,
    running: tokio::sync::Mutex<Option<Running>>,
}

impl ServiceHost {
    pub fn new(bind_addr: SocketAddr, state: AppState) -> Self {
        Self {
            bind_addr,
            state,
            running: tokio::sync::Mutex::new(None),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.running.lock().await.is_some()
    }

    /// Address the listener actually bound, once running. Useful when the
    /// host was configured with port 0.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.local_addr)
    }

    /// Start the service. Starting a running host is a success no-op.
    pub async fn start(&self) -> Result<()> {
        let mut running = self.running.lock().await;
        if running.is_some() {
            tracing::info!("Rockfish service already running");
            return Ok(());
        }

        // Listener first; nothing to roll back if this fails.
        let listener = TcpListener::bind(self.bind_addr)
            .await
            .context("Failed to create Rockfish service listener")?;
        let local_addr = listener
            .local_addr()
            .context("Failed to resolve Rockfish service address")?;

        // Endpoint with the message-size cap baked into the binding.
        let app = service::router(self.state.clone());
        tracing::debug!(
            verbose_faults = self.state.verbose_faults,
            "service endpoint created"
        );

        // Open.
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.changed().await;
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                tracing::error!(error = %e, "Rockfish service loop failed");
            }
        });

        *running = Some(Running {
            local_addr,
            shutdown_tx,
            task,
        });
        tracing::info!(addr = %local_addr, "Rockfish service started");
        Ok(())
    }

    /// Stop the service. Graceful shutdown falls back to aborting the
    /// serve task; the host always lands in `Stopped`.
    pub async fn stop(&self) {
        let mut running = self.running.lock().await;
        if let Some(Running {
            shutdown_tx,
            mut task,
            ..
        }) = running.take()
        {
            let _ = shutdown_tx.send(true);
            if tokio::time::timeout(Duration::from_secs(5), &mut task)
                .await
                .is_err()
            {
                task.abort();
            }
            tracing::info!("Rockfish service stopped");
        }
    }
}

//! Rockfish end-to-end test harness.
//!
//! Each test starts its own service host on an ephemeral loopback port
//! with an activity log rooted in a private temp directory, so tests can
//! run in parallel without sharing files or ports.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rockfish_client::Channel;
use rockfish_core::codec::GeometryCodec;
use rockfish_server::{ActivityLog, AppState, ReferenceEngine, ServiceHost};

pub use rockfish_core::config::LogPolicy;

mod activity;
mod echo;
mod faults;
mod session;

pub const DISPLAY_NAME: &str = "test-host";

static NEXT_ROOT: AtomicUsize = AtomicUsize::new(0);

pub struct TestServer {
    pub host: ServiceHost,
    pub addr: SocketAddr,
    pub log: Arc<ActivityLog>,
    pub log_root: PathBuf,
}

impl TestServer {
    /// Channel already connected to this server.
    pub fn connect(&self) -> Channel {
        let channel = Channel::new("test-client");
        assert!(channel.create(&self.addr.to_string()).unwrap());
        channel
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.log_root);
    }
}

/// Start a host on 127.0.0.1:0 with the given log policy.
pub async fn start_server(policy: LogPolicy) -> TestServer {
    let n = NEXT_ROOT.fetch_add(1, Ordering::Relaxed);
    let log_root = std::env::temp_dir().join(format!(
        "rockfish-integration-{}-{n}",
        std::process::id()
    ));
    let log = Arc::new(ActivityLog::with_root(policy, log_root.clone()));

    let state = AppState {
        engine: Arc::new(ReferenceEngine),
        log: log.clone(),
        codec: Arc::new(GeometryCodec::new()),
        display_name: DISPLAY_NAME.to_string(),
        verbose_faults: true,
    };
    let host = ServiceHost::new("127.0.0.1:0".parse().unwrap(), state);
    host.start().await.expect("host should start");
    let addr = host.local_addr().await.expect("host should be running");

    TestServer {
        host,
        addr,
        log,
        log_root,
    }
}

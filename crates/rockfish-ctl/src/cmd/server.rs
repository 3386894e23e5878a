//! Server selection and log-policy configuration.

use std::net::ToSocketAddrs;

use anyhow::{Context, Result};

use rockfish_client::Channel;
use rockfish_core::config::{LogPolicy, RockfishConfig};

/// Probe attempts before giving up on a candidate host.
const PROBE_ATTEMPTS: usize = 3;

/// Verify a candidate host answers Echo, then persist it.
pub async fn set_server(host: &str) -> Result<()> {
    let host = host.trim();
    if host.is_empty() {
        anyhow::bail!("Server host name or IP address cannot be empty.");
    }

    let mut config = RockfishConfig::load().unwrap_or_default();

    let probe_addr = format!("{}:{}", host, config.server.port);
    if probe_addr.to_socket_addrs().is_err() {
        anyhow::bail!("Unable to resolve host name \"{host}\".");
    }

    let mut found = false;
    for attempt in 1..=PROBE_ATTEMPTS {
        let channel = Channel::new(config.client.client_id.clone());
        if !channel.create(&probe_addr)? {
            break;
        }
        match channel.echo("Echo").await {
            Ok(Some(_)) => {
                found = true;
                break;
            }
            Ok(None) => {}
            Err(e) => println!("Attempt {attempt}/{PROBE_ATTEMPTS}: {e}"),
        }
        channel.dispose();
    }

    if !found {
        anyhow::bail!("Unable to connect to server \"{host}\".");
    }

    config.server.host = host.to_string();
    let path = config.save().context("failed to persist server host")?;
    println!("Server set to \"{host}\" ({})", path.display());
    Ok(())
}

/// Persist the activity-log rotation policy, picked up at daemon start.
pub fn set_log_policy(policy: &str) -> Result<()> {
    let policy: LogPolicy = policy
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let mut config = RockfishConfig::load().unwrap_or_default();
    config.log.policy = policy;
    let path = config.save().context("failed to persist log policy")?;
    println!("Log policy set to {policy} ({})", path.display());
    Ok(())
}

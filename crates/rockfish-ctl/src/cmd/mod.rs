pub mod echo;
pub mod geometry;
pub mod server;

use anyhow::{Context, Result};
use rockfish_client::Channel;
use rockfish_core::config::RockfishConfig;

/// Channel connected to the configured server. One channel per command
/// invocation; a failed call tears it down and the next command builds a
/// fresh one.
pub fn open_channel() -> Result<(Channel, RockfishConfig)> {
    let config = RockfishConfig::load().unwrap_or_default();
    let channel = Channel::new(config.client.client_id.clone());
    let host = format!("{}:{}", config.server.host, config.server.port);
    if !channel.create(&host).context("channel creation failed")? {
        anyhow::bail!("No server host configured. Run `rockfish-ctl set-server <host>` first.");
    }
    Ok((channel, config))
}

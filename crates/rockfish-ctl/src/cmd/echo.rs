//! Echo command — the service health check.

use anyhow::Result;

pub async fn run(text: &str) -> Result<()> {
    let (channel, _) = super::open_channel()?;
    match channel.echo(text).await? {
        Some(reply) => println!("{reply}"),
        None => println!("No reply (channel not connected)."),
    }
    Ok(())
}

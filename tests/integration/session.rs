use crate::*;

use std::sync::Arc;

#[tokio::test]
async fn dispose_races_an_in_flight_call_safely() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = Arc::new(server.connect());

    let caller = {
        let channel = channel.clone();
        tokio::spawn(async move { channel.echo("racing").await })
    };
    channel.dispose();

    // Whatever the interleaving, the call either completed before the
    // dispose or failed cleanly — it must not panic or hang.
    let result = caller.await.expect("call task must not panic");
    match result {
        Ok(_) => {}
        Err(e) => assert!(!e.to_string().is_empty()),
    }
    assert!(!channel.is_valid());

    server.host.stop().await;
}

#[tokio::test]
async fn fresh_channel_performs_no_network_io() {
    // No server at all: if any of these touched the network they would
    // error rather than return the operation's empty result.
    let channel = rockfish_client::Channel::new("test-client");
    assert!(!channel.is_valid());
    assert_eq!(channel.echo("ping").await.unwrap(), None);
}

#[tokio::test]
async fn one_channel_per_command_supports_sequential_reconnects() {
    let server = start_server(LogPolicy::Disabled).await;

    for i in 0..3 {
        let channel = server.connect();
        let reply = channel.echo(&format!("call {i}")).await.unwrap();
        assert!(reply.unwrap().contains(&format!("call {i}")));
        channel.dispose();
    }

    server.host.stop().await;
}

use crate::*;

use rockfish_core::header::RequestHeader;

#[tokio::test]
async fn headers_flush_in_call_completion_order() {
    let server = start_server(LogPolicy::Daily).await;
    let channel = server.connect();

    channel.echo("one").await.unwrap();
    channel.echo("two").await.unwrap();
    assert_eq!(server.log.pending(), 2);

    assert!(server.log.flush());
    assert_eq!(server.log.pending(), 0);

    let file = std::fs::read_dir(&server.log_root)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let text = std::fs::read_to_string(file).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], RequestHeader::CSV_HEADING);
    assert!(lines[1].contains("Echo"));
    assert!(lines[2].contains("Echo"));

    server.host.stop().await;
}

#[tokio::test]
async fn disabled_policy_logs_nothing() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    channel.echo("ping").await.unwrap();
    assert_eq!(server.log.pending(), 0);
    assert!(!server.log.flush());
    assert!(!server.log_root.exists());

    server.host.stop().await;
}

#[tokio::test]
async fn periodic_timer_flushes_without_manual_intervention() {
    let server = start_server(LogPolicy::Daily).await;
    assert!(server.log.start());

    let channel = server.connect();
    channel.echo("ping").await.unwrap();

    // The first interval tick fires immediately after the enqueued call;
    // poll briefly rather than sleeping a full period.
    let mut flushed = false;
    for _ in 0..50 {
        if server.log.pending() == 0 && server.log_root.exists() {
            flushed = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
    assert!(flushed, "timer never flushed the queue");

    server.log.stop().await;
    server.host.stop().await;
}

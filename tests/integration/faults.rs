use crate::*;

use rockfish_core::codec::GeometryPayload;
use rockfish_core::error::ErrorKind;
use rockfish_core::geometry::{box_brep, Curve, Geometry, Point3};
use rockfish_core::wire;

#[tokio::test]
async fn fault_message_passes_through_verbatim() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    // A curve is not a solid; the engine refuses it with "Brep is null".
    let curve = channel.encode(&Geometry::Curve(Curve {
        points: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
    }));
    let brep = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));

    let err = channel
        .intersect_geometry(&curve, &brep, 0.01)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Fault);
    assert_eq!(err.to_string(), "Brep is null");

    // A failed call invalidates the channel; the caller must reconnect.
    assert!(!channel.is_valid());
    assert_eq!(channel.echo("after").await.unwrap(), None);

    server.host.stop().await;
}

#[tokio::test]
async fn engine_failure_is_a_descriptive_fault_and_logged_as_failed() {
    let server = start_server(LogPolicy::Daily).await;
    let channel = server.connect();

    // All points collapse under min_distance, so the engine cannot build
    // a polyline.
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.01, 0.0, 0.0),
        Point3::new(0.02, 0.0, 0.0),
    ];
    let err = channel
        .polyline_from_points(&points, 10.0)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Fault);
    assert_eq!(err.to_string(), "Not enough points to create a polyline");

    // The header still reaches the log, marked unsuccessful.
    assert_eq!(server.log.pending(), 1);
    assert!(server.log.flush());
    let file = std::fs::read_dir(&server.log_root)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let text = std::fs::read_to_string(file).unwrap();
    assert!(text.contains(",PolylineFromPoints,test-client,false"));

    server.host.stop().await;
}

#[tokio::test]
async fn missing_header_is_rejected_with_a_protocol_fault() {
    let server = start_server(LogPolicy::Daily).await;

    let url = format!(
        "{}{}",
        wire::endpoint_url("127.0.0.1", server.addr.port()),
        "/echo"
    );
    let response = reqwest::Client::new()
        .post(&url)
        .json(&serde_json::json!({ "header": null, "text": "ping" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let fault: serde_json::Value = response.json().await.unwrap();
    assert_eq!(fault["fault"], "Request header is missing.");

    // Nothing to log: there was no header to enqueue.
    assert_eq!(server.log.pending(), 0);

    server.host.stop().await;
}

#[tokio::test]
async fn empty_payload_short_circuits_with_no_traffic_and_no_log_rows() {
    let server = start_server(LogPolicy::Daily).await;
    let channel = server.connect();

    let brep = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));
    let curves = channel
        .intersect_geometry(&GeometryPayload::empty(), &brep, 0.01)
        .await
        .unwrap();

    assert!(curves.is_empty());
    assert!(channel.is_valid(), "short-circuit must not dispose");
    assert_eq!(server.log.pending(), 0, "no header may reach the server");

    server.host.stop().await;
}

#[tokio::test]
async fn stopped_server_surfaces_a_communication_error() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();
    server.host.stop().await;

    let err = channel.echo("ping").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Communication);
    assert_eq!(
        err.to_string(),
        "There was a problem communicating with the service."
    );
    assert!(!channel.is_valid());
}

#[tokio::test]
async fn oversized_request_fails_the_call_instead_of_truncating() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    // A mesh comfortably past the 4 MiB message cap once hex-encoded.
    let n = 120_000_u32;
    let vertices: Vec<Point3> = (0..n)
        .map(|i| Point3::new(i as f64, i as f64 * 0.5, i as f64 * 0.25))
        .collect();
    let faces: Vec<[u32; 3]> = (0..n - 2).map(|i| [i, i + 1, i + 2]).collect();
    let big = channel.encode(&Geometry::Mesh(rockfish_core::geometry::Mesh {
        vertices,
        faces,
    }));
    assert!(big.bytes.len() > wire::MAX_BUFFER);

    let err = channel.mesh_from_geometry(&big, false).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Communication);

    server.host.stop().await;
}

#[tokio::test]
async fn oversized_response_fails_the_call_instead_of_truncating() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    // A brep that fits comfortably under the cap on the way out; smoothing
    // triples its faces and the hex encoding doubles the rest, pushing the
    // reply well past 4 MiB.
    let n = 25_000_u32;
    let vertices: Vec<Point3> = (0..n)
        .map(|i| Point3::new(i as f64, i as f64 * 0.5, i as f64 * 0.25))
        .collect();
    let faces: Vec<[u32; 3]> = (0..n - 2).map(|i| [i, i + 1, i + 2]).collect();
    let brep = channel.encode(&Geometry::Brep(rockfish_core::geometry::Brep {
        vertices,
        faces,
    }));
    assert!(
        brep.bytes.len() * 2 < wire::MAX_BUFFER,
        "request must stay under the cap so only the reply can trip it"
    );

    let err = channel.mesh_from_geometry(&brep, true).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Communication);
    assert!(!channel.is_valid());

    server.host.stop().await;
}

use crate::*;

use rockfish_core::geometry::{box_brep, Geometry, GeometryKind, Point3};

#[tokio::test]
async fn echo_round_trip_stamps_and_logs_the_call() {
    let server = start_server(LogPolicy::Daily).await;
    let channel = server.connect();

    let reply = channel.echo("ping").await.unwrap();
    assert_eq!(reply.as_deref(), Some("Echo from \"test-host\" : ping"));

    // Exactly one header, stamped with the actual method name and marked
    // successful, reaches the log.
    assert_eq!(server.log.pending(), 1);
    assert!(server.log.flush());

    let file = std::fs::read_dir(&server.log_root)
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let text = std::fs::read_to_string(file).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].contains(",Echo,test-client,true"));

    server.host.stop().await;
}

#[tokio::test]
async fn intersect_round_trip_returns_decoded_curves() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    let a = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));
    let b = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.5, 0.5, 0.5), 1.0)));
    let curves = channel.intersect_geometry(&a, &b, 0.01).await.unwrap();

    assert_eq!(curves.len(), 1);
    assert_eq!(curves[0].kind(), GeometryKind::Curve);
    assert!(curves[0].is_valid());

    server.host.stop().await;
}

#[tokio::test]
async fn disjoint_solids_intersect_to_an_empty_set() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    let a = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));
    let b = channel.encode(&Geometry::Brep(box_brep(Point3::new(10.0, 0.0, 0.0), 1.0)));
    let curves = channel.intersect_geometry(&a, &b, 0.01).await.unwrap();
    assert!(curves.is_empty());

    server.host.stop().await;
}

#[tokio::test]
async fn polyline_round_trip_filters_close_points() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.05, 0.0, 0.0), // within min_distance of the first
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    let result = channel.polyline_from_points(&points, 0.1).await.unwrap();
    match result {
        Some(Geometry::Curve(c)) => assert_eq!(c.points.len(), 3),
        other => panic!("expected a curve, got {other:?}"),
    }

    server.host.stop().await;
}

#[tokio::test]
async fn mesh_round_trip_produces_a_valid_mesh() {
    let server = start_server(LogPolicy::Disabled).await;
    let channel = server.connect();

    let brep = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));

    let coarse = channel.mesh_from_geometry(&brep, false).await.unwrap();
    let smooth = channel.mesh_from_geometry(&brep, true).await.unwrap();
    let (Some(Geometry::Mesh(coarse)), Some(Geometry::Mesh(smooth))) = (coarse, smooth) else {
        panic!("expected meshes");
    };
    assert!(coarse.is_valid());
    assert!(smooth.is_valid());
    assert!(smooth.faces.len() > coarse.faces.len());

    server.host.stop().await;
}

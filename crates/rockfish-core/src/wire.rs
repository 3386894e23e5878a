//! Rockfish wire contract — operation DTOs and endpoint addressing.
//!
//! One HTTP binding carries the whole service contract. Each operation is
//! a POST of a JSON request body to the binding path plus the operation
//! segment, answered with a JSON response body or a `Fault`.

use serde::{Deserialize, Serialize};

use crate::codec::GeometryPayload;
use crate::geometry::Point3;
use crate::header::RequestHeader;

/// Maximum message size in either direction, in bytes.
/// Payloads beyond this fail the call rather than truncate.
pub const MAX_BUFFER: usize = 4 * 1024 * 1024;

/// Default service port.
pub const SERVICE_PORT: u16 = 8000;

/// Path the service binding mounts under.
pub const BASE_PATH: &str = "/mcneel/rockfish/5/server/basic";

/// Operation names as stamped into request headers and route segments.
pub const OP_ECHO: &str = "Echo";
pub const OP_INTERSECT: &str = "IntersectGeometry";
pub const OP_POLYLINE: &str = "PolylineFromPoints";
pub const OP_MESH: &str = "MeshFromGeometry";

/// Full URL of the service binding on a given host.
pub fn endpoint_url(host: &str, port: u16) -> String {
    format!("http://{host}:{port}{BASE_PATH}")
}

/// Route segment for an operation, e.g. `/echo`.
pub fn route_segment(op: &str) -> &'static str {
    match op {
        OP_ECHO => "/echo",
        OP_INTERSECT => "/intersect",
        OP_POLYLINE => "/polyline",
        OP_MESH => "/mesh",
        _ => "/unknown",
    }
}

// ── Requests ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoRequest {
    pub header: Option<RequestHeader>,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntersectRequest {
    pub header: Option<RequestHeader>,
    pub a: GeometryPayload,
    pub b: GeometryPayload,
    pub tolerance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolylineRequest {
    pub header: Option<RequestHeader>,
    pub points: Vec<Point3>,
    pub min_distance: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeshRequest {
    pub header: Option<RequestHeader>,
    pub geometry: GeometryPayload,
    pub smooth: bool,
}

// ── Responses ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct EchoResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IntersectResponse {
    pub curves: Vec<GeometryPayload>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PolylineResponse {
    pub curve: GeometryPayload,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeshResponse {
    pub mesh: GeometryPayload,
}

/// Structured application-level error, distinct from a transport failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Fault {
    pub fault: String,
}

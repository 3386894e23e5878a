//! Per-call dispatch for the Rockfish service contract.
//!
//! Every handler follows the same discipline: reject a missing header
//! with a protocol fault, stamp the actual operation name, run the
//! engine, and enqueue the header into the activity log exactly once on
//! scope exit — success or fault.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};

use rockfish_core::codec::GeometryCodec;
use rockfish_core::header::RequestHeader;
use rockfish_core::wire::{
    self, EchoRequest, EchoResponse, Fault, IntersectRequest, IntersectResponse, MeshRequest,
    MeshResponse, PolylineRequest, PolylineResponse,
};

use crate::engine::GeometryEngine;
use crate::log::ActivityLog;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn GeometryEngine>,
    pub log: Arc<ActivityLog>,
    pub codec: Arc<GeometryCodec>,
    /// Name reported in Echo replies.
    pub display_name: String,
    /// When set, fault messages carry engine detail instead of a generic
    /// failure line.
    pub verbose_faults: bool,
}

/// Router for the service binding, body-capped at the wire limit.
pub fn router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/echo", post(handle_echo))
        .route("/intersect", post(handle_intersect))
        .route("/polyline", post(handle_polyline))
        .route("/mesh", post(handle_mesh))
        .layer(DefaultBodyLimit::max(wire::MAX_BUFFER))
        .with_state(state);
    Router::new().nest(wire::BASE_PATH, ops)
}

fn fault(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(Fault {
            fault: message.to_string(),
        }),
    )
        .into_response()
}

/// Enqueues its header into the activity log when dropped, whichever way
/// the handler exits. Logging failures never reach the RPC result.
struct CallRecord {
    header: Option<RequestHeader>,
    log: Arc<ActivityLog>,
}

impl CallRecord {
    fn new(log: Arc<ActivityLog>, mut header: RequestHeader, method: &str) -> Self {
        header.method = method.to_string();
        Self {
            header: Some(header),
            log,
        }
    }

    fn succeed(&mut self) {
        if let Some(header) = &mut self.header {
            header.succeeded = true;
        }
    }
}

impl Drop for CallRecord {
    fn drop(&mut self) {
        if let Some(header) = self.header.take() {
            self.log.enqueue(header);
        }
    }
}

fn engine_fault(state: &AppState, error: &anyhow::Error) -> Response {
    if state.verbose_faults {
        fault(&error.to_string())
    } else {
        fault("The service operation failed.")
    }
}

const MISSING_HEADER: &str = "Request header is missing.";

// ── Handlers ─────────────────────────────────────────────────────────────────

pub async fn handle_echo(State(state): State<AppState>, Json(req): Json<EchoRequest>) -> Response {
    let Some(header) = req.header else {
        return fault(MISSING_HEADER);
    };
    let mut record = CallRecord::new(state.log.clone(), header, wire::OP_ECHO);

    tracing::info!(text = %req.text, "Echo request received");
    let text = format!("Echo from \"{}\" : {}", state.display_name, req.text);
    record.succeed();
    Json(EchoResponse { text }).into_response()
}

pub async fn handle_intersect(
    State(state): State<AppState>,
    Json(req): Json<IntersectRequest>,
) -> Response {
    let Some(header) = req.header else {
        return fault(MISSING_HEADER);
    };
    let mut record = CallRecord::new(state.log.clone(), header, wire::OP_INTERSECT);

    tracing::info!("IntersectGeometry request received");
    let Some(a) = state.codec.decode(&req.a.bytes) else {
        return fault("Brep is null");
    };
    let Some(b) = state.codec.decode(&req.b.bytes) else {
        return fault("Brep is null");
    };

    match state.engine.intersect(&a, &b, req.tolerance) {
        Ok(curves) => {
            let curves = curves.iter().map(|g| state.codec.encode(g)).collect();
            record.succeed();
            Json(IntersectResponse { curves }).into_response()
        }
        Err(e) => engine_fault(&state, &e),
    }
}

pub async fn handle_polyline(
    State(state): State<AppState>,
    Json(req): Json<PolylineRequest>,
) -> Response {
    let Some(header) = req.header else {
        return fault(MISSING_HEADER);
    };
    let mut record = CallRecord::new(state.log.clone(), header, wire::OP_POLYLINE);

    tracing::info!(points = req.points.len(), "PolylineFromPoints request received");
    if req.points.is_empty() {
        return fault("Point array is null or empty.");
    }

    match state
        .engine
        .polyline_from_points(&req.points, req.min_distance)
    {
        Ok(curve) => {
            let curve = state.codec.encode(&curve);
            record.succeed();
            Json(PolylineResponse { curve }).into_response()
        }
        Err(e) => engine_fault(&state, &e),
    }
}

pub async fn handle_mesh(State(state): State<AppState>, Json(req): Json<MeshRequest>) -> Response {
    let Some(header) = req.header else {
        return fault(MISSING_HEADER);
    };
    let mut record = CallRecord::new(state.log.clone(), header, wire::OP_MESH);

    tracing::info!(smooth = req.smooth, "MeshFromGeometry request received");
    let Some(geometry) = state.codec.decode(&req.geometry.bytes) else {
        return fault("Brep is null");
    };

    match state.engine.mesh(&geometry, req.smooth) {
        Ok(mesh) => {
            let mesh = state.codec.encode(&mesh);
            record.succeed();
            Json(MeshResponse { mesh }).into_response()
        }
        Err(e) => engine_fault(&state, &e),
    }
}

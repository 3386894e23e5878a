//! Client-side channel.
//!
//! A channel owns one connection to the service binding and walks
//! `Unconnected → Connected → Disposed`. Disposed is terminal: a disposed
//! channel answers "not valid" instead of retrying. Every typed call
//! validates its inputs locally first, returns the operation's empty
//! result when the channel is not connected, and on any transport or
//! fault failure classifies the error, tears the channel down, and
//! propagates — reconnecting is the caller's job.

use std::sync::Mutex;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use rockfish_core::codec::{GeometryCodec, GeometryPayload};
use rockfish_core::error::ChannelError;
use rockfish_core::geometry::{Geometry, Point3};
use rockfish_core::header::RequestHeader;
use rockfish_core::wire::{
    self, EchoRequest, EchoResponse, Fault, IntersectRequest, IntersectResponse, MeshRequest,
    MeshResponse, PolylineRequest, PolylineResponse,
};

/// Per-call transport timeout.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

enum State {
    Unconnected,
    Connected(Conn),
    Disposed,
}

#[derive(Clone)]
struct Conn {
    http: reqwest::Client,
    base_url: String,
}

pub struct Channel {
    state: Mutex<State>,
    client_id: String,
    codec: GeometryCodec,
}

impl Channel {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(State::Unconnected),
            client_id: client_id.into(),
            codec: GeometryCodec::new(),
        }
    }

    /// Connect to a host, given as `name` or `name:port`.
    ///
    /// Returns Ok(false) without transitioning when the host is empty or
    /// malformed, or when the channel is already disposed. A transport
    /// construction failure
    /// tears the channel down and surfaces a creation error.
    pub fn create(&self, host: &str) -> Result<bool, ChannelError> {
        let host = host.trim();
        if host.is_empty() {
            return Ok(false);
        }

        let mut state = self.state.lock().unwrap();
        if matches!(*state, State::Disposed) {
            return Ok(false);
        }

        // `name:port` with anything else around the colon (bad port,
        // empty name, raw IPv6 literal) is malformed, not a host to try.
        let (name, port) = match host.rsplit_once(':') {
            Some((name, port)) => match port.parse::<u16>() {
                Ok(port) if !name.is_empty() && !name.contains(':') => (name, port),
                _ => return Ok(false),
            },
            None => (host, wire::SERVICE_PORT),
        };

        let http = match reqwest::Client::builder().timeout(CALL_TIMEOUT).build() {
            Ok(http) => http,
            Err(e) => {
                tracing::debug!(error = %e, "channel construction failed");
                *state = State::Disposed;
                return Err(ChannelError::creation());
            }
        };

        *state = State::Connected(Conn {
            http,
            base_url: wire::endpoint_url(name, port),
        });
        Ok(true)
    }

    /// True while the channel is connected and not disposed.
    pub fn is_valid(&self) -> bool {
        matches!(*self.state.lock().unwrap(), State::Connected(_))
    }

    /// Tear the channel down. Idempotent; safe to race with an in-flight
    /// call, which holds its own handle to the connection and fails on
    /// its own terms.
    pub fn dispose(&self) {
        let mut state = self.state.lock().unwrap();
        if !matches!(*state, State::Disposed) {
            // Dropping the connection closes it; there is nothing further
            // to abort at this layer.
            *state = State::Disposed;
        }
    }

    /// Simple test to see if the service is operational.
    pub async fn echo(&self, text: &str) -> Result<Option<String>, ChannelError> {
        let Some(conn) = self.snapshot() else {
            return Ok(None);
        };
        let request = EchoRequest {
            header: Some(RequestHeader::new(&self.client_id)),
            text: text.to_string(),
        };
        let response: EchoResponse = self.post(&conn, wire::OP_ECHO, &request).await?;
        Ok(Some(response.text))
    }

    /// Intersect two solids; returns the decoded intersection curves.
    /// Either payload being empty short-circuits to an empty result with
    /// no network traffic.
    pub async fn intersect_geometry(
        &self,
        a: &GeometryPayload,
        b: &GeometryPayload,
        tolerance: f64,
    ) -> Result<Vec<Geometry>, ChannelError> {
        if a.is_empty() || b.is_empty() {
            return Ok(Vec::new());
        }
        let Some(conn) = self.snapshot() else {
            return Ok(Vec::new());
        };
        let request = IntersectRequest {
            header: Some(RequestHeader::new(&self.client_id)),
            a: a.clone(),
            b: b.clone(),
            tolerance,
        };
        let response: IntersectResponse = self.post(&conn, wire::OP_INTERSECT, &request).await?;
        Ok(response
            .curves
            .iter()
            .filter_map(|p| self.codec.decode(&p.bytes))
            .collect())
    }

    /// Build a polyline from points, dropping points closer than
    /// `min_distance`. An empty point list short-circuits to None.
    pub async fn polyline_from_points(
        &self,
        points: &[Point3],
        min_distance: f64,
    ) -> Result<Option<Geometry>, ChannelError> {
        if points.is_empty() {
            return Ok(None);
        }
        let Some(conn) = self.snapshot() else {
            return Ok(None);
        };
        let request = PolylineRequest {
            header: Some(RequestHeader::new(&self.client_id)),
            points: points.to_vec(),
            min_distance,
        };
        let response: PolylineResponse = self.post(&conn, wire::OP_POLYLINE, &request).await?;
        Ok(self.codec.decode(&response.curve.bytes))
    }

    /// Mesh a solid. An empty payload short-circuits to None.
    pub async fn mesh_from_geometry(
        &self,
        geometry: &GeometryPayload,
        smooth: bool,
    ) -> Result<Option<Geometry>, ChannelError> {
        if geometry.is_empty() {
            return Ok(None);
        }
        let Some(conn) = self.snapshot() else {
            return Ok(None);
        };
        let request = MeshRequest {
            header: Some(RequestHeader::new(&self.client_id)),
            geometry: geometry.clone(),
            smooth,
        };
        let response: MeshResponse = self.post(&conn, wire::OP_MESH, &request).await?;
        Ok(self.codec.decode(&response.mesh.bytes))
    }

    /// Encode local geometry for transport with this channel's codec.
    pub fn encode(&self, geometry: &Geometry) -> GeometryPayload {
        self.codec.encode(geometry)
    }

    fn snapshot(&self) -> Option<Conn> {
        match &*self.state.lock().unwrap() {
            State::Connected(conn) => Some(conn.clone()),
            _ => None,
        }
    }

    /// One request/response round trip. Any failure disposes the channel
    /// before the classified error is returned.
    async fn post<Req, Resp>(&self, conn: &Conn, op: &str, request: &Req) -> Result<Resp, ChannelError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", conn.base_url, wire::route_segment(op));
        match self.round_trip(conn, &url, request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                tracing::debug!(op, error = %e, "call failed, disposing channel");
                self.dispose();
                Err(e)
            }
        }
    }

    async fn round_trip<Req, Resp>(
        &self,
        conn: &Conn,
        url: &str,
        request: &Req,
    ) -> Result<Resp, ChannelError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let response = conn
            .http
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        if response.status().is_success() {
            // The message cap applies to received bodies as well as sent
            // ones; check before handing the bytes to the deserializer.
            let body = response.bytes().await.map_err(classify)?;
            if body.len() > wire::MAX_BUFFER {
                return Err(ChannelError::communication());
            }
            serde_json::from_slice(&body).map_err(|_| ChannelError::unknown())
        } else {
            // An application fault carries a structured body; anything
            // else (size cap, proxy error) is a communication failure.
            match response.json::<Fault>().await {
                Ok(fault) => Err(ChannelError::fault(fault.fault)),
                Err(_) => Err(ChannelError::communication()),
            }
        }
    }
}

fn classify(e: reqwest::Error) -> ChannelError {
    if e.is_timeout() {
        ChannelError::timeout()
    } else if e.is_connect() || e.is_request() {
        ChannelError::communication()
    } else {
        ChannelError::unknown()
    }
}

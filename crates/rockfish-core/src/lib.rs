//! rockfish-core — shared types for the Rockfish geometry RPC service.
//!
//! Everything that crosses the wire lives here: the geometry transport
//! envelope and its codec, the per-call request header, the operation
//! DTOs, the client-observed error taxonomy, and the persisted
//! configuration surface.

pub mod codec;
pub mod config;
pub mod error;
pub mod geometry;
pub mod header;
pub mod wire;

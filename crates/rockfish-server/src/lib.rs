//! rockfish-server — service host, dispatch, engine seam, activity log.

pub mod engine;
pub mod host;
pub mod log;
pub mod service;

pub use engine::{GeometryEngine, ReferenceEngine};
pub use host::ServiceHost;
pub use log::ActivityLog;
pub use service::AppState;

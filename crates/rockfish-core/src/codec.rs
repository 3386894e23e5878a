//! Geometry transport codec.
//!
//! `encode` wraps a geometry value in a self-describing envelope that
//! embeds the value's short type name. `decode` resolves that name against
//! a local type registry — never against any fixed module identity — so
//! the two ends of a call may link different builds of the geometry
//! library and still interoperate. Unknown names fail closed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Brep, Curve, Extrusion, Geometry, GeometryKind, Mesh};

/// Opaque transport envelope for one geometry value.
///
/// `bytes` is either empty (construction failed, callers treat this as
/// "no payload") or a serialized envelope that round-trips to the same
/// kind. The `kind` field is a convenience for the producer; consumers
/// re-derive the kind from the decoded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPayload {
    pub kind: GeometryKind,
    #[serde(with = "hex_bytes")]
    pub bytes: Vec<u8>,
}

impl GeometryPayload {
    pub fn empty() -> Self {
        Self {
            kind: GeometryKind::Unknown,
            bytes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Payload bytes travel as hex text inside the JSON body.
mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(de)?;
        hex::decode(&text).map_err(serde::de::Error::custom)
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope {
    type_name: String,
    body: serde_json::Value,
}

type DecodeFn = fn(&serde_json::Value) -> Option<Geometry>;

/// Name → decoder table, populated at startup.
///
/// Replaces the origin-assembly binding the source relied on: decode
/// resolves the declared short type name against whatever geometry
/// implementation is loaded locally, and returns None when there is no
/// match.
pub struct TypeRegistry {
    decoders: HashMap<&'static str, DecodeFn>,
}

impl TypeRegistry {
    pub fn empty() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Registry covering the built-in geometry types.
    pub fn with_builtin() -> Self {
        let mut reg = Self::empty();
        reg.register("Curve", |body| {
            serde_json::from_value::<Curve>(body.clone())
                .ok()
                .map(Geometry::Curve)
        });
        reg.register("Brep", |body| {
            serde_json::from_value::<Brep>(body.clone())
                .ok()
                .map(Geometry::Brep)
        });
        reg.register("Extrusion", |body| {
            serde_json::from_value::<Extrusion>(body.clone())
                .ok()
                .map(Geometry::Extrusion)
        });
        reg.register("Mesh", |body| {
            serde_json::from_value::<Mesh>(body.clone())
                .ok()
                .map(Geometry::Mesh)
        });
        reg
    }

    pub fn register(&mut self, name: &'static str, decoder: DecodeFn) {
        self.decoders.insert(name, decoder);
    }

    fn resolve(&self, name: &str) -> Option<&DecodeFn> {
        self.decoders.get(name)
    }
}

/// Serializes and deserializes geometry values for transport.
pub struct GeometryCodec {
    registry: TypeRegistry,
}

impl Default for GeometryCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryCodec {
    pub fn new() -> Self {
        Self {
            registry: TypeRegistry::with_builtin(),
        }
    }

    pub fn with_registry(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    /// Encode a geometry value. Never fails: on internal serialization
    /// failure the returned payload has empty bytes and the caller must
    /// treat it as "no payload".
    pub fn encode(&self, geometry: &Geometry) -> GeometryPayload {
        let body = match geometry {
            Geometry::Curve(c) => serde_json::to_value(c),
            Geometry::Brep(b) => serde_json::to_value(b),
            Geometry::Extrusion(e) => serde_json::to_value(e),
            Geometry::Mesh(m) => serde_json::to_value(m),
        };
        let body = match body {
            Ok(v) => v,
            Err(_) => return GeometryPayload::empty(),
        };
        let envelope = Envelope {
            type_name: geometry.type_name().to_string(),
            body,
        };
        match serde_json::to_vec(&envelope) {
            Ok(bytes) => GeometryPayload {
                kind: geometry.kind(),
                bytes,
            },
            Err(_) => GeometryPayload::empty(),
        }
    }

    /// Decode payload bytes back into a geometry value.
    ///
    /// Returns None when the input is empty, the envelope does not parse,
    /// the type name has no local decoder, or the reconstructed value
    /// fails its validity check.
    pub fn decode(&self, bytes: &[u8]) -> Option<Geometry> {
        if bytes.is_empty() {
            return None;
        }
        let envelope: Envelope = serde_json::from_slice(bytes).ok()?;
        let decoder = self.registry.resolve(&envelope.type_name)?;
        let geometry = decoder(&envelope.body)?;
        if geometry.is_valid() {
            Some(geometry)
        } else {
            None
        }
    }
}

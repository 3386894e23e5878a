//! Local geometry library used by the codec and the engine seam.
//!
//! These are deliberately minimal data types. The service treats geometry
//! as opaque cargo; the only thing the transport layer ever asks of a
//! value is its kind, its short type name, and whether it is structurally
//! valid after decoding.

use serde::{Deserialize, Serialize};

/// Coarse shape classification carried on a payload.
///
/// Consumers derive this from the decoded value, never from an external
/// field, so a payload cannot claim to be one kind while carrying another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Curve,
    Brep,
    Extrusion,
    Mesh,
    Unknown,
}

/// A point in 3-space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Point3) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A polyline curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    pub points: Vec<Point3>,
}

impl Curve {
    /// Valid when it has at least two finite points.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2 && self.points.iter().all(Point3::is_finite)
    }
}

/// A boundary-representation solid, reduced to a triangulated boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brep {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[u32; 3]>,
}

impl Brep {
    /// Valid when every face indexes into the vertex table.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.faces.is_empty()
            && self.vertices.iter().all(Point3::is_finite)
            && self
                .faces
                .iter()
                .all(|f| f.iter().all(|&i| (i as usize) < self.vertices.len()))
    }

    /// Axis-aligned bounding box as (min, max) corners.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        bounding_box(&self.vertices)
    }
}

/// A planar profile swept along the Z axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extrusion {
    pub profile: Vec<Point3>,
    pub height: f64,
}

impl Extrusion {
    pub fn is_valid(&self) -> bool {
        self.profile.len() >= 3
            && self.profile.iter().all(Point3::is_finite)
            && self.height.is_finite()
            && self.height != 0.0
    }
}

/// A triangle mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Point3>,
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.faces.is_empty()
            && self.vertices.iter().all(Point3::is_finite)
            && self
                .faces
                .iter()
                .all(|f| f.iter().all(|&i| (i as usize) < self.vertices.len()))
    }
}

/// A decoded geometry value.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Curve(Curve),
    Brep(Brep),
    Extrusion(Extrusion),
    Mesh(Mesh),
}

impl Geometry {
    /// Kind derived from the runtime shape of the value.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Geometry::Curve(_) => GeometryKind::Curve,
            Geometry::Brep(_) => GeometryKind::Brep,
            Geometry::Extrusion(_) => GeometryKind::Extrusion,
            Geometry::Mesh(_) => GeometryKind::Mesh,
        }
    }

    /// Short type name embedded in the serialized envelope.
    ///
    /// This is the registry key used to resolve a decoder, independent of
    /// which build of the geometry library produced the bytes.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Curve(_) => "Curve",
            Geometry::Brep(_) => "Brep",
            Geometry::Extrusion(_) => "Extrusion",
            Geometry::Mesh(_) => "Mesh",
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Geometry::Curve(c) => c.is_valid(),
            Geometry::Brep(b) => b.is_valid(),
            Geometry::Extrusion(e) => e.is_valid(),
            Geometry::Mesh(m) => m.is_valid(),
        }
    }

    pub fn as_brep(&self) -> Option<&Brep> {
        match self {
            Geometry::Brep(b) => Some(b),
            _ => None,
        }
    }
}

fn bounding_box(points: &[Point3]) -> Option<(Point3, Point3)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }
    Some((min, max))
}

/// A unit-ish box Brep, used by the CLI demos and tests as sample input.
pub fn box_brep(origin: Point3, size: f64) -> Brep {
    let o = origin;
    let s = size;
    let vertices = vec![
        Point3::new(o.x, o.y, o.z),
        Point3::new(o.x + s, o.y, o.z),
        Point3::new(o.x + s, o.y + s, o.z),
        Point3::new(o.x, o.y + s, o.z),
        Point3::new(o.x, o.y, o.z + s),
        Point3::new(o.x + s, o.y, o.z + s),
        Point3::new(o.x + s, o.y + s, o.z + s),
        Point3::new(o.x, o.y + s, o.z + s),
    ];
    let faces = vec![
        [0, 1, 2],
        [0, 2, 3],
        [4, 6, 5],
        [4, 7, 6],
        [0, 5, 1],
        [0, 4, 5],
        [1, 6, 2],
        [1, 5, 6],
        [2, 7, 3],
        [2, 6, 7],
        [3, 4, 0],
        [3, 7, 4],
    ];
    Brep { vertices, faces }
}

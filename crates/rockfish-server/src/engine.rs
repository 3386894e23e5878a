//! Geometry engine seam.
//!
//! The service does not own any geometric algorithm; it invokes an engine
//! through this trait and transports whatever comes back. `ReferenceEngine`
//! is a deliberately simple stand-in so the daemon and tests have
//! something to run against.

use anyhow::{bail, Result};

use rockfish_core::geometry::{Curve, Geometry, Mesh, Point3};

/// Opaque capability collaborator invoked during dispatch.
///
/// Implementations must be cheap to share across concurrent calls; the
/// host holds one behind an `Arc` for the lifetime of the process.
pub trait GeometryEngine: Send + Sync {
    /// Intersect two solids and return the intersection curves.
    /// An empty result means the inputs do not intersect.
    fn intersect(&self, a: &Geometry, b: &Geometry, tolerance: f64) -> Result<Vec<Geometry>>;

    /// Build a polyline curve from a point list, dropping points closer
    /// than `min_distance` to the previously kept one.
    fn polyline_from_points(&self, points: &[Point3], min_distance: f64) -> Result<Geometry>;

    /// Mesh a solid. `smooth` requests a finer tessellation.
    fn mesh(&self, geometry: &Geometry, smooth: bool) -> Result<Geometry>;
}

/// Minimal engine used by the daemon binary and the test suite.
///
/// Intersection works on bounding boxes, meshing reuses or fabricates
/// triangle data. Good enough to exercise the transport; not geometry.
pub struct ReferenceEngine;

impl GeometryEngine for ReferenceEngine {
    fn intersect(&self, a: &Geometry, b: &Geometry, tolerance: f64) -> Result<Vec<Geometry>> {
        let Some(brep_a) = a.as_brep() else {
            bail!("Brep is null");
        };
        let Some(brep_b) = b.as_brep() else {
            bail!("Brep is null");
        };
        let (min_a, max_a) = brep_a
            .bounding_box()
            .ok_or_else(|| anyhow::anyhow!("Brep has no extent"))?;
        let (min_b, max_b) = brep_b
            .bounding_box()
            .ok_or_else(|| anyhow::anyhow!("Brep has no extent"))?;

        let min = Point3::new(
            min_a.x.max(min_b.x),
            min_a.y.max(min_b.y),
            min_a.z.max(min_b.z),
        );
        let max = Point3::new(
            max_a.x.min(max_b.x),
            max_a.y.min(max_b.y),
            max_a.z.min(max_b.z),
        );
        if min.x - max.x > tolerance || min.y - max.y > tolerance || min.z - max.z > tolerance {
            return Ok(Vec::new());
        }

        // Outline of the overlap volume at its base plane.
        let outline = Curve {
            points: vec![
                Point3::new(min.x, min.y, min.z),
                Point3::new(max.x, min.y, min.z),
                Point3::new(max.x, max.y, min.z),
                Point3::new(min.x, max.y, min.z),
                Point3::new(min.x, min.y, min.z),
            ],
        };
        Ok(vec![Geometry::Curve(outline)])
    }

    fn polyline_from_points(&self, points: &[Point3], min_distance: f64) -> Result<Geometry> {
        let mut kept: Vec<Point3> = Vec::with_capacity(points.len());
        for p in points {
            match kept.last() {
                Some(last) if last.distance_to(p) < min_distance => continue,
                _ => kept.push(*p),
            }
        }
        if kept.len() < 2 {
            bail!("Not enough points to create a polyline");
        }
        Ok(Geometry::Curve(Curve { points: kept }))
    }

    fn mesh(&self, geometry: &Geometry, smooth: bool) -> Result<Geometry> {
        let (vertices, faces) = match geometry {
            Geometry::Brep(b) => (b.vertices.clone(), b.faces.clone()),
            Geometry::Extrusion(e) => extrude_profile(&e.profile, e.height),
            _ => bail!("Geometry of this kind cannot be meshed"),
        };

        let mesh = if smooth {
            refine(Mesh { vertices, faces })
        } else {
            Mesh { vertices, faces }
        };
        Ok(Geometry::Mesh(mesh))
    }
}

/// Side walls of a profile swept along Z. Caps are omitted.
fn extrude_profile(profile: &[Point3], height: f64) -> (Vec<Point3>, Vec<[u32; 3]>) {
    let n = profile.len();
    let mut vertices = Vec::with_capacity(n * 2);
    vertices.extend_from_slice(profile);
    vertices.extend(
        profile
            .iter()
            .map(|p| Point3::new(p.x, p.y, p.z + height)),
    );

    let mut faces = Vec::with_capacity(n * 2);
    for i in 0..n {
        let j = (i + 1) % n;
        let (a, b) = (i as u32, j as u32);
        let (c, d) = (a + n as u32, b + n as u32);
        faces.push([a, b, d]);
        faces.push([a, d, c]);
    }
    (vertices, faces)
}

/// One round of centroid subdivision: each triangle becomes three.
fn refine(mesh: Mesh) -> Mesh {
    let mut vertices = mesh.vertices;
    let mut faces = Vec::with_capacity(mesh.faces.len() * 3);
    for [a, b, c] in mesh.faces {
        let (pa, pb, pc) = (
            vertices[a as usize],
            vertices[b as usize],
            vertices[c as usize],
        );
        let centroid = Point3::new(
            (pa.x + pb.x + pc.x) / 3.0,
            (pa.y + pb.y + pc.y) / 3.0,
            (pa.z + pb.z + pc.z) / 3.0,
        );
        let m = vertices.len() as u32;
        vertices.push(centroid);
        faces.push([a, b, m]);
        faces.push([b, c, m]);
        faces.push([c, a, m]);
    }
    Mesh { vertices, faces }
}

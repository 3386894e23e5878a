//! Geometry commands — intersect, polyline, mesh.
//!
//! The intersect and mesh demos run against generated sample solids; the
//! original client picked objects out of a modeling document, which this
//! CLI has no equivalent of.

use anyhow::{bail, Context, Result};

use rockfish_core::geometry::{box_brep, Geometry, Point3};

pub async fn intersect(args: &[&str]) -> Result<()> {
    let tolerance: f64 = match args {
        [] => 0.01,
        [t] => t.parse().context("tolerance must be a number")?,
        _ => bail!("usage: intersect [tolerance]"),
    };

    let (channel, _) = super::open_channel()?;
    let a = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));
    let b = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.5, 0.5, 0.5), 1.0)));

    let curves = channel.intersect_geometry(&a, &b, tolerance).await?;
    if curves.is_empty() {
        println!("No intersection.");
    } else {
        println!("{} intersection curve(s):", curves.len());
        for curve in &curves {
            if let Geometry::Curve(c) = curve {
                println!("  polyline with {} points", c.points.len());
            }
        }
    }
    Ok(())
}

pub async fn polyline(args: &[&str]) -> Result<()> {
    let mut points = Vec::new();
    let mut min_distance = 0.0_f64;
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--min-distance" {
            i += 1;
            min_distance = args
                .get(i)
                .context("--min-distance requires a value")?
                .parse()
                .context("--min-distance must be a number")?;
        } else {
            points.push(parse_point(args[i])?);
        }
        i += 1;
    }

    let (channel, _) = super::open_channel()?;
    match channel.polyline_from_points(&points, min_distance).await? {
        Some(Geometry::Curve(c)) => println!("Polyline created with {} points.", c.points.len()),
        Some(other) => println!("Unexpected result kind: {:?}", other.kind()),
        None => println!("No polyline returned."),
    }
    Ok(())
}

pub async fn mesh(args: &[&str]) -> Result<()> {
    let smooth = match args {
        [] => false,
        ["--smooth"] => true,
        _ => bail!("usage: mesh [--smooth]"),
    };

    let (channel, _) = super::open_channel()?;
    let brep = channel.encode(&Geometry::Brep(box_brep(Point3::new(0.0, 0.0, 0.0), 1.0)));
    match channel.mesh_from_geometry(&brep, smooth).await? {
        Some(Geometry::Mesh(m)) => println!(
            "Mesh created: {} vertices, {} faces.",
            m.vertices.len(),
            m.faces.len()
        ),
        Some(other) => println!("Unexpected result kind: {:?}", other.kind()),
        None => println!("No mesh returned."),
    }
    Ok(())
}

fn parse_point(text: &str) -> Result<Point3> {
    let parts: Vec<&str> = text.split(',').collect();
    let [x, y, z] = parts.as_slice() else {
        bail!("point must be x,y,z — got {text:?}");
    };
    Ok(Point3::new(
        x.parse().with_context(|| format!("bad x in {text:?}"))?,
        y.parse().with_context(|| format!("bad y in {text:?}"))?,
        z.parse().with_context(|| format!("bad z in {text:?}"))?,
    ))
}

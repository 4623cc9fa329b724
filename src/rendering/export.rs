// src/rendering/export.rs
//
// 2D diagram of a projection, drawn with plotters so it works on any
// backend (SVG file here).

use nalgebra::Vector3;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use crate::config::RenderStyle;
use crate::physics::Projection;

const MARGIN: f64 = 60.0;

fn to_rgb(c: (f64, f64, f64)) -> RGBColor {
    let ch = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBColor(ch(c.0), ch(c.1), ch(c.2))
}

/// Orthonormal basis (u, v) spanning the plane with the given normal.
pub fn plane_basis(normal: [f64; 3]) -> ([f64; 3], [f64; 3]) {
    let n = Vector3::from(normal);
    // Any axis not parallel to the normal works as a seed
    let seed = if n.z.abs() < 0.9 { Vector3::z() } else { Vector3::y() };
    let u = seed.cross(&n).normalize();
    let v = n.cross(&u);
    ([u.x, u.y, u.z], [v.x, v.y, v.z])
}

/// In-plane coordinates of every projected point, in the same order as
/// markers then edges (start, end).
fn flatten(projection: &Projection) -> (Vec<(f64, f64)>, Vec<((f64, f64), (f64, f64))>) {
    let (u, v) = plane_basis(projection.normal);
    let to_2d = |p: [f64; 3]| -> (f64, f64) {
        (
            p[0] * u[0] + p[1] * u[1] + p[2] * u[2],
            p[0] * v[0] + p[1] * v[1] + p[2] * v[2],
        )
    };
    let markers = projection.markers.iter().map(|m| to_2d(m.position)).collect();
    let edges = projection.edges.iter().map(|(s, e)| (to_2d(*s), to_2d(*e))).collect();
    (markers, edges)
}

/// Draws projection edges, markers and distance labels, fitted to `root`.
pub fn draw_projection<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    projection: &Projection,
    style: &RenderStyle,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    root.fill(&to_rgb(style.background_color))?;

    let (markers, edges) = flatten(projection);
    if markers.is_empty() {
        return Ok(());
    }

    // 1. Fit the bounding box into the canvas, keeping aspect ratio
    let mut min = (f64::MAX, f64::MAX);
    let mut max = (f64::MIN, f64::MIN);
    for &(x, y) in markers.iter().chain(edges.iter().flat_map(|(s, e)| [s, e])) {
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    let (w, h) = root.dim_in_pixel();
    let span = (max.0 - min.0).max(max.1 - min.1).max(1e-6);
    let scale = ((w.min(h) as f64) - 2.0 * MARGIN).max(1.0) / span;
    let center = ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0);

    // Screen y grows downwards
    let to_px = |p: (f64, f64)| -> (i32, i32) {
        (
            (w as f64 / 2.0 + (p.0 - center.0) * scale).round() as i32,
            (h as f64 / 2.0 - (p.1 - center.1) * scale).round() as i32,
        )
    };

    // 2. Cell edges
    let edge_color = to_rgb(style.bond_color);
    for (s, e) in &edges {
        root.draw(&PathElement::new(vec![to_px(*s), to_px(*e)], edge_color.stroke_width(2)))?;
    }

    // 3. Markers and labels
    let text_color = to_rgb(style.bond_color);
    for (marker, pos) in projection.markers.iter().zip(markers.iter()) {
        let (radius, color) = style.species_look(marker.species);
        let px = to_px(*pos);
        let r_px = ((radius * scale * 0.5).round() as i32).clamp(4, 24);
        root.draw(&Circle::new(px, r_px, to_rgb(color).filled()))?;

        if !marker.label.is_empty() {
            let font = ("sans-serif", 14).into_font().color(&text_color);
            root.draw(&Text::new(marker.label.clone(), (px.0 + r_px + 3, px.1 - r_px - 3), font))?;
        }
    }

    Ok(())
}

/// Writes the projection diagram as an SVG file.
pub fn export_projection_svg(
    path: &Path,
    projection: &Projection,
    style: &RenderStyle,
    size: (u32, u32),
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    draw_projection(&root, projection, style)?;
    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellParams, MillerPlane, StructureType};
    use crate::physics::{generate, project_geometry, ProjectionMode};

    #[test]
    fn test_plane_basis_orthonormal() {
        for normal in [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.57735, 0.57735, 0.57735]] {
            let n = Vector3::from(normal).normalize();
            let (u, v) = plane_basis([n.x, n.y, n.z]);
            let (u, v) = (Vector3::from(u), Vector3::from(v));
            assert!((u.norm() - 1.0).abs() < 1e-9);
            assert!((v.norm() - 1.0).abs() < 1e-9);
            assert!(u.dot(&v).abs() < 1e-9);
            assert!(u.dot(&n).abs() < 1e-9);
        }
    }

    #[test]
    fn test_svg_export() {
        let geo = generate(StructureType::ZnS, &CellParams::cubic(5.4), false);
        let projection =
            project_geometry(&geo, &MillerPlane::new(0, 0, 1, 0), ProjectionMode::All).unwrap();

        let dir = std::env::temp_dir().join(format!("unitcell-svg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("zns.svg");

        export_projection_svg(&path, &projection, &RenderStyle::default(), (400, 400)).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("¼"));
        let _ = std::fs::remove_file(&path);
    }
}

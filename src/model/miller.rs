// src/model/miller.rs
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::structure::Bond;

/// Side length of the square drawn for a reticular plane.
pub const PLANE_DISPLAY_SIZE: f64 = 20.0;

/// A lattice plane (h k l) shifted by an integer offset.
///
/// The plane passes through `normal * offset / |(h,k,l)|`, i.e. it satisfies
/// `h*x + k*y + l*z = offset` in Cartesian coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MillerPlane {
    pub h: i32,
    pub k: i32,
    pub l: i32,
    pub offset: i32,
}

/// Placement of a reticular plane in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ReticularPlane {
    pub center: [f64; 3],
    pub normal: [f64; 3],
    pub size: f64,
}

impl MillerPlane {
    pub fn new(h: i32, k: i32, l: i32, offset: i32) -> Self {
        Self { h, k, l, offset }
    }

    /// (0 0 0) defines no plane at all.
    pub fn is_degenerate(&self) -> bool {
        self.h == 0 && self.k == 0 && self.l == 0
    }

    pub fn indices(&self) -> Vector3<f64> {
        Vector3::new(self.h as f64, self.k as f64, self.l as f64)
    }

    /// |(h,k,l)|
    pub fn norm(&self) -> f64 {
        self.indices().norm()
    }

    pub fn normal(&self) -> Option<Vector3<f64>> {
        if self.is_degenerate() {
            return None;
        }
        Some(self.indices().normalize())
    }

    /// Point of the plane closest to the origin.
    pub fn plane_point(&self) -> Option<Vector3<f64>> {
        let normal = self.normal()?;
        Some(normal * (self.offset as f64 / self.norm()))
    }

    /// (00l) and (hk0) planes. Their distances are reported in units of a.
    pub fn is_axis_aligned(&self) -> bool {
        (self.h == 0 && self.k == 0) || self.l == 0
    }

    /// Unnormalised signed distance of a point from the plane, along the normal.
    pub fn raw_distance(&self, point: [f64; 3]) -> Option<f64> {
        let normal = self.normal()?;
        let plane_point = self.plane_point()?;
        Some((Vector3::from(point) - plane_point).dot(&normal))
    }

    pub fn reticular_plane(&self) -> Option<ReticularPlane> {
        let normal = self.normal()?;
        let center = self.plane_point()?;
        Some(ReticularPlane {
            center: [center.x, center.y, center.z],
            normal: [normal.x, normal.y, normal.z],
            size: PLANE_DISPLAY_SIZE,
        })
    }

    /// Polygon where the plane cuts the given cell edges, ordered around
    /// its centroid. Empty if the plane misses the cell or only grazes it.
    pub fn cell_section(&self, edges: &[Bond]) -> Vec<[f64; 3]> {
        let (normal, plane_point) = match (self.normal(), self.plane_point()) {
            (Some(n), Some(p)) => (n, p),
            _ => return Vec::new(),
        };
        let d = plane_point.dot(&normal);

        let mut points: Vec<[f64; 3]> = Vec::new();
        for edge in edges {
            let start = Vector3::from(edge.start);
            let dir = Vector3::from(edge.end) - start;

            // Parametric line: P = start + t*dir
            let n_dot_d = normal.dot(&dir);
            if n_dot_d.abs() < 1e-9 {
                continue;
            }
            let t = (d - normal.dot(&start)) / n_dot_d;
            if t >= -1e-6 && t <= 1.0 + 1e-6 {
                let p = start + dir * t;
                points.push([p.x, p.y, p.z]);
            }
        }

        // Corners are hit by several edges
        let mut unique: Vec<[f64; 3]> = Vec::new();
        for p in points {
            let seen = unique.iter().any(|q| {
                (p[0] - q[0]).abs() < 1e-4 && (p[1] - q[1]).abs() < 1e-4 && (p[2] - q[2]).abs() < 1e-4
            });
            if !seen {
                unique.push(p);
            }
        }

        if unique.len() < 3 {
            return Vec::new();
        }

        sort_points_angularly(&mut unique, [normal.x, normal.y, normal.z]);
        unique
    }
}

fn sort_points_angularly(points: &mut [[f64; 3]], normal: [f64; 3]) {
    if points.is_empty() { return; }

    // 1. Calculate Centroid
    let n = points.len() as f64;
    let mut c = [0.0; 3];
    for p in points.iter() {
        c[0] += p[0] / n; c[1] += p[1] / n; c[2] += p[2] / n;
    }

    // 2. Basis U: first point not sitting on the centroid
    let v1 = match points.iter()
        .map(|p| [p[0] - c[0], p[1] - c[1], p[2] - c[2]])
        .find(|v| dot(*v, *v) > 1e-12)
    {
        Some(v) => v,
        None => return,
    };
    let u_len = dot(v1, v1).sqrt();
    let u = [v1[0] / u_len, v1[1] / u_len, v1[2] / u_len];

    // Basis V = Normal x U
    let v = cross(normal, u);

    // 3. Sort by Angle
    points.sort_by(|a, b| {
        let va = [a[0] - c[0], a[1] - c[1], a[2] - c[2]];
        let vb = [b[0] - c[0], b[1] - c[1], b[2] - c[2]];
        let angle_a = dot(va, v).atan2(dot(va, u));
        let angle_b = dot(vb, v).atan2(dot(vb, u));
        angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
    });
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0]*b[0] + a[1]*b[1] + a[2]*b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

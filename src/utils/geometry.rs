// src/utils/geometry.rs

type Point3 = [f64; 3];

/// Calculates distance between two points (Angstroms)
pub fn calculate_distance(p1: Point3, p2: Point3) -> f64 {
    let diff = sub(p1, p2);
    dot(diff, diff).sqrt()
}

/// Shifts a point by a vector
pub fn translate(p: Point3, by: Point3) -> Point3 {
    [p[0] + by[0], p[1] + by[1], p[2] + by[2]]
}

/// True if every coordinate lies in [-tol, 1 + tol]
pub fn in_unit_box(frac: Point3, tol: f64) -> bool {
    frac.iter().all(|x| *x >= -tol && *x <= 1.0 + tol)
}

/// Index of the point closest to `target`, or None for an empty slice
pub fn closest_point(points: &[Point3], target: Point3) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = calculate_distance(*p, target);
        match best {
            Some((_, min_d)) if d >= min_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

// --- Internal Math Helpers for [f64; 3] ---

fn sub(a: Point3, b: Point3) -> Point3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: Point3, b: Point3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

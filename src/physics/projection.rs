// src/physics/projection.rs
//
// Projection of a unit cell onto a reticular plane, with the signed
// distance of every atom to that plane written as a crystallographic
// fraction ("½", "-⅓", ...).

use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::model::{Atom, Bond, CrystalGeometry, MillerPlane, SiteRole, Species};
use crate::utils::geometry::closest_point;

/// Tolerance for snapping a distance to an integer or simple fraction
const FRACTION_TOLERANCE: f64 = 1e-3;

const FRACTIONS: [(f64, &str); 10] = [
    (1.0 / 2.0, "½"),
    (1.0 / 3.0, "⅓"),
    (2.0 / 3.0, "⅔"),
    (1.0 / 4.0, "¼"),
    (3.0 / 4.0, "¾"),
    (-1.0 / 2.0, "-½"),
    (-1.0 / 3.0, "-⅓"),
    (-2.0 / 3.0, "-⅔"),
    (-1.0 / 4.0, "-¼"),
    (-3.0 / 4.0, "-¾"),
];

/// Which atoms of a two-species structure go into the projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    #[default]
    Base,
    Sites,
    All,
}

impl ProjectionMode {
    pub fn accepts(&self, role: SiteRole) -> bool {
        match self {
            ProjectionMode::Base => role == SiteRole::Base,
            ProjectionMode::Sites => role == SiteRole::Site,
            ProjectionMode::All => true,
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProjectionMode::Base => "base",
            ProjectionMode::Sites => "sites",
            ProjectionMode::All => "all",
        })
    }
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(ProjectionMode::Base),
            "sites" | "site" => Ok(ProjectionMode::Sites),
            "all" => Ok(ProjectionMode::All),
            other => Err(format!("Unknown projection mode '{}' (base, sites, all)", other)),
        }
    }
}

/// One atom after projection onto the plane.
#[derive(Debug, Clone)]
pub struct ProjectedAtom {
    pub atom_index: usize,
    pub species: Species,
    pub role: SiteRole,
    pub position: [f64; 3],
    pub projected: [f64; 3],
    /// Signed distance in lattice units, see [`signed_distance`]
    pub distance: f64,
}

/// Atoms sharing a projected position, drawn as one disc.
#[derive(Debug, Clone)]
pub struct ProjectionMarker {
    pub position: [f64; 3],
    /// Species of the first atom in the group, used for its color
    pub species: Species,
    pub atom_indices: Vec<usize>,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub plane: MillerPlane,
    pub normal: [f64; 3],
    /// Every atom of the cell, filtered or not
    pub atoms: Vec<ProjectedAtom>,
    pub markers: Vec<ProjectionMarker>,
    pub edges: Vec<([f64; 3], [f64; 3])>,
}

/// Signed distance of an atom to the plane, in lattice units.
///
/// The sign is taken relative to a reference point: (0,0,1) for a plane
/// through the origin, the origin itself otherwise. Distances to (00l) and
/// (hk0) planes are divided by `a`, all others by |(h,k,l)|.
/// Returns 0 for the degenerate (000) plane.
pub fn signed_distance(position: [f64; 3], plane: &MillerPlane, a: f64) -> f64 {
    let (normal, plane_point, raw) =
        match (plane.normal(), plane.plane_point(), plane.raw_distance(position)) {
            (Some(n), Some(p), Some(raw)) => (n, p, raw),
            _ => return 0.0,
        };

    let sign = if plane.offset == 0 {
        let reference = Vector3::new(0.0, 0.0, 1.0);
        let ref_side = (reference - plane_point).dot(&normal) > 0.0;
        if (raw > 0.0) == ref_side { 1.0 } else { -1.0 }
    } else {
        let ref_side = (-plane_point).dot(&normal) > 0.0;
        if (raw > 0.0) == ref_side { -1.0 } else { 1.0 }
    };

    let magnitude = if plane.is_axis_aligned() {
        raw.abs() / a
    } else {
        raw.abs() / plane.norm()
    };

    sign * magnitude
}

/// Formats a distance as an integer, a simple fraction glyph or a
/// two-decimal number.
pub fn format_distance(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < FRACTION_TOLERANCE {
        // `as i64` also folds -0 into 0
        return (rounded as i64).to_string();
    }

    for (fraction, glyph) in FRACTIONS.iter() {
        if (value - fraction).abs() < FRACTION_TOLERANCE {
            return glyph.to_string();
        }
    }

    format!("{:.2}", value)
}

/// Sorted, deduplicated, comma-joined label for one marker.
fn marker_label(distances: &mut [f64]) -> String {
    distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mut parts: Vec<String> = Vec::new();
    for d in distances.iter() {
        let text = format_distance(*d);
        if !parts.contains(&text) {
            parts.push(text);
        }
    }
    parts.join(",")
}

/// Grouping key: projected position rounded to 2 decimals
fn projection_key(p: [f64; 3]) -> [i64; 3] {
    [
        (p[0] * 100.0).round() as i64,
        (p[1] * 100.0).round() as i64,
        (p[2] * 100.0).round() as i64,
    ]
}

/// Projects `atoms` onto `plane`.
///
/// Every atom is projected; only those accepted by `mode` become markers.
/// Markers keep the order in which their first atom appears. Returns `None`
/// for the degenerate (000) plane.
pub fn project(atoms: &[Atom], plane: &MillerPlane, a: f64, mode: ProjectionMode) -> Option<Projection> {
    let normal = plane.normal()?;

    // 1. Project every atom
    let projected: Vec<ProjectedAtom> = atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            let distance_to_plane = plane.raw_distance(atom.position).unwrap_or(0.0);
            let p = Vector3::from(atom.position) - normal * distance_to_plane;
            ProjectedAtom {
                atom_index: i,
                species: atom.species,
                role: atom.role,
                position: atom.position,
                projected: [p.x, p.y, p.z],
                distance: signed_distance(atom.position, plane, a),
            }
        })
        .collect();

    // 2. Group the selected atoms by projected position
    let mut groups: Vec<(ProjectionMarker, Vec<f64>)> = Vec::new();
    let mut lookup: HashMap<[i64; 3], usize> = HashMap::new();

    for pa in projected.iter().filter(|pa| mode.accepts(pa.role)) {
        let key = projection_key(pa.projected);
        let slot = *lookup.entry(key).or_insert_with(|| {
            groups.push((
                ProjectionMarker {
                    position: pa.projected,
                    species: pa.species,
                    atom_indices: Vec::new(),
                    label: String::new(),
                },
                Vec::new(),
            ));
            groups.len() - 1
        });
        let (marker, distances) = &mut groups[slot];
        marker.atom_indices.push(pa.atom_index);
        distances.push(pa.distance);
    }

    let markers: Vec<ProjectionMarker> = groups
        .into_iter()
        .map(|(mut marker, mut distances)| {
            marker.label = marker_label(&mut distances);
            marker
        })
        .collect();

    debug!(
        "Projected {} atoms onto ({} {} {}) offset {}: {} markers",
        atoms.len(),
        plane.h,
        plane.k,
        plane.l,
        plane.offset,
        markers.len()
    );

    Some(Projection {
        plane: *plane,
        normal: [normal.x, normal.y, normal.z],
        atoms: projected,
        markers,
        edges: Vec::new(),
    })
}

/// Projects bond segments by snapping each endpoint to its nearest atom
/// and reusing that atom's projection. Bond endpoints are expected to
/// coincide with atom positions.
pub fn project_edges(projection: &Projection, bonds: &[Bond]) -> Vec<([f64; 3], [f64; 3])> {
    let positions: Vec<[f64; 3]> = projection.atoms.iter().map(|pa| pa.position).collect();

    bonds
        .iter()
        .filter_map(|bond| {
            let start = closest_point(&positions, bond.start)?;
            let end = closest_point(&positions, bond.end)?;
            Some((projection.atoms[start].projected, projection.atoms[end].projected))
        })
        .collect()
}

/// Projection of a whole generated cell, including its edges.
/// Hexagonal cells have no base/site split and always project every atom.
pub fn project_geometry(
    geometry: &CrystalGeometry,
    plane: &MillerPlane,
    mode: ProjectionMode,
) -> Option<Projection> {
    let mode = match geometry.structure {
        Some(s) if s.is_hexagonal() => ProjectionMode::All,
        _ => mode,
    };

    let mut projection = project(&geometry.atoms, plane, geometry.params.a, mode)?;
    projection.edges = project_edges(&projection, &geometry.bonds);
    Some(projection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellParams, StructureType};
    use crate::physics::lattice::generate;

    fn metal(position: [f64; 3]) -> Atom {
        Atom { species: Species::Metal, role: SiteRole::Base, position, fractional: [0.0; 3] }
    }

    fn label_at<'a>(p: &'a Projection, x: f64, y: f64) -> &'a str {
        p.markers
            .iter()
            .find(|m| (m.position[0] - x).abs() < 1e-6 && (m.position[1] - y).abs() < 1e-6)
            .map(|m| m.label.as_str())
            .unwrap_or_else(|| panic!("no marker at ({}, {})", x, y))
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.5), "½");
        assert_eq!(format_distance(-0.3333), "-⅓");
        assert_eq!(format_distance(2.0001), "2");
        assert_eq!(format_distance(0.1), "0.10");
        assert_eq!(format_distance(0.75), "¾");
        assert_eq!(format_distance(-2.0 / 3.0), "-⅔");
        assert_eq!(format_distance(-0.0), "0");
        assert_eq!(format_distance(-0.0004), "0");
        assert_eq!(format_distance(1.25), "1.25");
    }

    #[test]
    fn test_degenerate_plane() {
        let plane = MillerPlane::new(0, 0, 0, 1);
        assert_eq!(signed_distance([1.0, 2.0, 3.0], &plane, 4.0), 0.0);
        assert!(project(&[metal([1.0, 1.0, 1.0])], &plane, 4.0, ProjectionMode::All).is_none());
    }

    #[test]
    fn test_signed_distance_scale_covariant() {
        let plane = MillerPlane::new(0, 0, 1, 0);
        for a in [2.0, 4.0, 8.0] {
            assert_eq!(format_distance(signed_distance([0.0, 0.0, 0.0], &plane, a)), "0");
            assert_eq!(format_distance(signed_distance([a, a, a], &plane, a)), "1");
            assert_eq!(format_distance(signed_distance([a / 2.0, 0.0, a / 2.0], &plane, a)), "½");
        }
    }

    #[test]
    fn test_signed_distance_reference_side() {
        // Plane through the origin: the (0,0,1) side is positive
        let plane = MillerPlane::new(0, 0, 1, 0);
        assert!(signed_distance([0.0, 0.0, 2.0], &plane, 4.0) > 0.0);
        assert!(signed_distance([0.0, 0.0, -2.0], &plane, 4.0) < 0.0);

        // Offset plane: the origin side is negative
        let plane = MillerPlane::new(0, 0, 1, 1);
        assert!((signed_distance([0.0, 0.0, 0.0], &plane, 4.0) + 0.25).abs() < 1e-12);
        assert!((signed_distance([0.0, 0.0, 3.0], &plane, 4.0) - 0.5).abs() < 1e-12);

        // Same plane seen from the opposite normal keeps the same signs
        let flipped = MillerPlane::new(0, 0, -1, -1);
        assert!((signed_distance([0.0, 0.0, 0.0], &flipped, 4.0) + 0.25).abs() < 1e-12);
        assert!((signed_distance([0.0, 0.0, 3.0], &flipped, 4.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_general_plane_normalization() {
        // (1 1 1): divided by |hkl| = √3, not by a
        let plane = MillerPlane::new(1, 1, 1, 0);
        let d = signed_distance([3.0, 0.0, 0.0], &plane, 4.0);
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grouping_merges_labels() {
        let atoms = vec![
            metal([1.0, 1.0, 0.0]),
            metal([1.0, 1.0, 2.0]),
            metal([1.0, 1.0, 4.0]),
            metal([1.0, 1.0, 4.0]),
            metal([3.0, 1.0, 0.0]),
        ];
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project(&atoms, &plane, 4.0, ProjectionMode::All).unwrap();

        assert_eq!(p.atoms.len(), 5);
        assert_eq!(p.markers.len(), 2);
        assert_eq!(p.markers[0].atom_indices, vec![0, 1, 2, 3]);
        assert_eq!(p.markers[0].label, "0,½,1");
        assert_eq!(p.markers[1].label, "0");
    }

    #[test]
    fn test_labels_sorted_ascending() {
        let atoms = vec![metal([0.0, 0.0, 3.0]), metal([0.0, 0.0, -1.0]), metal([0.0, 0.0, 1.0])];
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project(&atoms, &plane, 4.0, ProjectionMode::All).unwrap();
        assert_eq!(p.markers.len(), 1);
        assert_eq!(p.markers[0].label, "-¼,¼,¾");
    }

    #[test]
    fn test_nacl_base_projection() {
        let geo = generate(StructureType::NaCl, &CellParams::cubic(4.0), false);
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project_geometry(&geo, &plane, ProjectionMode::Base).unwrap();

        let members: usize = p.markers.iter().map(|m| m.atom_indices.len()).sum();
        assert_eq!(members, 14);
        assert_eq!(p.markers.len(), 9);
        assert!(p.markers.iter().all(|m| m.species == Species::Chloride));
        for m in &p.markers {
            assert!(m.position[2].abs() < 1e-9);
        }

        assert_eq!(label_at(&p, 0.0, 0.0), "0,1");
        assert_eq!(label_at(&p, 4.0, 4.0), "0,1");
        assert_eq!(label_at(&p, 2.0, 2.0), "0,1");
        assert_eq!(label_at(&p, 2.0, 0.0), "½");
        assert_eq!(label_at(&p, 0.0, 2.0), "½");

        assert_eq!(p.edges.len(), 12);
    }

    #[test]
    fn test_nacl_sites_projection() {
        let geo = generate(StructureType::NaCl, &CellParams::cubic(4.0), false);
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project_geometry(&geo, &plane, ProjectionMode::Sites).unwrap();

        assert!(p.markers.iter().all(|m| m.species == Species::Sodium));
        // Edge midpoints along x/y fold onto 4 spots, vertical ones onto the corners
        assert_eq!(p.markers.len(), 9);
        assert_eq!(label_at(&p, 2.0, 2.0), "½");
        assert_eq!(label_at(&p, 0.0, 0.0), "½");
        assert_eq!(label_at(&p, 2.0, 0.0), "0,1");
    }

    #[test]
    fn test_hexagonal_ignores_mode() {
        let geo = generate(StructureType::Hexagonal, &CellParams::hexagonal(3.0), false);
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project_geometry(&geo, &plane, ProjectionMode::Sites).unwrap();
        let members: usize = p.markers.iter().map(|m| m.atom_indices.len()).sum();
        assert_eq!(members, 9);
        assert_eq!(p.markers.len(), 5);
    }

    #[test]
    fn test_hexagonal_heights_in_units_of_a() {
        // (0 0 1) is axis aligned, so c is measured in units of a, not of c
        let geo = generate(StructureType::Hexagonal, &CellParams::hexagonal(3.0), false);
        let plane = MillerPlane::new(0, 0, 1, 0);
        let p = project_geometry(&geo, &plane, ProjectionMode::All).unwrap();

        assert_eq!(label_at(&p, 0.0, 0.0), "0,1.63");
        let mid = p.markers.iter().find(|m| m.atom_indices == vec![8]).unwrap();
        assert_eq!(mid.label, "0.82");
    }

    #[test]
    fn test_edges_follow_atoms() {
        let geo = generate(StructureType::SimpleCubic, &CellParams::cubic(4.0), false);
        let plane = MillerPlane::new(1, 0, 0, 0);
        let p = project_geometry(&geo, &plane, ProjectionMode::All).unwrap();
        assert_eq!(p.edges.len(), 12);
        for (s, e) in &p.edges {
            assert!(s[0].abs() < 1e-9 && e[0].abs() < 1e-9);
        }
    }

    #[test]
    fn test_edges_without_atoms() {
        let p = project(&[], &MillerPlane::new(0, 0, 1, 0), 4.0, ProjectionMode::All).unwrap();
        let bond = Bond { start: [0.0; 3], end: [1.0, 0.0, 0.0], kind: crate::model::BondKind::CellEdge };
        assert!(project_edges(&p, &[bond]).is_empty());
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("Sites".parse::<ProjectionMode>().unwrap(), ProjectionMode::Sites);
        assert!("none".parse::<ProjectionMode>().is_err());
    }
}

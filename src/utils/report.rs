// src/utils/report.rs

use crate::model::miller::ReticularPlane;
use crate::model::{CrystalGeometry, SiteRole};
use crate::physics::Projection;
use std::collections::BTreeMap;

/// Text summary of a generated cell: parameters, composition, atom table
pub fn cell_summary(geometry: &CrystalGeometry) -> String {
    let structure = match geometry.structure {
        Some(s) => s,
        None => return "No structure.\n".to_string(),
    };

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in &geometry.atoms {
        *counts.entry(atom.species.label()).or_insert(0) += 1;
    }
    let composition: String = counts
        .iter()
        .map(|(label, count)| format!("{} ×{}", label, count))
        .collect::<Vec<_>>()
        .join(", ");

    let p = &geometry.params;
    let mut out = String::new();
    out.push_str(&format!("Structure: {}\n", structure.display_name()));
    if structure.is_hexagonal() {
        out.push_str(&format!("Parameters: a=b={:.2} Å, c={:.2} Å, γ=120°\n", p.a, p.c));
    } else {
        out.push_str(&format!("Parameter: a={:.2} Å\n", p.a));
    }
    out.push_str(&format!("Space group: {}\n", structure.space_group()));
    out.push_str(&format!("Atoms: {} ({})\n", geometry.atoms.len(), composition));
    out.push_str(&format!(
        "Edges: {}, internal bonds: {}{}\n",
        geometry.bonds.len(),
        geometry.internal_bonds.len(),
        if geometry.nested.is_some() { ", nested cells shown" } else { "" }
    ));
    out.push_str("--------------------------------------------------------\n");
    out.push_str(&format!(
        "{:<6} {:<6} {:<6} {:<10} {:<10} {:<10}\n",
        "Index", "Ion", "Role", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------------\n");

    for (i, atom) in geometry.atoms.iter().enumerate() {
        let role = match atom.role {
            SiteRole::Base => "base",
            SiteRole::Site => "site",
        };
        out.push_str(&format!(
            "{:<6} {:<6} {:<6} {:<10.4} {:<10.4} {:<10.4}\n",
            i, atom.species.label(), role, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    out
}

/// Marker table of a projection with its distance labels
pub fn projection_summary(projection: &Projection) -> String {
    let pl = &projection.plane;
    let mut out = String::new();
    out.push_str(&format!(
        "Projection on ({} {} {}), offset {}: {} markers, {} edges\n",
        pl.h,
        pl.k,
        pl.l,
        pl.offset,
        projection.markers.len(),
        projection.edges.len()
    ));
    out.push_str("--------------------------------------------------------\n");
    out.push_str(&format!(
        "{:<6} {:<10} {:<10} {:<10} {}\n",
        "Ion", "X", "Y", "Z", "Heights"
    ));
    out.push_str("--------------------------------------------------------\n");

    for m in &projection.markers {
        out.push_str(&format!(
            "{:<6} {:<10.4} {:<10.4} {:<10.4} {}\n",
            m.species.label(),
            m.position[0],
            m.position[1],
            m.position[2],
            m.label
        ));
    }

    out
}

/// Placement of a reticular plane and the outline it cuts in the cell
pub fn plane_summary(plane: &ReticularPlane, section: &[[f64; 3]]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Plane center: ({:.4}, {:.4}, {:.4}), normal: ({:.4}, {:.4}, {:.4})\n",
        plane.center[0], plane.center[1], plane.center[2],
        plane.normal[0], plane.normal[1], plane.normal[2]
    ));
    if section.is_empty() {
        out.push_str("The plane does not cut the unit cell.\n");
        return out;
    }
    out.push_str(&format!("Section in the cell: {} vertices\n", section.len()));
    for p in section {
        out.push_str(&format!("  {:<10.4} {:<10.4} {:<10.4}\n", p[0], p[1], p[2]));
    }
    out
}

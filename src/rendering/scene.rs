// src/rendering/scene.rs
//
// Renderer-facing description of the current state: groups of primitives
// that a scene graph can show or hide independently.

use crate::config::RenderStyle;
use crate::model::{Bond, Species};
use crate::state::AppState;

/// Radius of the flattened discs used for projected atoms
pub const MARKER_RADIUS: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    Atoms,
    Bonds,
    InternalLines,
    AnionCell,
    CationCell,
    Plane,
    Projection,
}

#[derive(Debug, Clone)]
pub enum Primitive {
    Sphere {
        center: [f64; 3],
        radius: f64,
        color: (f64, f64, f64),
    },
    Line {
        start: [f64; 3],
        end: [f64; 3],
        color: (f64, f64, f64),
    },
    Plane {
        center: [f64; 3],
        normal: [f64; 3],
        size: f64,
        color: (f64, f64, f64),
        opacity: f64,
    },
    Label {
        anchor: [f64; 3],
        text: String,
    },
}

#[derive(Debug, Clone)]
pub struct SceneGroup {
    pub kind: GroupKind,
    pub visible: bool,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub groups: Vec<SceneGroup>,
    /// Rotation of the crystal group around the vertical axis, radians
    pub rotation: f64,
}

fn lines(bonds: &[Bond], color: (f64, f64, f64)) -> Vec<Primitive> {
    bonds
        .iter()
        .map(|b| Primitive::Line { start: b.start, end: b.end, color })
        .collect()
}

fn sphere(style: &RenderStyle, species: Species, center: [f64; 3], radius: Option<f64>) -> Primitive {
    let (r, color) = style.species_look(species);
    Primitive::Sphere { center, radius: radius.unwrap_or(r), color }
}

impl Scene {
    pub fn build(state: &AppState, style: &RenderStyle) -> Self {
        let geo = state.geometry();
        let projecting = state.is_projecting();

        // 1. Crystal
        let atoms: Vec<Primitive> = geo
            .atoms
            .iter()
            .map(|a| sphere(style, a.species, a.position, None))
            .collect();

        let (anion, cation) = match &geo.nested {
            Some(n) => (
                lines(&n.anion, style.anion_cell_color),
                lines(&n.cation, style.cation_cell_color),
            ),
            None => (Vec::new(), Vec::new()),
        };
        let nested_visible = state.show_nested_cells && geo.nested.is_some() && !projecting;

        // 2. Reticular plane, then its outline inside the cell
        let mut plane: Vec<Primitive> = Vec::new();
        if state.show_plane {
            if let Some(p) = state.reticular_plane() {
                plane.push(Primitive::Plane {
                    center: p.center,
                    normal: p.normal,
                    size: p.size,
                    color: style.plane_color,
                    opacity: style.plane_opacity,
                });
            }
            let section = state.plane_section();
            for (i, start) in section.iter().enumerate() {
                let end = section[(i + 1) % section.len()];
                plane.push(Primitive::Line { start: *start, end, color: style.plane_color });
            }
        }

        // 3. Projection: edges, discs, then labels
        let mut projection = Vec::new();
        if let Some(p) = state.projection() {
            for (start, end) in &p.edges {
                projection.push(Primitive::Line { start: *start, end: *end, color: style.bond_color });
            }
            for m in &p.markers {
                projection.push(sphere(style, m.species, m.position, Some(MARKER_RADIUS)));
                if !m.label.is_empty() {
                    projection.push(Primitive::Label { anchor: m.position, text: m.label.clone() });
                }
            }
        }

        let group = |kind: GroupKind, visible: bool, primitives: Vec<Primitive>| SceneGroup {
            kind,
            visible,
            primitives,
        };

        Scene {
            groups: vec![
                group(GroupKind::Atoms, !projecting, atoms),
                group(GroupKind::Bonds, !projecting, lines(&geo.bonds, style.bond_color)),
                group(
                    GroupKind::InternalLines,
                    state.show_internal_lines,
                    lines(&geo.internal_bonds, style.internal_bond_color),
                ),
                group(GroupKind::AnionCell, nested_visible, anion),
                group(GroupKind::CationCell, nested_visible, cation),
                group(GroupKind::Plane, !projecting, plane),
                group(GroupKind::Projection, projecting, projection),
            ],
            rotation: state.rotation,
        }
    }

    pub fn group(&self, kind: GroupKind) -> Option<&SceneGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    /// Primitives of all visible groups
    pub fn visible_primitives(&self) -> impl Iterator<Item = &Primitive> {
        self.groups
            .iter()
            .filter(|g| g.visible)
            .flat_map(|g| g.primitives.iter())
    }
}

// src/state.rs
//
// Single owner of everything the user can change. Each UI event maps to one
// method here; derived geometry is rebuilt before the method returns.

use log::{debug, info};

use crate::config::Config;
use crate::model::structure::ideal_hcp_c;
use crate::model::{CellParams, CrystalGeometry, MillerPlane, StructureType};
use crate::model::miller::ReticularPlane;
use crate::physics::{generate, project_geometry, Projection, ProjectionMode};

/// Rotation per frame at 50% speed, in radians
const NOMINAL_ROTATION_STEP: f64 = 0.005;

pub struct AppState {
    pub structure: StructureType,
    pub params: CellParams,
    pub show_internal_lines: bool,
    pub show_nested_cells: bool,
    pub projection_mode: ProjectionMode,
    pub plane: MillerPlane,
    pub show_plane: bool,
    pub is_animating: bool,
    pub rotation_step: f64,
    pub rotation: f64,

    geometry: CrystalGeometry,
    projection: Option<Projection>,
}

impl AppState {
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Self {
        let structure = config.structure;
        let a = if CellParams::cubic(config.lattice_a).is_valid() {
            config.lattice_a
        } else {
            CellParams::default().a
        };
        let params = synced_params(structure, a);

        let mut state = Self {
            structure,
            params,
            show_internal_lines: config.show_internal_lines && structure.has_internal_bonds(),
            show_nested_cells: config.show_nested_cells && structure.is_ionic(),
            projection_mode: config.projection_mode,
            plane: MillerPlane::new(0, 0, 1, 0),
            show_plane: false,
            is_animating: false,
            rotation_step: NOMINAL_ROTATION_STEP,
            rotation: 0.0,
            geometry: CrystalGeometry::empty(params),
            projection: None,
        };
        state.set_rotation_speed_percent(config.rotation_speed);
        state.rebuild();
        state
    }

    /// Writes the persistent part of the state back into a config.
    pub fn store_config(&self, config: &mut Config) {
        config.structure = self.structure;
        config.lattice_a = self.params.a;
        config.show_internal_lines = self.show_internal_lines;
        config.show_nested_cells = self.show_nested_cells;
        config.projection_mode = self.projection_mode;
        config.rotation_speed = self.rotation_step / NOMINAL_ROTATION_STEP * 50.0;
    }

    pub fn geometry(&self) -> &CrystalGeometry {
        &self.geometry
    }

    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn is_projecting(&self) -> bool {
        self.projection.is_some()
    }

    // --- Structure & parameters ---

    pub fn select_structure(&mut self, structure: StructureType) {
        info!("Structure: {}", structure.display_name());
        self.structure = structure;
        self.params = synced_params(structure, self.params.a);

        if !structure.has_internal_bonds() {
            self.show_internal_lines = false;
        }
        if !structure.is_ionic() {
            self.show_nested_cells = false;
        }

        self.projection = None;
        self.rebuild();
    }

    /// Editing a keeps b = a; c follows a on cubic cells and the ideal
    /// ratio on hexagonal ones.
    pub fn set_a(&mut self, a: f64) -> Result<(), String> {
        self.apply_params("a", a, synced_params(self.structure, a))
    }

    pub fn set_b(&mut self, b: f64) -> Result<(), String> {
        self.apply_params("b", b, synced_params(self.structure, b))
    }

    /// On cubic cells c drags a and b along; on hexagonal cells only c moves.
    pub fn set_c(&mut self, c: f64) -> Result<(), String> {
        let params = if self.structure.is_hexagonal() {
            CellParams { c, ..self.params }
        } else {
            CellParams::cubic(c)
        };
        self.apply_params("c", c, params)
    }

    // --- Toggles ---

    pub fn toggle_internal_lines(&mut self) -> bool {
        if self.structure.has_internal_bonds() {
            self.show_internal_lines = !self.show_internal_lines;
        }
        self.show_internal_lines
    }

    pub fn toggle_nested_cells(&mut self) -> bool {
        if self.structure.is_ionic() {
            self.show_nested_cells = !self.show_nested_cells;
            self.refresh();
        }
        self.show_nested_cells
    }

    // --- Planes & projection ---

    pub fn set_plane(&mut self, h: i32, k: i32, l: i32, offset: i32) {
        self.plane = MillerPlane::new(h, k, l, offset);
        if self.plane.is_degenerate() {
            self.show_plane = false;
        }
        if self.is_projecting() {
            self.show_projection();
        }
    }

    /// Shows the current plane in the 3D view. Returns false for (0 0 0),
    /// which has nothing to show.
    pub fn show_reticular_plane(&mut self) -> bool {
        self.show_plane = !self.plane.is_degenerate();
        self.show_plane
    }

    pub fn hide_reticular_plane(&mut self) {
        self.show_plane = false;
    }

    /// Placement of the current reticular plane; None for (0 0 0).
    pub fn reticular_plane(&self) -> Option<ReticularPlane> {
        self.plane.reticular_plane()
    }

    /// Polygon of the current plane inside the unit cell.
    pub fn plane_section(&self) -> Vec<[f64; 3]> {
        self.plane.cell_section(&self.geometry.bonds)
    }

    /// Projects the cell onto the current plane. A (0 0 0) plane is
    /// silently ignored and leaves the 3D view in place.
    pub fn show_projection(&mut self) -> Option<&Projection> {
        if self.plane.is_degenerate() {
            debug!("Projection skipped: (0 0 0) is not a plane");
            self.projection = None;
            return None;
        }
        self.projection = project_geometry(&self.geometry, &self.plane, self.projection_mode);
        self.projection.as_ref()
    }

    pub fn hide_projection(&mut self) {
        self.projection = None;
    }

    pub fn set_projection_mode(&mut self, mode: ProjectionMode) {
        self.projection_mode = mode;
        if self.is_projecting() {
            self.show_projection();
        }
    }

    // --- Animation ---

    pub fn toggle_animation(&mut self) -> bool {
        self.is_animating = !self.is_animating;
        self.is_animating
    }

    pub fn set_rotation_speed_percent(&mut self, percent: f64) {
        let percent = if percent.is_finite() { percent.max(0.0) } else { 50.0 };
        self.rotation_step = percent / 50.0 * NOMINAL_ROTATION_STEP;
    }

    /// Per-frame step. Spins the crystal only while animating in the 3D view.
    pub fn advance_frame(&mut self) -> f64 {
        if self.is_animating && !self.is_projecting() {
            self.rotation = (self.rotation + self.rotation_step) % std::f64::consts::TAU;
        }
        self.rotation
    }

    // --- Internals ---

    /// Commits new parameters if every length is positive and finite.
    fn apply_params(&mut self, name: &str, value: f64, params: CellParams) -> Result<(), String> {
        if !params.is_valid() {
            return Err(format!("Lattice parameter {} must be a positive length, got {}", name, value));
        }
        self.params = params;
        self.refresh();
        Ok(())
    }

    fn rebuild(&mut self) {
        self.geometry = generate(self.structure, &self.params, self.show_nested_cells);
    }

    /// Rebuild, then redo the projection if one is on screen.
    fn refresh(&mut self) {
        self.rebuild();
        if self.is_projecting() {
            self.show_projection();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn synced_params(structure: StructureType, a: f64) -> CellParams {
    if structure.is_hexagonal() {
        CellParams { a, b: a, c: ideal_hcp_c(a) }
    } else {
        CellParams::cubic(a)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SiteRole;

    #[test]
    fn test_cubic_constraint() {
        let mut st = AppState::new();
        st.select_structure(StructureType::NaCl);
        st.set_b(5.0).unwrap();
        assert_eq!(st.params, CellParams::cubic(5.0));
        st.set_c(6.0).unwrap();
        assert_eq!(st.params, CellParams::cubic(6.0));
        assert!((st.geometry().atoms[7].position[0] - 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_hexagonal_params() {
        let mut st = AppState::new();
        st.set_a(3.0).unwrap();
        st.select_structure(StructureType::Hexagonal);
        assert_eq!(st.params.b, 3.0);
        assert!((st.params.c - ideal_hcp_c(3.0)).abs() < 1e-12);

        st.set_c(5.5).unwrap();
        assert_eq!(st.params.a, 3.0);
        assert_eq!(st.params.c, 5.5);

        // a resets c to the ideal ratio
        st.set_a(2.0).unwrap();
        assert!((st.params.c - ideal_hcp_c(2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_length_rejected() {
        let mut st = AppState::new();
        assert!(st.set_a(-1.0).is_err());
        assert!(st.set_c(f64::INFINITY).is_err());
        assert_eq!(st.params, CellParams::cubic(4.0));
    }

    #[test]
    fn test_toggles_reset_on_structure_change() {
        let mut st = AppState::new();
        st.select_structure(StructureType::BodyCenteredCubic);
        assert!(st.toggle_internal_lines());
        st.select_structure(StructureType::FaceCenteredCubic);
        assert!(!st.show_internal_lines);
        assert!(!st.toggle_internal_lines());

        st.select_structure(StructureType::CsCl);
        assert!(st.toggle_nested_cells());
        assert!(st.geometry().nested.is_some());
        st.select_structure(StructureType::Hexagonal);
        assert!(!st.show_nested_cells);
        assert!(st.geometry().nested.is_none());
    }

    #[test]
    fn test_degenerate_plane_is_noop() {
        let mut st = AppState::new();
        st.set_plane(0, 0, 0, 1);
        assert!(st.show_projection().is_none());
        assert!(!st.is_projecting());
        assert!(st.reticular_plane().is_none());
        assert!(!st.show_reticular_plane());
        assert!(st.plane_section().is_empty());
    }

    #[test]
    fn test_show_hide_plane() {
        let mut st = AppState::new();
        st.set_a(4.0).unwrap();
        st.set_plane(1, 1, 1, 6);
        assert!(st.show_reticular_plane());
        assert_eq!(st.plane_section().len(), 6);
        st.hide_reticular_plane();
        assert!(!st.show_plane);
    }

    #[test]
    fn test_hexagonal_c_rejects_bad_value() {
        let mut st = AppState::new();
        st.select_structure(StructureType::Hexagonal);
        let before = st.params;
        assert!(st.set_c(0.0).is_err());
        assert_eq!(st.params, before);
    }

    #[test]
    fn test_nacl_projection_end_to_end() {
        let mut st = AppState::new();
        st.select_structure(StructureType::NaCl);
        st.set_a(4.0).unwrap();
        assert_eq!(st.geometry().count_role(SiteRole::Base), 14);
        assert_eq!(st.geometry().count_role(SiteRole::Site), 13);

        st.set_plane(0, 0, 1, 0);
        let markers = st.show_projection().map(|p| p.markers.len());
        assert_eq!(markers, Some(9));

        // Mode switch re-projects in place
        st.set_projection_mode(ProjectionMode::All);
        let members: usize = st
            .projection()
            .map(|p| p.markers.iter().map(|m| m.atom_indices.len()).sum())
            .unwrap_or(0);
        assert_eq!(members, 27);

        // Changing the structure leaves projection mode
        st.select_structure(StructureType::ZnS);
        assert!(!st.is_projecting());
    }

    #[test]
    fn test_animation_paused_while_projecting() {
        let mut st = AppState::new();
        st.set_rotation_speed_percent(100.0);
        assert!(st.toggle_animation());
        let r1 = st.advance_frame();
        assert!((r1 - 0.01).abs() < 1e-12);

        st.show_projection();
        assert_eq!(st.advance_frame(), r1);
        st.hide_projection();
        assert!(st.advance_frame() > r1);
    }

    #[test]
    fn test_config_roundtrip() {
        let mut st = AppState::new();
        st.select_structure(StructureType::Fluorite);
        st.toggle_nested_cells();
        st.set_projection_mode(ProjectionMode::Sites);

        let mut cfg = Config::default();
        st.store_config(&mut cfg);
        let restored = AppState::from_config(&cfg);
        assert_eq!(restored.structure, StructureType::Fluorite);
        assert!(restored.show_nested_cells);
        assert_eq!(restored.projection_mode, ProjectionMode::Sites);
        assert!((restored.rotation_step - st.rotation_step).abs() < 1e-15);
    }
}

// src/model/species.rs
use serde::{Deserialize, Serialize};

/// Chemical identity of a generated atom. Drives sphere color and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Metal,
    Chloride,
    Sodium,
    Cesium,
    Sulfide,
    Zinc,
    Calcium,
    Fluoride,
    Oxide,
}

/// Whether an atom sits on a lattice point or in an interstitial site.
/// Assigned when the atom is generated; projections filter on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteRole {
    Base,
    Site,
}

impl Species {
    /// Ion label as shown in legends, e.g. "Cl⁻"
    pub fn label(&self) -> &'static str {
        match self {
            Species::Metal => "M",
            Species::Chloride => "Cl⁻",
            Species::Sodium => "Na⁺",
            Species::Cesium => "Cs⁺",
            Species::Sulfide => "S²⁻",
            Species::Zinc => "Zn²⁺",
            Species::Calcium => "Ca²⁺",
            Species::Fluoride => "F⁻",
            Species::Oxide => "O²⁻",
        }
    }

    /// Key used for per-species color overrides in the config
    pub fn key(&self) -> &'static str {
        match self {
            Species::Metal => "metal",
            Species::Chloride => "Cl",
            Species::Sodium => "Na",
            Species::Cesium => "Cs",
            Species::Sulfide => "S",
            Species::Zinc => "Zn",
            Species::Calcium => "Ca",
            Species::Fluoride => "F",
            Species::Oxide => "O",
        }
    }
}

/// Returns (sphere_radius, (r, g, b)) for a species.
/// Radii are display sizes in scene units, not ionic radii.
pub fn get_species_properties(species: Species) -> (f64, (f64, f64, f64)) {
    match species {
        Species::Metal => (0.30, (0.29, 0.62, 1.00)),    // Blue
        Species::Chloride => (0.30, (0.30, 0.69, 0.31)), // Green
        Species::Sodium => (0.25, (0.29, 0.62, 1.00)),   // Blue
        Species::Cesium => (0.40, (0.61, 0.15, 0.69)),   // Purple
        Species::Sulfide => (0.30, (1.00, 0.65, 0.15)),  // Orange
        Species::Zinc => (0.25, (0.29, 0.62, 1.00)),     // Blue
        Species::Calcium => (0.35, (0.53, 0.53, 0.53)),  // Grey
        Species::Fluoride => (0.25, (0.00, 1.00, 0.00)), // Bright Green
        Species::Oxide => (0.35, (1.00, 0.42, 0.42)),    // Soft Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_colors_are_distinct_species() {
        // Na⁺ and Zn²⁺ share a color; identity must not depend on it.
        let (_, na) = get_species_properties(Species::Sodium);
        let (_, zn) = get_species_properties(Species::Zinc);
        assert_eq!(na, zn);
        assert_ne!(Species::Sodium, Species::Zinc);
    }
}

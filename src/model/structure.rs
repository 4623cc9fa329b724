// src/model/structure.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::species::{SiteRole, Species};

/// The unit cells the generator knows how to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructureType {
    #[default]
    SimpleCubic,
    BodyCenteredCubic,
    FaceCenteredCubic,
    NaCl,
    CsCl,
    ZnS,
    Hexagonal,
    Fluorite,
    Antifluorite,
}

impl StructureType {
    pub const ALL: [StructureType; 9] = [
        StructureType::SimpleCubic,
        StructureType::BodyCenteredCubic,
        StructureType::FaceCenteredCubic,
        StructureType::NaCl,
        StructureType::CsCl,
        StructureType::ZnS,
        StructureType::Hexagonal,
        StructureType::Fluorite,
        StructureType::Antifluorite,
    ];

    /// Stable identifier, also accepted by `FromStr`.
    pub fn id(&self) -> &'static str {
        match self {
            StructureType::SimpleCubic => "simple-cubic",
            StructureType::BodyCenteredCubic => "body-centered-cubic",
            StructureType::FaceCenteredCubic => "face-centered-cubic",
            StructureType::NaCl => "nacl",
            StructureType::CsCl => "cscl",
            StructureType::ZnS => "zns",
            StructureType::Hexagonal => "hexagonal",
            StructureType::Fluorite => "fluorite",
            StructureType::Antifluorite => "antifluorite",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StructureType::SimpleCubic => "Simple Cubic (SC)",
            StructureType::BodyCenteredCubic => "Body-Centered Cubic (BCC)",
            StructureType::FaceCenteredCubic => "Face-Centered Cubic (FCC)",
            StructureType::NaCl => "Sodium Chloride (NaCl)",
            StructureType::CsCl => "Cesium Chloride (CsCl)",
            StructureType::ZnS => "Zinc Sulfide (ZnS, zincblende)",
            StructureType::Hexagonal => "Hexagonal Close-Packed (HCP)",
            StructureType::Fluorite => "Fluorite (CaF₂)",
            StructureType::Antifluorite => "Antifluorite (Na₂O)",
        }
    }

    pub fn space_group(&self) -> &'static str {
        match self {
            StructureType::SimpleCubic | StructureType::CsCl => "Pm-3m",
            StructureType::BodyCenteredCubic => "Im-3m",
            StructureType::FaceCenteredCubic
            | StructureType::NaCl
            | StructureType::Fluorite
            | StructureType::Antifluorite => "Fm-3m",
            StructureType::ZnS => "F-43m",
            StructureType::Hexagonal => "P6₃/mmc",
        }
    }

    /// Two-species structures; only these get the nested cell overlay
    /// and a base/site split in projections.
    pub fn is_ionic(&self) -> bool {
        matches!(
            self,
            StructureType::NaCl
                | StructureType::CsCl
                | StructureType::ZnS
                | StructureType::Fluorite
                | StructureType::Antifluorite
        )
    }

    pub fn is_hexagonal(&self) -> bool {
        matches!(self, StructureType::Hexagonal)
    }

    pub fn has_internal_bonds(&self) -> bool {
        matches!(self, StructureType::BodyCenteredCubic | StructureType::Hexagonal)
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.trim().to_lowercase().as_str() {
            "simple-cubic" | "sc" | "cubique-simple" => StructureType::SimpleCubic,
            "body-centered-cubic" | "bcc" | "cubique-centre" => StructureType::BodyCenteredCubic,
            "face-centered-cubic" | "fcc" | "cubique-faces-centrees" => {
                StructureType::FaceCenteredCubic
            }
            "nacl" | "ionique-nacl" => StructureType::NaCl,
            "cscl" | "ionique-csz" => StructureType::CsCl,
            "zns" | "zincblende" | "ionique-zns" => StructureType::ZnS,
            "hexagonal" | "hcp" => StructureType::Hexagonal,
            "fluorite" | "fluorine" | "caf2" => StructureType::Fluorite,
            "antifluorite" | "antifluorine" | "na2o" => StructureType::Antifluorite,
            other => return Err(format!("Unknown structure type '{}'", other)),
        };
        Ok(t)
    }
}

/// Lattice lengths in Angstroms. Hexagonal cells use a fixed 120° angle
/// between a and b.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellParams {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl CellParams {
    pub fn cubic(a: f64) -> Self {
        Self { a, b: a, c: a }
    }

    /// a = b, c defaults to the ideal close-packed ratio.
    pub fn hexagonal(a: f64) -> Self {
        Self { a, b: a, c: ideal_hcp_c(a) }
    }

    pub fn is_valid(&self) -> bool {
        [self.a, self.b, self.c]
            .iter()
            .all(|v| v.is_finite() && *v > 0.0)
    }
}

impl Default for CellParams {
    fn default() -> Self {
        Self::cubic(4.0)
    }
}

/// c = 2a·√(2/3) for touching spheres in ABAB stacking.
pub fn ideal_hcp_c(a: f64) -> f64 {
    2.0 * a * (2.0f64 / 3.0).sqrt()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Atom {
    pub species: Species,
    pub role: SiteRole,
    /// Cartesian position in Angstroms
    pub position: [f64; 3],
    /// Fractional position the atom was generated from
    pub fractional: [f64; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondKind {
    CellEdge,
    Internal,
    AnionCell,
    CationCell,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bond {
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub kind: BondKind,
}

/// Edges of the two interpenetrating sub-cells of an ionic structure.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NestedCells {
    pub anion: Vec<Bond>,
    pub cation: Vec<Bond>,
}

/// Everything the generator derives for one unit cell.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrystalGeometry {
    pub structure: Option<StructureType>,
    pub params: CellParams,
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    pub internal_bonds: Vec<Bond>,
    pub nested: Option<NestedCells>,
}

impl CrystalGeometry {
    /// What an unrecognised structure produces: nothing to draw.
    pub fn empty(params: CellParams) -> Self {
        Self {
            structure: None,
            params,
            lattice: [[0.0; 3]; 3],
            atoms: Vec::new(),
            bonds: Vec::new(),
            internal_bonds: Vec::new(),
            nested: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty() && self.bonds.is_empty()
    }

    pub fn count_role(&self, role: SiteRole) -> usize {
        self.atoms.iter().filter(|a| a.role == role).count()
    }

    pub fn count_species(&self, species: Species) -> usize {
        self.atoms.iter().filter(|a| a.species == species).count()
    }
}

// src/physics/lattice.rs
//
// Unit cell generator. Every structure is described by a template: a list of
// fractional sites tagged with species and role, plus shared edge tables.
// A single routine turns any template into Cartesian geometry.

use log::{debug, warn};

use crate::model::{
    Atom, Bond, BondKind, CellParams, CrystalGeometry, NestedCells, SiteRole, Species,
    StructureType,
};
use crate::utils::geometry::{in_unit_box, translate};
use crate::utils::linalg::{frac_to_cart, hexagonal_lattice, orthogonal_lattice};

type Frac = [f64; 3];
type FracEdge = (Frac, Frac);

/// Fractional tolerance for the nested cell filter (0.001·a)
pub const NESTED_TOLERANCE: f64 = 1e-3;

const CORNERS: [Frac; 8] = [
    [0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0, 1.0],
    [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0],
];

const FACE_CENTERS: [Frac; 6] = [
    [0.5, 0.5, 0.0], [0.5, 0.5, 1.0],
    [0.5, 0.0, 0.5], [0.5, 1.0, 0.5],
    [0.0, 0.5, 0.5], [1.0, 0.5, 0.5],
];

const BODY_CENTER: Frac = [0.5, 0.5, 0.5];

// Octahedral sites on the cube edges
const EDGE_MIDPOINTS: [Frac; 12] = [
    [0.5, 0.0, 0.0], [0.5, 0.0, 1.0], [0.0, 0.5, 0.0], [1.0, 0.5, 0.0],
    [0.0, 0.0, 0.5], [1.0, 0.0, 0.5], [0.0, 1.0, 0.5], [1.0, 1.0, 0.5],
    [0.5, 1.0, 0.0], [0.5, 1.0, 1.0], [1.0, 0.5, 1.0], [0.0, 0.5, 1.0],
];

// The first four form one alternating set (zincblende), all eight are
// occupied in fluorite.
const TETRAHEDRAL_SITES: [Frac; 8] = [
    [0.25, 0.25, 0.25], [0.75, 0.75, 0.25],
    [0.75, 0.25, 0.75], [0.25, 0.75, 0.75],
    [0.75, 0.75, 0.75], [0.25, 0.25, 0.75],
    [0.25, 0.75, 0.25], [0.75, 0.25, 0.25],
];

const CUBE_EDGES: [FracEdge; 12] = [
    ([0.0, 0.0, 0.0], [1.0, 0.0, 0.0]), ([0.0, 0.0, 1.0], [1.0, 0.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]), ([1.0, 0.0, 0.0], [1.0, 0.0, 1.0]),
    ([0.0, 1.0, 0.0], [1.0, 1.0, 0.0]), ([0.0, 1.0, 1.0], [1.0, 1.0, 1.0]),
    ([0.0, 1.0, 0.0], [0.0, 1.0, 1.0]), ([1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
    ([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]), ([1.0, 0.0, 0.0], [1.0, 1.0, 0.0]),
    ([0.0, 0.0, 1.0], [0.0, 1.0, 1.0]), ([1.0, 0.0, 1.0], [1.0, 1.0, 1.0]),
];

// Hexagonal cell: rhombus corners at w=0 and w=1
const HEX_CORNERS: [Frac; 8] = [
    [-1.0, -1.0, 0.0], [0.0, -1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 0.0],
    [-1.0, -1.0, 1.0], [0.0, -1.0, 1.0], [-1.0, 0.0, 1.0], [0.0, 0.0, 1.0],
];

// B layer atom of the ABAB stacking
const HEX_MID_LAYER: Frac = [-1.0 / 3.0, -2.0 / 3.0, 0.5];

const HEX_EDGES: [FracEdge; 12] = [
    // base rhombus
    ([-1.0, -1.0, 0.0], [0.0, -1.0, 0.0]), ([-1.0, -1.0, 0.0], [-1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [0.0, 0.0, 0.0]), ([-1.0, 0.0, 0.0], [0.0, 0.0, 0.0]),
    // top rhombus
    ([-1.0, -1.0, 1.0], [0.0, -1.0, 1.0]), ([-1.0, -1.0, 1.0], [-1.0, 0.0, 1.0]),
    ([0.0, -1.0, 1.0], [0.0, 0.0, 1.0]), ([-1.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
    // vertical
    ([-1.0, -1.0, 0.0], [-1.0, -1.0, 1.0]), ([0.0, -1.0, 0.0], [0.0, -1.0, 1.0]),
    ([-1.0, 0.0, 0.0], [-1.0, 0.0, 1.0]), ([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

struct Template {
    lattice: [[f64; 3]; 3],
    sites: Vec<(Frac, Species, SiteRole)>,
    edges: Vec<FracEdge>,
    internal: Vec<FracEdge>,
}

impl Template {
    fn cubic(params: &CellParams) -> Self {
        Self {
            lattice: orthogonal_lattice(params),
            sites: Vec::new(),
            edges: CUBE_EDGES.to_vec(),
            internal: Vec::new(),
        }
    }

    fn with_sites(mut self, sites: &[Frac], species: Species, role: SiteRole) -> Self {
        self.sites.extend(sites.iter().map(|f| (*f, species, role)));
        self
    }

    /// Spokes from each listed point to `hub`
    fn with_spokes(mut self, points: &[Frac], hub: Frac) -> Self {
        self.internal.extend(points.iter().map(|p| (*p, hub)));
        self
    }
}

fn fcc_sites() -> Vec<Frac> {
    CORNERS.iter().chain(FACE_CENTERS.iter()).copied().collect()
}

/// Fluorite and antifluorite differ only in which species sits where.
fn fluorite_template(params: &CellParams, lattice_species: Species, site_species: Species) -> Template {
    Template::cubic(params)
        .with_sites(&fcc_sites(), lattice_species, SiteRole::Base)
        .with_sites(&TETRAHEDRAL_SITES, site_species, SiteRole::Site)
}

fn template(structure: StructureType, params: &CellParams) -> Template {
    match structure {
        StructureType::SimpleCubic => {
            Template::cubic(params).with_sites(&CORNERS, Species::Metal, SiteRole::Base)
        }
        StructureType::BodyCenteredCubic => Template::cubic(params)
            .with_sites(&CORNERS, Species::Metal, SiteRole::Base)
            .with_sites(&[BODY_CENTER], Species::Metal, SiteRole::Base)
            .with_spokes(&CORNERS, BODY_CENTER),
        StructureType::FaceCenteredCubic => {
            Template::cubic(params).with_sites(&fcc_sites(), Species::Metal, SiteRole::Base)
        }
        StructureType::NaCl => Template::cubic(params)
            .with_sites(&fcc_sites(), Species::Chloride, SiteRole::Base)
            .with_sites(&[BODY_CENTER], Species::Sodium, SiteRole::Site)
            .with_sites(&EDGE_MIDPOINTS, Species::Sodium, SiteRole::Site),
        StructureType::CsCl => Template::cubic(params)
            .with_sites(&CORNERS, Species::Chloride, SiteRole::Base)
            .with_sites(&[BODY_CENTER], Species::Cesium, SiteRole::Site),
        StructureType::ZnS => Template::cubic(params)
            .with_sites(&fcc_sites(), Species::Sulfide, SiteRole::Base)
            .with_sites(&TETRAHEDRAL_SITES[..4], Species::Zinc, SiteRole::Site),
        StructureType::Fluorite => fluorite_template(params, Species::Calcium, Species::Fluoride),
        StructureType::Antifluorite => fluorite_template(params, Species::Oxide, Species::Sodium),
        StructureType::Hexagonal => Template {
            lattice: hexagonal_lattice(params),
            sites: Vec::new(),
            edges: HEX_EDGES.to_vec(),
            internal: Vec::new(),
        }
        .with_sites(&HEX_CORNERS, Species::Metal, SiteRole::Base)
        .with_sites(&[HEX_MID_LAYER], Species::Metal, SiteRole::Base)
        .with_spokes(&HEX_CORNERS, HEX_MID_LAYER),
    }
}

fn to_bonds(edges: &[FracEdge], lattice: [[f64; 3]; 3], kind: BondKind) -> Vec<Bond> {
    edges
        .iter()
        .map(|(s, e)| Bond {
            start: frac_to_cart(*s, lattice),
            end: frac_to_cart(*e, lattice),
            kind,
        })
        .collect()
}

fn nested_cells(lattice: [[f64; 3]; 3]) -> NestedCells {
    let shifted: Vec<FracEdge> = CUBE_EDGES
        .iter()
        .map(|(s, e)| (translate(*s, BODY_CENTER), translate(*e, BODY_CENTER)))
        .collect();

    NestedCells {
        anion: to_bonds(&CUBE_EDGES, lattice, BondKind::AnionCell),
        cation: to_bonds(&shifted, lattice, BondKind::CationCell),
    }
}

/// Builds the unit cell of `structure`.
///
/// With `nested` set on an ionic structure, the anion and cation sub-cell
/// edges are added and atoms are restricted to the closed primary cell.
/// The flag is ignored for single-species structures.
pub fn generate(structure: StructureType, params: &CellParams, nested: bool) -> CrystalGeometry {
    let tpl = template(structure, params);
    let lattice = tpl.lattice;
    let nested = nested && structure.is_ionic();

    let atoms: Vec<Atom> = tpl
        .sites
        .iter()
        .filter(|(frac, _, _)| !nested || in_unit_box(*frac, NESTED_TOLERANCE))
        .map(|(frac, species, role)| Atom {
            species: *species,
            role: *role,
            position: frac_to_cart(*frac, lattice),
            fractional: *frac,
        })
        .collect();

    let geometry = CrystalGeometry {
        structure: Some(structure),
        params: *params,
        lattice,
        atoms,
        bonds: to_bonds(&tpl.edges, lattice, BondKind::CellEdge),
        internal_bonds: to_bonds(&tpl.internal, lattice, BondKind::Internal),
        nested: if nested { Some(nested_cells(lattice)) } else { None },
    };

    debug!(
        "Generated {} (a={:.2}, c={:.2}): {} atoms, {} edges, {} internal bonds",
        structure,
        params.a,
        params.c,
        geometry.atoms.len(),
        geometry.bonds.len(),
        geometry.internal_bonds.len()
    );

    geometry
}

/// Like [`generate`], but from a structure name coming from a selector.
/// Unknown names give an empty geometry instead of an error.
pub fn generate_named(name: &str, params: &CellParams, nested: bool) -> CrystalGeometry {
    match name.parse::<StructureType>() {
        Ok(structure) => generate(structure, params, nested),
        Err(e) => {
            warn!("{}; nothing to build", e);
            CrystalGeometry::empty(*params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 3], b: [f64; 3]) -> bool {
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-9)
    }

    fn params_for(structure: StructureType) -> CellParams {
        if structure.is_hexagonal() {
            CellParams::hexagonal(3.0)
        } else {
            CellParams::cubic(4.0)
        }
    }

    #[test]
    fn test_atom_counts() {
        let expected = [
            (StructureType::SimpleCubic, 8),
            (StructureType::BodyCenteredCubic, 9),
            (StructureType::FaceCenteredCubic, 14),
            (StructureType::NaCl, 27),
            (StructureType::CsCl, 9),
            (StructureType::ZnS, 18),
            (StructureType::Hexagonal, 9),
            (StructureType::Fluorite, 22),
            (StructureType::Antifluorite, 22),
        ];
        for (structure, count) in expected {
            let geo = generate(structure, &params_for(structure), false);
            assert_eq!(geo.atoms.len(), count, "{}", structure);
            assert_eq!(geo.bonds.len(), 12, "{}", structure);
        }
    }

    #[test]
    fn test_internal_bonds() {
        for structure in StructureType::ALL {
            let geo = generate(structure, &params_for(structure), false);
            let expected = if structure.has_internal_bonds() { 8 } else { 0 };
            assert_eq!(geo.internal_bonds.len(), expected, "{}", structure);
        }
    }

    #[test]
    fn test_bcc_spokes_meet_at_center() {
        let geo = generate(StructureType::BodyCenteredCubic, &CellParams::cubic(2.0), false);
        assert!(geo.internal_bonds.iter().all(|b| close(b.end, [1.0, 1.0, 1.0])));
    }

    #[test]
    fn test_nacl_sublattices() {
        let geo = generate(StructureType::NaCl, &CellParams::cubic(4.0), false);
        assert_eq!(geo.count_species(Species::Chloride), 14);
        assert_eq!(geo.count_species(Species::Sodium), 13);
        assert_eq!(geo.count_role(SiteRole::Base), 14);
        assert_eq!(geo.count_role(SiteRole::Site), 13);
        assert!(geo
            .atoms
            .iter()
            .any(|a| a.species == Species::Sodium && close(a.position, [2.0, 2.0, 2.0])));
    }

    #[test]
    fn test_zns_half_tetrahedral() {
        let geo = generate(StructureType::ZnS, &CellParams::cubic(4.0), false);
        let zn: Vec<_> = geo.atoms.iter().filter(|a| a.species == Species::Zinc).collect();
        assert_eq!(zn.len(), 4);
        // No two Zn share a tetrahedron edge: every pair differs in exactly two axes
        for (i, a) in zn.iter().enumerate() {
            for b in zn.iter().skip(i + 1) {
                let differing = (0..3).filter(|k| (a.fractional[*k] - b.fractional[*k]).abs() > 1e-9).count();
                assert_eq!(differing, 2);
            }
        }
    }

    #[test]
    fn test_fluorite_antifluorite_swap() {
        let p = CellParams::cubic(5.0);
        let fl = generate(StructureType::Fluorite, &p, false);
        let anti = generate(StructureType::Antifluorite, &p, false);
        assert_eq!(fl.count_species(Species::Calcium), 14);
        assert_eq!(fl.count_species(Species::Fluoride), 8);
        assert_eq!(anti.count_species(Species::Oxide), 14);
        assert_eq!(anti.count_species(Species::Sodium), 8);
        for (x, y) in fl.atoms.iter().zip(anti.atoms.iter()) {
            assert!(close(x.position, y.position));
            assert_eq!(x.role, y.role);
        }
    }

    #[test]
    fn test_hexagonal_layers() {
        let p = CellParams { a: 3.0, b: 3.0, c: 5.0 };
        let geo = generate(StructureType::Hexagonal, &p, false);
        let bottom = geo.atoms.iter().filter(|a| a.position[2].abs() < 1e-9).count();
        let top = geo.atoms.iter().filter(|a| (a.position[2] - 5.0).abs() < 1e-9).count();
        let mid = geo.atoms.iter().filter(|a| (a.position[2] - 2.5).abs() < 1e-9).count();
        assert_eq!((bottom, top, mid), (4, 4, 1));
        // Rhombus edges all have length a
        for bond in &geo.bonds[..8] {
            let d = crate::utils::geometry::calculate_distance(bond.start, bond.end);
            assert!((d - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_nested_overlay() {
        let a = 4.0;
        let geo = generate(StructureType::NaCl, &CellParams::cubic(a), true);
        let nested = geo.nested.as_ref().expect("overlay for ionic structure");
        assert_eq!(nested.anion.len(), 12);
        assert_eq!(nested.cation.len(), 12);
        assert!(nested.cation.iter().any(|b| close(b.start, [2.0, 2.0, 2.0])));
        assert!(nested.cation.iter().any(|b| close(b.end, [6.0, 6.0, 6.0])));

        let eps = NESTED_TOLERANCE * a;
        for atom in &geo.atoms {
            assert!(atom.position.iter().all(|x| *x >= -eps && *x <= a + eps));
        }
    }

    #[test]
    fn test_nested_ignored_for_metals() {
        let geo = generate(StructureType::FaceCenteredCubic, &CellParams::cubic(4.0), true);
        assert!(geo.nested.is_none());
        assert_eq!(geo.atoms.len(), 14);
    }

    #[test]
    fn test_unknown_name_is_empty() {
        let geo = generate_named("perovskite", &CellParams::cubic(4.0), false);
        assert!(geo.is_empty());
        assert!(geo.structure.is_none());

        let geo = generate_named("ionique-zns", &CellParams::cubic(4.0), false);
        assert_eq!(geo.atoms.len(), 18);
    }
}

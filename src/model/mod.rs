//src/model/mod.rs
pub mod miller;
pub mod species;
pub mod structure;

// Re-exports for cleaner imports
pub use miller::MillerPlane;
pub use species::{get_species_properties, SiteRole, Species};
pub use structure::{
    Atom, Bond, BondKind, CellParams, CrystalGeometry, NestedCells, StructureType,
};

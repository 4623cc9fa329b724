//! Geometry behind a unit cell viewer: cubic, ionic and hexagonal cells,
//! reticular planes and projections of a cell onto a plane with
//! fraction-labelled heights.

pub mod config;
pub mod model;
pub mod physics;
pub mod rendering;
pub mod state;
pub mod utils;

pub use config::{Config, RenderStyle};
pub use model::{Atom, Bond, CellParams, CrystalGeometry, MillerPlane, StructureType};
pub use physics::{Projection, ProjectionMode};
pub use state::AppState;

pub mod lattice;
pub mod projection;

pub use lattice::{generate, generate_named};
pub use projection::{
    format_distance, project, project_edges, project_geometry, signed_distance, Projection,
    ProjectionMarker, ProjectionMode,
};

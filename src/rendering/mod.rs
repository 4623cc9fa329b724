pub mod export;
pub mod scene;

// Re-export specific functions to keep the API clean for the rest of the app
pub use export::{draw_projection, export_projection_svg};
pub use scene::{GroupKind, Primitive, Scene, SceneGroup};

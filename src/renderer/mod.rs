//! WebGPU rendering module
//!
//! The scene is built as a flat triangle list in world space each frame and
//! mapped to the viewport on upload.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderInitError, RenderState, world_to_ndc};
pub use scene::build_scene;
pub use vertex::Vertex;

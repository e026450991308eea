//! Rendering module
//!
//! `scene` turns the game state into a vertex-colored triangle list in
//! virtual units; `pipeline` presents that list with WebGPU.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{Letterbox, RenderState};
pub use vertex::Vertex;

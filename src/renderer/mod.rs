//! WebGPU rendering module
//!
//! `scene` builds triangle geometry from the game state; `pipeline` uploads
//! and draws it.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;

//! Resource management
//!
//! Generated meshes and cube map textures.

mod mesh;
mod texture;

pub use mesh::*;
pub use texture::*;

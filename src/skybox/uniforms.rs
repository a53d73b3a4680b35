//! Uniform payload shared by both skybox shader stages

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

/// Per-frame skybox constants.
///
/// glam matrices are column-major, the storage order of WGSL's
/// `mat4x4<f32>`, so the payload is uploaded without transposing.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub world: Mat4,
    pub view: Mat4,
    pub projection: Mat4,
    /// Only `x` is read: 0 is full day, 1 is full evening
    pub day_progress: Vec4,
}

// Uniform buffers are bound in 16-byte units
const _: () = assert!(std::mem::size_of::<SkyboxUniforms>() % 16 == 0);

impl Default for SkyboxUniforms {
    fn default() -> Self {
        Self {
            world: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            day_progress: Vec4::ZERO,
        }
    }
}

impl SkyboxUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(world: Mat4, view: Mat4, projection: Mat4, day_progress: f32) -> Self {
        Self {
            world,
            view,
            projection,
            day_progress: Vec4::new(day_progress, 0.0, 0.0, 0.0),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_size_is_16_byte_multiple() {
        assert_eq!(SkyboxUniforms::SIZE, 208);
        assert_eq!(SkyboxUniforms::SIZE % 16, 0);
    }

    #[test]
    fn test_field_offsets_match_wgsl_layout() {
        let uniforms = SkyboxUniforms::new(
            Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0)),
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            0.25,
        );
        let floats: &[f32] = bytemuck::cast_slice(uniforms.as_bytes());

        // Translation lives in the fourth column: floats 12..15 of the first matrix
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
        // day_progress starts right after three matrices
        assert_eq!(&floats[48..52], &[0.25, 0.0, 0.0, 0.0]);
    }
}

//! Resources shared by everything that draws in a scene

use glam::Mat4;

use crate::backend::{BackendResult, GraphicsBackend, SamplerDescriptor, SamplerHandle};

/// Projection matrix and common sampler states.
///
/// Owned by the host and passed by reference to every renderer that needs it.
pub struct SharedResources {
    projection: Mat4,
    linear_clamp: SamplerHandle,
}

impl SharedResources {
    pub fn new<B: GraphicsBackend>(backend: &mut B, projection: Mat4) -> BackendResult<Self> {
        let linear_clamp = backend.create_sampler(&SamplerDescriptor::linear_clamp())?;
        log::debug!("Created shared linear clamp sampler");

        Ok(Self {
            projection,
            linear_clamp,
        })
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Linear min/mag/mip filtering, clamped on every axis
    pub fn linear_clamp(&self) -> SamplerHandle {
        self.linear_clamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{AddressMode, FilterMode, HeadlessBackend};

    #[test]
    fn test_linear_clamp_sampler_state() {
        let mut backend = HeadlessBackend::new(64, 64);
        let shared = SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();

        let desc = backend.sampler_descriptor(shared.linear_clamp()).unwrap();
        assert_eq!(desc.filter, FilterMode::Linear);
        assert_eq!(desc.address_mode, AddressMode::ClampToEdge);
    }

    #[test]
    fn test_set_projection() {
        let mut backend = HeadlessBackend::new(64, 64);
        let mut shared = SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();
        let projection = Mat4::perspective_rh(1.0, 2.0, 0.1, 10.0);

        shared.set_projection(projection);
        assert_eq!(shared.projection(), projection);
    }
}

//! Frame host tying the skybox to a backend, a camera and the frame loop

use glam::Mat4;

use crate::backend::*;
use crate::scene::{
    Camera, CameraInput, ControllerSet, FreeFlyController, OrbitController, SharedResources,
};
use crate::skybox::{SkyboxError, SkyboxRenderer, SkyboxTargets};
use crate::EngineConfig;

struct DepthTarget {
    texture: TextureHandle,
    view: TextureViewHandle,
}

/// Owns the backend and everything drawn with it for the lifetime of the app
pub struct Engine<B: GraphicsBackend> {
    backend: B,
    config: EngineConfig,
    camera: Camera,
    controllers: ControllerSet,
    shared: SharedResources,
    skybox: SkyboxRenderer,
    depth: Option<DepthTarget>,
    width: u32,
    height: u32,
}

impl<B: GraphicsBackend> Engine<B> {
    /// Initialize the scene on an already created backend
    pub fn new(mut backend: B, config: EngineConfig) -> Result<Self, SkyboxError> {
        let (width, height) = backend.surface_size();

        let mut camera = Camera::default();
        camera.set_aspect(width as f32, height as f32);

        let controllers = ControllerSet::new()
            .with(OrbitController::default())
            .with(FreeFlyController::default());

        let shared = SharedResources::new(&mut backend, camera.projection_matrix())?;

        let skybox_config = config
            .skybox
            .clone()
            .with_color_format(backend.swapchain_format());
        let mut skybox = SkyboxRenderer::new(&mut backend, &shared, skybox_config)?;
        skybox.set_day_progress(config.day_progress);

        let depth = Self::create_depth_target(&mut backend, skybox.config().depth_format, width, height)?;

        log::info!("Engine initialized at {}x{}", width, height);

        Ok(Self {
            backend,
            config,
            camera,
            controllers,
            shared,
            skybox,
            depth,
            width,
            height,
        })
    }

    fn create_depth_target(
        backend: &mut B,
        format: Option<TextureFormat>,
        width: u32,
        height: u32,
    ) -> BackendResult<Option<DepthTarget>> {
        let Some(format) = format else {
            return Ok(None);
        };

        let texture = backend.create_texture(&TextureDescriptor {
            label: Some("Depth Buffer".into()),
            width,
            height,
            format,
            usage: TextureUsage::RENDER_ATTACHMENT,
            ..Default::default()
        })?;
        let view = backend.create_texture_view(texture, TextureViewDimension::D2)?;

        Ok(Some(DepthTarget { texture, view }))
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) -> BackendResult<()> {
        if width == 0 || height == 0 {
            return Ok(());
        }

        self.backend.resize(width, height);

        // The backend may clamp the size to device limits
        let (actual_width, actual_height) = self.backend.surface_size();
        if actual_width == self.width && actual_height == self.height {
            return Ok(());
        }

        self.width = actual_width;
        self.height = actual_height;
        self.camera.set_aspect(actual_width as f32, actual_height as f32);
        self.shared.set_projection(self.camera.projection_matrix());

        if let Some(old) = self.depth.take() {
            self.backend.destroy_texture(old.texture);
        }
        self.depth = Self::create_depth_target(
            &mut self.backend,
            self.skybox.config().depth_format,
            actual_width,
            actual_height,
        )?;

        Ok(())
    }

    /// Move the camera from input, then advance the skybox
    pub fn update(&mut self, dt: f32, input: &CameraInput) {
        self.controllers.update(&mut self.camera, input, dt);
        self.skybox
            .update(&mut self.backend, dt, &self.camera, &self.shared);
    }

    /// Draw and present one frame
    pub fn render(&mut self) -> BackendResult<()> {
        let frame = self.backend.begin_frame()?;

        let mut targets = SkyboxTargets::new(frame.swapchain_view).with_clear(self.config.clear_color);
        if let Some(depth) = &self.depth {
            targets = targets.with_depth(depth.view);
        }
        self.skybox.render(&mut self.backend, &targets);

        self.backend.end_frame()
    }

    /// Release the scene and hand the backend back
    pub fn shutdown(mut self) -> B {
        if let Some(depth) = self.depth.take() {
            self.backend.destroy_texture(depth.texture);
        }
        self.skybox.finalize(&mut self.backend);
        self.backend
    }

    pub fn switch_camera_controller(&mut self) -> &'static str {
        self.controllers.switch_next(&self.camera);
        self.controllers.active_name()
    }

    /// Nudge the time of day, keeping it inside [0, 1]
    pub fn adjust_day_progress(&mut self, delta: f32) -> f32 {
        let progress = self.skybox.day_progress() + delta;
        self.skybox.set_day_progress(progress);
        self.skybox.day_progress()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn skybox(&self) -> &SkyboxRenderer {
        &self.skybox
    }

    pub fn skybox_mut(&mut self) -> &mut SkyboxRenderer {
        &mut self.skybox
    }

    pub fn projection(&self) -> Mat4 {
        self.shared.projection()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

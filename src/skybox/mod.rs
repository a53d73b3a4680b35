//! Rotating skybox that blends a day and an evening cube map.
//!
//! The renderer follows the scene lifecycle: create it once with
//! [`SkyboxRenderer::new`], call [`SkyboxRenderer::update`] and then
//! [`SkyboxRenderer::render`] every frame, and release it with
//! [`SkyboxRenderer::finalize`]. Everything it depends on (backend, camera,
//! shared resources) is passed in by the caller.

mod config;
mod error;
pub mod shader;
mod uniforms;

pub use config::*;
pub use error::SkyboxError;
pub use uniforms::SkyboxUniforms;

use glam::Mat4;

use crate::backend::*;
use crate::resources::{GpuCubeMap, GpuMesh, Mesh};
use crate::scene::{Camera, SharedResources};

/// Where the skybox is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct SkyboxTargets {
    pub color: TextureViewHandle,
    pub depth: Option<TextureViewHandle>,
    pub color_load: LoadOp<[f32; 4]>,
    pub depth_load: LoadOp<f32>,
}

impl SkyboxTargets {
    /// Draw over the existing contents of `color`
    pub fn new(color: TextureViewHandle) -> Self {
        Self {
            color,
            depth: None,
            color_load: LoadOp::Load,
            depth_load: LoadOp::Load,
        }
    }

    pub fn with_depth(mut self, depth: TextureViewHandle) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Clear color and depth before drawing
    pub fn with_clear(mut self, color: [f32; 4]) -> Self {
        self.color_load = LoadOp::Clear(color);
        self.depth_load = LoadOp::Clear(1.0);
        self
    }
}

/// Day/evening skybox renderer
pub struct SkyboxRenderer {
    config: SkyboxConfig,
    pipeline: RenderPipelineHandle,
    bind_group: BindGroupHandle,
    uniform_buffer: BufferHandle,
    mesh: GpuMesh,
    day_cube_map: GpuCubeMap,
    /// `None` when both slots use the day cube map
    evening_cube_map: Option<GpuCubeMap>,
    uniforms: SkyboxUniforms,
    angle: f32,
    day_progress: f32,
}

impl SkyboxRenderer {
    /// Create every GPU resource the skybox needs.
    ///
    /// Any failure is fatal for the skybox and is returned as is.
    pub fn new<B: GraphicsBackend>(
        backend: &mut B,
        shared: &SharedResources,
        config: SkyboxConfig,
    ) -> Result<Self, SkyboxError> {
        config.validate()?;
        shader::validate_embedded()?;

        // Read and check both cube maps before the first GPU object is created
        let day_data = config.day_cube_map.load()?;
        let evening_data = if config.shares_cube_map() {
            None
        } else {
            Some(config.evening_cube_map.load()?)
        };

        let layout = backend.create_bind_group_layout(&[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStageFlags::VERTEX_FRAGMENT,
                ty: BindingType::UniformBuffer,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStageFlags::FRAGMENT,
                ty: BindingType::Texture(TextureViewDimension::Cube),
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStageFlags::FRAGMENT,
                ty: BindingType::Texture(TextureViewDimension::Cube),
            },
            BindGroupLayoutEntry {
                binding: 3,
                visibility: ShaderStageFlags::VERTEX_FRAGMENT,
                ty: BindingType::Sampler,
            },
        ])?;

        let pipeline = backend.create_render_pipeline(&RenderPipelineDescriptor {
            label: Some("Skybox Pipeline".into()),
            vertex: shader::vertex_source(),
            fragment: Some(shader::fragment_source()),
            vertex_layouts: vec![Vertex::layout()],
            bind_group_layouts: vec![layout],
            // Seen from the inside, so every face is a back face
            cull_mode: CullMode::None,
            depth: config.depth_format.map(|format| DepthState {
                format,
                write_enabled: false,
                compare: CompareFunction::LessEqual,
            }),
            color_formats: vec![config.color_format],
        })?;

        let sphere = Mesh::sphere(config.sphere_radius, config.tessellation);
        let mesh = GpuMesh::create(backend, &sphere)?;

        let day_cube_map = GpuCubeMap::create(backend, &day_data)?;
        let evening_cube_map = evening_data
            .map(|data| GpuCubeMap::create(backend, &data))
            .transpose()?;

        let uniform_buffer = backend.create_buffer(&BufferDescriptor {
            label: Some("Skybox Uniforms".into()),
            size: SkyboxUniforms::SIZE,
            usage: BufferUsage::UNIFORM | BufferUsage::COPY_DST,
        })?;

        let evening_view = evening_cube_map
            .as_ref()
            .map_or(day_cube_map.view, |cube| cube.view);
        let bind_group = backend.create_bind_group(
            layout,
            &[
                (
                    0,
                    BindGroupEntry::Buffer {
                        buffer: uniform_buffer,
                        offset: 0,
                        size: None,
                    },
                ),
                (1, BindGroupEntry::Texture(day_cube_map.view)),
                (2, BindGroupEntry::Texture(evening_view)),
                (3, BindGroupEntry::Sampler(shared.linear_clamp())),
            ],
        )?;

        log::info!(
            "Skybox ready: {} vertices, {} indices, day '{}', evening '{}'",
            sphere.vertex_count(),
            sphere.index_count(),
            config.day_cube_map.describe(),
            config.evening_cube_map.describe()
        );

        Ok(Self {
            config,
            pipeline,
            bind_group,
            uniform_buffer,
            mesh,
            day_cube_map,
            evening_cube_map,
            uniforms: SkyboxUniforms::default(),
            angle: 0.0,
            day_progress: 0.0,
        })
    }

    /// Advance the rotation and upload this frame's constants
    pub fn update<B: GraphicsBackend>(
        &mut self,
        backend: &mut B,
        elapsed_seconds: f32,
        camera: &Camera,
        shared: &SharedResources,
    ) {
        if elapsed_seconds.is_finite() && elapsed_seconds >= 0.0 {
            self.angle += elapsed_seconds * self.config.rotation_rate;
        } else {
            log::warn!("Ignoring elapsed time {} for skybox rotation", elapsed_seconds);
        }

        self.uniforms = SkyboxUniforms::new(
            self.world_matrix(),
            camera.view_matrix(),
            shared.projection(),
            self.day_progress,
        );
        log::trace!("Skybox angle {} progress {}", self.angle, self.day_progress);

        backend.write_buffer(self.uniform_buffer, 0, self.uniforms.as_bytes());
    }

    /// Draw the skybox in its own render pass.
    ///
    /// Ending the pass releases the pipeline, buffers and textures bound here.
    pub fn render<B: GraphicsBackend>(&self, backend: &mut B, targets: &SkyboxTargets) {
        if self.config.depth_format.is_some() != targets.depth.is_some() {
            log::warn!(
                "Skybox depth target mismatch (configured {:?}, target {:?}), skipping draw",
                self.config.depth_format,
                targets.depth
            );
            return;
        }

        backend.begin_render_pass(&RenderPassDescriptor {
            label: Some("Skybox Pass".into()),
            color_attachments: vec![ColorAttachment {
                view: targets.color,
                load: targets.color_load,
            }],
            depth_attachment: targets.depth.map(|view| DepthAttachment {
                view,
                load: targets.depth_load,
            }),
        });

        backend.set_render_pipeline(self.pipeline);
        backend.set_bind_group(0, self.bind_group);
        backend.set_vertex_buffer(0, self.mesh.vertex_buffer, 0);
        backend.set_index_buffer(self.mesh.index_buffer, 0, IndexFormat::Uint32);
        backend.draw_indexed(0..self.mesh.index_count, 0, 0..1);

        backend.end_render_pass();
    }

    /// Release every GPU object owned by the skybox
    pub fn finalize<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_buffer(self.uniform_buffer);
        self.mesh.destroy(backend);
        self.day_cube_map.destroy(backend);
        if let Some(evening) = self.evening_cube_map {
            evening.destroy(backend);
        }
        log::info!("Skybox released");
    }

    /// Set the time of day, clamped to [0, 1]; takes effect on the next update
    pub fn set_day_progress(&mut self, progress: f32) {
        if progress.is_nan() {
            log::warn!("Ignoring NaN day progress");
            return;
        }
        self.day_progress = progress.clamp(0.0, 1.0);
    }

    pub fn day_progress(&self) -> f32 {
        self.day_progress
    }

    /// Accumulated rotation in angle units
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Rotation about Y for the current angle
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y((self.angle * self.config.rotation_scale).to_radians())
    }

    /// Constants written by the last update
    pub fn uniforms(&self) -> &SkyboxUniforms {
        &self.uniforms
    }

    pub fn uniform_buffer(&self) -> BufferHandle {
        self.uniform_buffer
    }

    pub fn bind_group(&self) -> BindGroupHandle {
        self.bind_group
    }

    pub fn pipeline(&self) -> RenderPipelineHandle {
        self.pipeline
    }

    pub fn config(&self) -> &SkyboxConfig {
        &self.config
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::RecordedCommand;
    use crate::resources::{CubeMapData, TextureError};

    fn solid_config() -> SkyboxConfig {
        let day = CubeMapSource::Data(CubeMapData::solid_color([80, 140, 255, 255], 4, "day"));
        SkyboxConfig::new()
            .with_cube_maps(day.clone(), day)
            .with_depth_format(None)
    }

    fn setup() -> (HeadlessBackend, SharedResources, SkyboxRenderer) {
        let mut backend = HeadlessBackend::new(320, 180);
        let shared = SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();
        let skybox = SkyboxRenderer::new(&mut backend, &shared, solid_config()).unwrap();
        (backend, shared, skybox)
    }

    #[test]
    fn test_initial_state() {
        let (_, _, skybox) = setup();
        assert_eq!(skybox.angle(), 0.0);
        assert_eq!(skybox.day_progress(), 0.0);
        assert_eq!(skybox.world_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_angle_accumulates() {
        let (mut backend, shared, mut skybox) = setup();
        let camera = Camera::default();

        for dt in [0.016, 0.5, 0.25] {
            skybox.update(&mut backend, dt, &camera, &shared);
        }

        let expected = (0.016 + 0.5 + 0.25) * 30.0;
        assert!((skybox.angle() - expected).abs() < 1e-4);
    }

    #[test]
    fn test_invalid_elapsed_time_keeps_angle() {
        let (mut backend, shared, mut skybox) = setup();
        let camera = Camera::default();

        skybox.update(&mut backend, 1.0, &camera, &shared);
        skybox.update(&mut backend, -0.5, &camera, &shared);
        skybox.update(&mut backend, f32::NAN, &camera, &shared);

        assert_eq!(skybox.angle(), 30.0);
    }

    #[test]
    fn test_day_progress_is_clamped() {
        let (_, _, mut skybox) = setup();

        skybox.set_day_progress(1.5);
        assert_eq!(skybox.day_progress(), 1.0);
        skybox.set_day_progress(-2.0);
        assert_eq!(skybox.day_progress(), 0.0);
        skybox.set_day_progress(0.4);
        skybox.set_day_progress(f32::NAN);
        assert_eq!(skybox.day_progress(), 0.4);
    }

    #[test]
    fn test_update_writes_whole_payload() {
        let (mut backend, shared, mut skybox) = setup();
        skybox.set_day_progress(0.75);
        skybox.update(&mut backend, 0.1, &Camera::default(), &shared);

        assert_eq!(
            backend.commands().last(),
            Some(&RecordedCommand::WriteBuffer {
                buffer: skybox.uniform_buffer(),
                offset: 0,
                size: SkyboxUniforms::SIZE as usize,
            })
        );
        let contents = backend.buffer_contents(skybox.uniform_buffer()).unwrap();
        assert_eq!(contents, skybox.uniforms().as_bytes());
        assert_eq!(skybox.uniforms().day_progress.x, 0.75);
    }

    #[test]
    fn test_depth_mismatch_skips_draw() {
        let (mut backend, _, skybox) = setup();
        let frame = backend.begin_frame().unwrap();
        let depth = backend
            .create_texture(&TextureDescriptor {
                width: 320,
                height: 180,
                format: TextureFormat::Depth32Float,
                usage: TextureUsage::RENDER_ATTACHMENT,
                ..Default::default()
            })
            .unwrap();
        let depth_view = backend
            .create_texture_view(depth, TextureViewDimension::D2)
            .unwrap();

        skybox.render(
            &mut backend,
            &SkyboxTargets::new(frame.swapchain_view).with_depth(depth_view),
        );

        assert_eq!(backend.draw_count(), 0);
    }

    #[test]
    fn test_invalid_config_fails_before_gpu_work() {
        let mut backend = HeadlessBackend::new(64, 64);
        let shared = SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();
        let config = solid_config().with_sphere(2.0, 1);

        let result = SkyboxRenderer::new(&mut backend, &shared, config);

        assert!(matches!(result, Err(SkyboxError::InvalidConfig(_))));
        assert_eq!(backend.live_buffer_count(), 0);
    }

    #[test]
    fn test_malformed_cube_map_data_fails_before_gpu_work() {
        let mut backend = HeadlessBackend::new(64, 64);
        let shared = SharedResources::new(&mut backend, Mat4::IDENTITY).unwrap();
        // Claims a 3 level mip chain but only carries the top level
        let mut short = CubeMapData::solid_color([255, 255, 255, 255], 4, "short");
        short.mip_levels = 3;
        let config = solid_config().with_evening_cube_map(CubeMapSource::Data(short));

        let result = SkyboxRenderer::new(&mut backend, &shared, config);

        match result {
            Err(SkyboxError::TextureLoad { path, source }) => {
                assert_eq!(path, "<memory:short>");
                assert!(matches!(
                    source,
                    TextureError::Truncated {
                        expected: 504,
                        actual: 384
                    }
                ));
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("malformed cube map data was accepted"),
        }
        assert_eq!(backend.live_buffer_count(), 0);
        assert_eq!(backend.live_texture_count(), 0);
    }
}

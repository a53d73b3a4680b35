//! The backend interface the skybox is written against
//!
//! Resources are referred to by opaque handles. Render commands are only valid
//! between `begin_render_pass` and `end_render_pass`.

use std::ops::Range;

use crate::backend::types::*;
use thiserror::Error;

/// Failures reported by a backend
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend initialization failed: {0}")]
    InitializationFailed(String),
    #[error("surface creation failed: {0}")]
    SurfaceCreationFailed(String),
    #[error("device request failed: {0}")]
    DeviceCreationFailed(String),
    #[error("could not acquire the next surface image: {0}")]
    AcquireImageFailed(String),
    #[error("buffer creation failed: {0}")]
    BufferCreationFailed(String),
    #[error("texture creation failed: {0}")]
    TextureCreationFailed(String),
    #[error("pipeline creation failed: {0}")]
    PipelineCreationFailed(String),
    #[error("surface lost")]
    SurfaceLost,
    #[error("out of GPU memory")]
    OutOfMemory,
}

pub type BackendResult<T> = Result<T, BackendError>;

macro_rules! handles {
    ($($(#[$doc:meta])* $name:ident;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $name(pub(crate) u64);
        )*
    };
}

handles! {
    BufferHandle;
    TextureHandle;
    /// A texture view, or the surface image of the current frame
    TextureViewHandle;
    SamplerHandle;
    BindGroupLayoutHandle;
    BindGroupHandle;
    RenderPipelineHandle;
}

/// What a layout slot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingType {
    UniformBuffer,
    /// Filterable float texture viewed with the given dimension
    Texture(TextureViewDimension),
    /// Filtering sampler
    Sampler,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindGroupLayoutEntry {
    pub binding: u32,
    pub visibility: ShaderStageFlags,
    pub ty: BindingType,
}

/// Resource bound at one slot of a bind group
#[derive(Debug, Clone, PartialEq)]
pub enum BindGroupEntry {
    Buffer {
        buffer: BufferHandle,
        offset: u64,
        /// `None` binds the rest of the buffer
        size: Option<u64>,
    },
    Texture(TextureViewHandle),
    Sampler(SamplerHandle),
}

/// WGSL source for one shader stage
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderModuleSource {
    pub label: Option<String>,
    pub wgsl: String,
    pub entry_point: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepthState {
    pub format: TextureFormat,
    pub write_enabled: bool,
    pub compare: CompareFunction,
}

/// A pipeline drawing triangle lists.
///
/// Each stage comes from its own module. Without a fragment stage the
/// pipeline only writes depth.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPipelineDescriptor {
    pub label: Option<String>,
    pub vertex: ShaderModuleSource,
    pub fragment: Option<ShaderModuleSource>,
    pub vertex_layouts: Vec<VertexBufferLayout>,
    pub bind_group_layouts: Vec<BindGroupLayoutHandle>,
    pub cull_mode: CullMode,
    pub depth: Option<DepthState>,
    /// One entry per color attachment, all channels written
    pub color_formats: Vec<TextureFormat>,
}

/// What an attachment holds when the pass starts
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadOp<T> {
    Load,
    Clear(T),
}

/// Color target of a pass. Results are always stored.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorAttachment {
    pub view: TextureViewHandle,
    pub load: LoadOp<[f32; 4]>,
}

/// Depth target of a pass. Results are always stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthAttachment {
    pub view: TextureViewHandle,
    pub load: LoadOp<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderPassDescriptor {
    pub label: Option<String>,
    pub color_attachments: Vec<ColorAttachment>,
    pub depth_attachment: Option<DepthAttachment>,
}

/// The surface image acquired for this frame
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub swapchain_view: TextureViewHandle,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

/// Implemented by [`super::wgpu_backend::WgpuBackend`] and [`super::HeadlessBackend`]
pub trait GraphicsBackend {
    /// Resize the presentation surface; zero sizes are ignored
    fn resize(&mut self, width: u32, height: u32);

    /// Current surface size, possibly clamped to device limits
    fn surface_size(&self) -> (u32, u32);

    /// Acquire the next surface image
    fn begin_frame(&mut self) -> BackendResult<FrameContext>;

    /// Submit recorded work and present
    fn end_frame(&mut self) -> BackendResult<()>;

    /// Format of the surface images handed out by `begin_frame`
    fn swapchain_format(&self) -> TextureFormat;

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle>;

    /// Create a buffer sized to `data` and filled with it; empty data is an error
    fn create_buffer_init(&mut self, desc: &BufferDescriptor, data: &[u8])
        -> BackendResult<BufferHandle>;

    /// Replace buffer contents starting at `offset`.
    ///
    /// The write is ordered before any commands recorded for the current frame.
    fn write_buffer(&mut self, buffer: BufferHandle, offset: u64, data: &[u8]);

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle>;

    /// View every layer and mip of a texture with the given dimension
    fn create_texture_view(
        &mut self,
        texture: TextureHandle,
        dimension: TextureViewDimension,
    ) -> BackendResult<TextureViewHandle>;

    /// Upload one layer and mip
    fn write_texture(&mut self, texture: TextureHandle, region: &TextureRegion, data: &[u8]);

    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> BackendResult<SamplerHandle>;

    fn create_bind_group_layout(
        &mut self,
        entries: &[BindGroupLayoutEntry],
    ) -> BackendResult<BindGroupLayoutHandle>;

    /// Bind concrete resources to a layout; every layout entry must be provided
    fn create_bind_group(
        &mut self,
        layout: BindGroupLayoutHandle,
        entries: &[(u32, BindGroupEntry)],
    ) -> BackendResult<BindGroupHandle>;

    /// Compile both shader stages and link them into a pipeline
    fn create_render_pipeline(
        &mut self,
        desc: &RenderPipelineDescriptor,
    ) -> BackendResult<RenderPipelineHandle>;

    fn begin_render_pass(&mut self, desc: &RenderPassDescriptor);

    /// Close the open pass; every binding made inside it is released
    fn end_render_pass(&mut self);

    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle);

    fn set_bind_group(&mut self, index: u32, bind_group: BindGroupHandle);

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64);

    fn set_index_buffer(&mut self, buffer: BufferHandle, offset: u64, format: IndexFormat);

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>);

    fn destroy_buffer(&mut self, buffer: BufferHandle);

    /// Destroy a texture and every view created from it
    fn destroy_texture(&mut self, texture: TextureHandle);
}

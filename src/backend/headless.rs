//! Headless backend that records commands instead of talking to a GPU.
//!
//! Resource creation is validated the way a real device would validate it
//! (missing handles, mismatched bind group entries, invalid cube views,
//! shader entry points), so code driven by this backend fails in the same
//! places it would fail on hardware. Everything else is kept in memory and
//! exposed for inspection.

use std::collections::HashMap;
use std::ops::Range;

use crate::backend::traits::*;
use crate::backend::types::*;

/// A call recorded by [`HeadlessBackend`]
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    BeginFrame,
    EndFrame,
    WriteBuffer {
        buffer: BufferHandle,
        offset: u64,
        size: usize,
    },
    WriteTexture {
        texture: TextureHandle,
        region: TextureRegion,
    },
    BeginRenderPass(RenderPassDescriptor),
    EndRenderPass,
    SetPipeline(RenderPipelineHandle),
    SetBindGroup {
        index: u32,
        bind_group: BindGroupHandle,
    },
    SetVertexBuffer {
        slot: u32,
        buffer: BufferHandle,
        offset: u64,
    },
    SetIndexBuffer {
        buffer: BufferHandle,
        offset: u64,
        format: IndexFormat,
    },
    DrawIndexed {
        indices: Range<u32>,
        base_vertex: i32,
        instances: Range<u32>,
    },
}

impl RecordedCommand {
    pub fn is_draw(&self) -> bool {
        matches!(self, RecordedCommand::DrawIndexed { .. })
    }
}

struct StoredBuffer {
    desc: BufferDescriptor,
    contents: Vec<u8>,
}

#[derive(Clone, Copy)]
struct StoredView {
    texture: Option<TextureHandle>,
    dimension: TextureViewDimension,
}

/// Command-recording implementation of [`GraphicsBackend`]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    format: TextureFormat,
    frame_view: Option<TextureViewHandle>,
    in_render_pass: bool,
    fail_pipelines: bool,

    buffers: HashMap<u64, StoredBuffer>,
    textures: HashMap<u64, TextureDescriptor>,
    texture_views: HashMap<u64, StoredView>,
    samplers: HashMap<u64, SamplerDescriptor>,
    bind_group_layouts: HashMap<u64, Vec<BindGroupLayoutEntry>>,
    bind_groups: HashMap<u64, Vec<(u32, BindGroupEntry)>>,
    render_pipelines: HashMap<u64, RenderPipelineDescriptor>,

    next_id: u64,
    commands: Vec<RecordedCommand>,
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            format: TextureFormat::Bgra8UnormSrgb,
            frame_view: None,
            in_render_pass: false,
            fail_pipelines: false,
            buffers: HashMap::new(),
            textures: HashMap::new(),
            texture_views: HashMap::new(),
            samplers: HashMap::new(),
            bind_group_layouts: HashMap::new(),
            bind_groups: HashMap::new(),
            render_pipelines: HashMap::new(),
            next_id: 1,
            commands: Vec::new(),
        }
    }

    /// Use a different swapchain format
    pub fn with_format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Make every subsequent pipeline creation fail, as a lost device would
    pub fn with_failing_pipelines(mut self) -> Self {
        self.fail_pipelines = true;
        self
    }

    fn next_handle(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn record(&mut self, command: RecordedCommand) {
        if self.in_render_pass {
            self.commands.push(command);
        } else {
            log::warn!("HeadlessBackend: {:?} issued outside a render pass, ignored", command);
        }
    }

    /// Every command recorded so far, in call order
    pub fn commands(&self) -> &[RecordedCommand] {
        &self.commands
    }

    /// Forget recorded commands, keeping all resources
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Number of draw calls recorded so far
    pub fn draw_count(&self) -> usize {
        self.commands.iter().filter(|c| c.is_draw()).count()
    }

    /// Current contents of a live buffer
    pub fn buffer_contents(&self, buffer: BufferHandle) -> Option<&[u8]> {
        self.buffers.get(&buffer.0).map(|b| b.contents.as_slice())
    }

    pub fn buffer_descriptor(&self, buffer: BufferHandle) -> Option<&BufferDescriptor> {
        self.buffers.get(&buffer.0).map(|b| &b.desc)
    }

    pub fn texture_descriptor(&self, texture: TextureHandle) -> Option<&TextureDescriptor> {
        self.textures.get(&texture.0)
    }

    /// Texture a view was created from and the dimension it was created with.
    ///
    /// Swapchain views report no texture.
    pub fn texture_view_info(
        &self,
        view: TextureViewHandle,
    ) -> Option<(Option<TextureHandle>, TextureViewDimension)> {
        self.texture_views
            .get(&view.0)
            .map(|stored| (stored.texture, stored.dimension))
    }

    pub fn sampler_descriptor(&self, sampler: SamplerHandle) -> Option<&SamplerDescriptor> {
        self.samplers.get(&sampler.0)
    }

    pub fn bind_group_entries(&self, bind_group: BindGroupHandle) -> Option<&[(u32, BindGroupEntry)]> {
        self.bind_groups.get(&bind_group.0).map(|e| e.as_slice())
    }

    pub fn pipeline_descriptor(
        &self,
        pipeline: RenderPipelineHandle,
    ) -> Option<&RenderPipelineDescriptor> {
        self.render_pipelines.get(&pipeline.0)
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    fn check_entry(
        &self,
        binding: u32,
        entry: &BindGroupEntry,
        ty: &BindingType,
    ) -> BackendResult<()> {
        match (entry, ty) {
            (BindGroupEntry::Buffer { buffer, offset, size }, BindingType::UniformBuffer) => {
                let stored = self.buffers.get(&buffer.0).ok_or_else(|| {
                    BackendError::PipelineCreationFailed(format!("Buffer for binding {binding} not found"))
                })?;
                if !stored.desc.usage.contains(BufferUsage::UNIFORM) {
                    return Err(BackendError::PipelineCreationFailed(format!(
                        "Buffer for binding {binding} lacks UNIFORM usage"
                    )));
                }
                let end = match size {
                    Some(size) => offset + size,
                    None => *offset,
                };
                if *offset >= stored.desc.size || end > stored.desc.size {
                    return Err(BackendError::PipelineCreationFailed(format!(
                        "Binding {binding} range ends at {end}, buffer is {} bytes",
                        stored.desc.size
                    )));
                }
                Ok(())
            }
            (BindGroupEntry::Texture(view), BindingType::Texture(view_dimension)) => {
                let stored = self.texture_views.get(&view.0).ok_or_else(|| {
                    BackendError::PipelineCreationFailed(format!("Texture view for binding {binding} not found"))
                })?;
                if stored.dimension != *view_dimension {
                    return Err(BackendError::PipelineCreationFailed(format!(
                        "Binding {binding} expects a {:?} view, got {:?}",
                        view_dimension, stored.dimension
                    )));
                }
                Ok(())
            }
            (BindGroupEntry::Sampler(sampler), BindingType::Sampler) => {
                if self.samplers.contains_key(&sampler.0) {
                    Ok(())
                } else {
                    Err(BackendError::PipelineCreationFailed(format!(
                        "Sampler for binding {binding} not found"
                    )))
                }
            }
            _ => Err(BackendError::PipelineCreationFailed(format!(
                "Binding {binding} resource does not match layout type {:?}",
                ty
            ))),
        }
    }
}

/// Parse and validate a WGSL module, then look for the requested entry point
fn check_shader(source: &ShaderModuleSource) -> BackendResult<()> {
    let module = naga::front::wgsl::parse_str(&source.wgsl).map_err(|e| {
        BackendError::PipelineCreationFailed(format!(
            "{:?}: {}",
            source.label,
            e.emit_to_string(&source.wgsl)
        ))
    })?;

    naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| BackendError::PipelineCreationFailed(format!("{:?}: {:?}", source.label, e)))?;

    if module
        .entry_points
        .iter()
        .any(|ep| ep.name == source.entry_point)
    {
        Ok(())
    } else {
        Err(BackendError::PipelineCreationFailed(format!(
            "{:?}: entry point '{}' not found",
            source.label, source.entry_point
        )))
    }
}

impl GraphicsBackend for HeadlessBackend {
    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.width = width;
            self.height = height;
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn begin_frame(&mut self) -> BackendResult<FrameContext> {
        if let Some(old) = self.frame_view.take() {
            self.texture_views.remove(&old.0);
        }

        let id = self.next_handle();
        self.texture_views.insert(
            id,
            StoredView {
                texture: None,
                dimension: TextureViewDimension::D2,
            },
        );
        self.frame_view = Some(TextureViewHandle(id));
        self.commands.push(RecordedCommand::BeginFrame);

        Ok(FrameContext {
            swapchain_view: TextureViewHandle(id),
            width: self.width,
            height: self.height,
        })
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if self.in_render_pass {
            log::warn!("HeadlessBackend: frame ended inside an open render pass");
            self.in_render_pass = false;
        }
        self.commands.push(RecordedCommand::EndFrame);
        Ok(())
    }

    fn swapchain_format(&self) -> TextureFormat {
        self.format
    }

    fn create_buffer(&mut self, desc: &BufferDescriptor) -> BackendResult<BufferHandle> {
        if desc.size == 0 {
            return Err(BackendError::BufferCreationFailed(format!(
                "{:?}: size must be non-zero",
                desc.label
            )));
        }

        log::trace!("HeadlessBackend: creating buffer {:?} ({} bytes)", desc.label, desc.size);
        let id = self.next_handle();
        self.buffers.insert(
            id,
            StoredBuffer {
                desc: desc.clone(),
                contents: vec![0; desc.size as usize],
            },
        );
        Ok(BufferHandle(id))
    }

    fn create_buffer_init(
        &mut self,
        desc: &BufferDescriptor,
        data: &[u8],
    ) -> BackendResult<BufferHandle> {
        if data.is_empty() {
            return Err(BackendError::BufferCreationFailed(format!(
                "{:?}: initial data is empty",
                desc.label
            )));
        }

        let desc = BufferDescriptor {
            size: data.len() as u64,
            ..desc.clone()
        };
        let handle = self.create_buffer(&desc)?;
        if let Some(stored) = self.buffers.get_mut(&handle.0) {
            stored.contents.copy_from_slice(data);
        }
        Ok(handle)
    }

    fn write_buffer(&mut self, buffer: BufferHandle, offset: u64, data: &[u8]) {
        let Some(stored) = self.buffers.get_mut(&buffer.0) else {
            log::warn!("HeadlessBackend: write to unknown buffer {:?}", buffer);
            return;
        };

        let start = offset as usize;
        let end = start + data.len();
        if end > stored.contents.len() {
            log::warn!(
                "HeadlessBackend: write of {} bytes at {} overruns {:?} ({} bytes)",
                data.len(),
                offset,
                stored.desc.label,
                stored.contents.len()
            );
            return;
        }

        stored.contents[start..end].copy_from_slice(data);
        self.commands.push(RecordedCommand::WriteBuffer {
            buffer,
            offset,
            size: data.len(),
        });
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle> {
        if desc.width == 0 || desc.height == 0 || desc.array_layers == 0 || desc.mip_levels == 0 {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: every extent must be non-zero",
                desc.label
            )));
        }
        let max_mips = max_mip_levels(desc.width.max(desc.height));
        if desc.mip_levels > max_mips {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: {} mip levels requested, a {}x{} texture has {}",
                desc.label, desc.mip_levels, desc.width, desc.height, max_mips
            )));
        }

        log::trace!(
            "HeadlessBackend: creating texture {:?} ({}x{}x{})",
            desc.label,
            desc.width,
            desc.height,
            desc.array_layers
        );
        let id = self.next_handle();
        self.textures.insert(id, desc.clone());
        Ok(TextureHandle(id))
    }

    fn create_texture_view(
        &mut self,
        texture: TextureHandle,
        dimension: TextureViewDimension,
    ) -> BackendResult<TextureViewHandle> {
        let desc = self
            .textures
            .get(&texture.0)
            .ok_or_else(|| BackendError::TextureCreationFailed("Texture not found".into()))?;

        if dimension == TextureViewDimension::Cube
            && (desc.array_layers != 6 || desc.width != desc.height)
        {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: cube views need 6 square layers, got {}x{}x{}",
                desc.label, desc.width, desc.height, desc.array_layers
            )));
        }

        let id = self.next_handle();
        self.texture_views.insert(
            id,
            StoredView {
                texture: Some(texture),
                dimension,
            },
        );
        Ok(TextureViewHandle(id))
    }

    fn write_texture(&mut self, texture: TextureHandle, region: &TextureRegion, data: &[u8]) {
        let Some(desc) = self.textures.get(&texture.0) else {
            log::warn!("HeadlessBackend: write to unknown texture {:?}", texture);
            return;
        };

        let needed = region.bytes_per_row as usize * region.height as usize;
        if region.array_layer >= desc.array_layers
            || region.mip_level >= desc.mip_levels
            || data.len() < needed
        {
            log::warn!(
                "HeadlessBackend: invalid write to {:?} ({:?}, {} bytes)",
                desc.label,
                region,
                data.len()
            );
            return;
        }

        self.commands.push(RecordedCommand::WriteTexture {
            texture,
            region: *region,
        });
    }

    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> BackendResult<SamplerHandle> {
        let id = self.next_handle();
        self.samplers.insert(id, desc.clone());
        Ok(SamplerHandle(id))
    }

    fn create_bind_group_layout(
        &mut self,
        entries: &[BindGroupLayoutEntry],
    ) -> BackendResult<BindGroupLayoutHandle> {
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.binding == entry.binding) {
                return Err(BackendError::PipelineCreationFailed(format!(
                    "Duplicate binding {} in layout",
                    entry.binding
                )));
            }
        }

        let id = self.next_handle();
        self.bind_group_layouts.insert(id, entries.to_vec());
        Ok(BindGroupLayoutHandle(id))
    }

    fn create_bind_group(
        &mut self,
        layout: BindGroupLayoutHandle,
        entries: &[(u32, BindGroupEntry)],
    ) -> BackendResult<BindGroupHandle> {
        let layout_entries = self
            .bind_group_layouts
            .get(&layout.0)
            .ok_or_else(|| BackendError::PipelineCreationFailed("Layout not found".into()))?;

        if layout_entries.len() != entries.len() {
            return Err(BackendError::PipelineCreationFailed(format!(
                "Layout has {} bindings, bind group provides {}",
                layout_entries.len(),
                entries.len()
            )));
        }

        for (binding, entry) in entries {
            let layout_entry = layout_entries
                .iter()
                .find(|e| e.binding == *binding)
                .ok_or_else(|| {
                    BackendError::PipelineCreationFailed(format!("Binding {binding} not in layout"))
                })?;
            self.check_entry(*binding, entry, &layout_entry.ty)?;
        }

        let id = self.next_handle();
        self.bind_groups.insert(id, entries.to_vec());
        Ok(BindGroupHandle(id))
    }

    fn create_render_pipeline(
        &mut self,
        desc: &RenderPipelineDescriptor,
    ) -> BackendResult<RenderPipelineHandle> {
        if self.fail_pipelines {
            return Err(BackendError::PipelineCreationFailed(format!(
                "{:?}: device lost",
                desc.label
            )));
        }

        check_shader(&desc.vertex)?;
        if let Some(fragment) = &desc.fragment {
            check_shader(fragment)?;
        }

        if let Some(missing) = desc
            .bind_group_layouts
            .iter()
            .find(|h| !self.bind_group_layouts.contains_key(&h.0))
        {
            return Err(BackendError::PipelineCreationFailed(format!(
                "{:?}: bind group layout {:?} not found",
                desc.label, missing
            )));
        }

        let id = self.next_handle();
        self.render_pipelines.insert(id, desc.clone());
        Ok(RenderPipelineHandle(id))
    }

    fn begin_render_pass(&mut self, desc: &RenderPassDescriptor) {
        if self.in_render_pass {
            log::warn!("HeadlessBackend: render pass begun inside another pass");
        }
        self.in_render_pass = true;
        self.commands.push(RecordedCommand::BeginRenderPass(desc.clone()));
    }

    fn end_render_pass(&mut self) {
        if self.in_render_pass {
            self.in_render_pass = false;
            self.commands.push(RecordedCommand::EndRenderPass);
        }
    }

    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle) {
        self.record(RecordedCommand::SetPipeline(pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: BindGroupHandle) {
        self.record(RecordedCommand::SetBindGroup { index, bind_group });
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64) {
        self.record(RecordedCommand::SetVertexBuffer { slot, buffer, offset });
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle, offset: u64, format: IndexFormat) {
        self.record(RecordedCommand::SetIndexBuffer { buffer, offset, format });
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.record(RecordedCommand::DrawIndexed {
            indices,
            base_vertex,
            instances,
        });
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        self.buffers.remove(&buffer.0);
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.texture_views
            .retain(|_, stored| stored.texture != Some(texture));
        self.textures.remove(&texture.0);
    }
}

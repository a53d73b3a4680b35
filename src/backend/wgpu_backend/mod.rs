//! Backend that renders into a winit window through wgpu
//!
//! A `wgpu::RenderPass` borrows everything it uses for as long as it is open,
//! so pass commands are queued while a pass is open and replayed into a real
//! pass when it ends.

mod convert;
mod objects;

use std::ops::Range;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::backend::traits::*;
use crate::backend::types::*;
use objects::{GpuObject, ObjectTable};

enum PassCommand {
    Pipeline(RenderPipelineHandle),
    BindGroup(u32, BindGroupHandle),
    VertexBuffer(u32, BufferHandle, u64),
    IndexBuffer(BufferHandle, u64, IndexFormat),
    DrawIndexed(Range<u32>, i32, Range<u32>),
}

struct OpenPass {
    desc: RenderPassDescriptor,
    commands: Vec<PassCommand>,
}

/// The acquired surface image and the encoder recording into it
struct Frame {
    image: wgpu::SurfaceTexture,
    view_id: u64,
    encoder: wgpu::CommandEncoder,
}

pub struct WgpuBackend {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    format: TextureFormat,
    objects: ObjectTable,
    frame: Option<Frame>,
    pass: Option<OpenPass>,
}

/// Prefer an sRGB format, otherwise take the first one the skybox can render to
fn pick_surface_format(
    offered: &[wgpu::TextureFormat],
) -> Option<(wgpu::TextureFormat, TextureFormat)> {
    let usable: Vec<_> = offered
        .iter()
        .filter_map(|&format| convert::color_format(format).map(|ours| (format, ours)))
        .collect();

    usable
        .iter()
        .find(|(_, ours)| ours.is_srgb())
        .or_else(|| usable.first())
        .copied()
}

/// Shrink a surface size until both sides fit in `limit`, keeping its shape
fn fit_to_limit(limit: u32, width: u32, height: u32) -> (u32, u32) {
    let largest = width.max(height);
    if largest <= limit {
        return (width.max(1), height.max(1));
    }

    let scale = limit as f64 / largest as f64;
    let shrink = |side: u32| ((side as f64 * scale) as u32).clamp(1, limit);
    (shrink(width), shrink(height))
}

impl WgpuBackend {
    /// Create the backend for a window, blocking until the device is ready
    pub fn new(window: Arc<Window>, vsync: bool) -> BackendResult<Self> {
        pollster::block_on(Self::new_async(window, vsync))
    }

    pub async fn new_async(window: Arc<Window>, vsync: bool) -> BackendResult<Self> {
        let size = window.inner_size();

        let backends = wgpu::util::backend_bits_from_env().unwrap_or_else(wgpu::Backends::all);
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends,
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| BackendError::SurfaceCreationFailed(e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| {
                BackendError::InitializationFailed("no adapter can present to this window".into())
            })?;
        let info = adapter.get_info();
        log::info!("Rendering with {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("skybox device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                },
                None,
            )
            .await
            .map_err(|e| BackendError::DeviceCreationFailed(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let (surface_format, format) = pick_surface_format(&caps.formats).ok_or_else(|| {
            BackendError::SurfaceCreationFailed(format!(
                "no supported color format among {:?}",
                caps.formats
            ))
        })?;

        let (width, height) = fit_to_limit(
            device.limits().max_texture_dimension_2d,
            size.width,
            size.height,
        );
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);
        log::info!("Surface configured at {}x{} as {:?}", width, height, format);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            format,
            objects: ObjectTable::default(),
            frame: None,
            pass: None,
        })
    }

    /// Run `create` with validation errors returned instead of reaching the
    /// device's uncaptured error handler
    fn validated<T>(&self, create: impl FnOnce(&wgpu::Device) -> T) -> Result<T, String> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let object = create(&self.device);
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(error) => Err(error.to_string()),
            None => Ok(object),
        }
    }

    fn queue_command(&mut self, command: PassCommand) {
        match self.pass.as_mut() {
            Some(pass) => pass.commands.push(command),
            None => log::warn!("Render command issued outside a render pass, ignored"),
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let limit = self.device.limits().max_texture_dimension_2d;
        (self.config.width, self.config.height) = fit_to_limit(limit, width, height);
        self.surface.configure(&self.device, &self.config);
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn begin_frame(&mut self) -> BackendResult<FrameContext> {
        let image = self.surface.get_current_texture().map_err(|e| match e {
            wgpu::SurfaceError::Lost => BackendError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => BackendError::OutOfMemory,
            other => BackendError::AcquireImageFailed(other.to_string()),
        })?;

        let view = image.texture.create_view(&wgpu::TextureViewDescriptor::default());
        let view_id = self.objects.insert(GpuObject::View {
            view,
            texture: None,
        });
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        if let Some(stale) = self.frame.replace(Frame {
            image,
            view_id,
            encoder,
        }) {
            log::warn!("Frame begun before the previous one ended, its work is dropped");
            self.objects.remove(stale.view_id);
        }

        Ok(FrameContext {
            swapchain_view: TextureViewHandle(view_id),
            width: self.config.width,
            height: self.config.height,
        })
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        if self.pass.take().is_some() {
            log::warn!("Frame ended inside an open render pass, the pass is dropped");
        }
        let Some(frame) = self.frame.take() else {
            return Ok(());
        };

        self.queue.submit(Some(frame.encoder.finish()));
        self.objects.remove(frame.view_id);
        frame.image.present();
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

        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: desc.label.as_deref(),
            size: desc.size,
            usage: desc.usage.into(),
            mapped_at_creation: false,
        });
        Ok(BufferHandle(self.objects.insert(GpuObject::Buffer(buffer))))
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

        let buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: desc.label.as_deref(),
            contents: data,
            usage: desc.usage.into(),
        });
        Ok(BufferHandle(self.objects.insert(GpuObject::Buffer(buffer))))
    }

    fn write_buffer(&mut self, buffer: BufferHandle, offset: u64, data: &[u8]) {
        match self.objects.buffer(buffer.0) {
            Some(target) => self.queue.write_buffer(target, offset, data),
            None => log::warn!("Write to unknown buffer {:?} ignored", buffer),
        }
    }

    fn create_texture(&mut self, desc: &TextureDescriptor) -> BackendResult<TextureHandle> {
        let limit = self.device.limits().max_texture_dimension_2d;
        let largest = desc.width.max(desc.height);
        if desc.width == 0 || desc.height == 0 || largest > limit {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: {}x{} is outside 1..={}",
                desc.label, desc.width, desc.height, limit
            )));
        }
        if desc.mip_levels == 0 || desc.mip_levels > max_mip_levels(largest) {
            return Err(BackendError::TextureCreationFailed(format!(
                "{:?}: {} mip levels for a {}x{} texture",
                desc.label, desc.mip_levels, desc.width, desc.height
            )));
        }

        let texture = self
            .validated(|device| {
                device.create_texture(&wgpu::TextureDescriptor {
                    label: desc.label.as_deref(),
                    size: wgpu::Extent3d {
                        width: desc.width,
                        height: desc.height,
                        depth_or_array_layers: desc.array_layers,
                    },
                    mip_level_count: desc.mip_levels,
                    sample_count: 1,
                    dimension: wgpu::TextureDimension::D2,
                    format: desc.format.into(),
                    usage: desc.usage.into(),
                    view_formats: &[],
                })
            })
            .map_err(|message| {
                BackendError::TextureCreationFailed(format!("{:?}: {}", desc.label, message))
            })?;
        Ok(TextureHandle(self.objects.insert(GpuObject::Texture(texture))))
    }

    fn create_texture_view(
        &mut self,
        texture: TextureHandle,
        dimension: TextureViewDimension,
    ) -> BackendResult<TextureViewHandle> {
        let source = self.objects.texture(texture.0).ok_or_else(|| {
            BackendError::TextureCreationFailed(format!("{:?} not found", texture))
        })?;

        let view = self
            .validated(|_| {
                source.create_view(&wgpu::TextureViewDescriptor {
                    dimension: Some(dimension.into()),
                    ..Default::default()
                })
            })
            .map_err(BackendError::TextureCreationFailed)?;
        let id = self.objects.insert(GpuObject::View {
            view,
            texture: Some(texture.0),
        });
        Ok(TextureViewHandle(id))
    }

    fn write_texture(&mut self, texture: TextureHandle, region: &TextureRegion, data: &[u8]) {
        let Some(target) = self.objects.texture(texture.0) else {
            log::warn!("Write to unknown texture {:?} ignored", texture);
            return;
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: target,
                mip_level: region.mip_level,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: region.array_layer,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(region.bytes_per_row),
                rows_per_image: Some(region.height),
            },
            wgpu::Extent3d {
                width: region.width,
                height: region.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn create_sampler(&mut self, desc: &SamplerDescriptor) -> BackendResult<SamplerHandle> {
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: desc.label.as_deref(),
            address_mode_u: desc.address_mode.into(),
            address_mode_v: desc.address_mode.into(),
            address_mode_w: desc.address_mode.into(),
            mag_filter: desc.filter.into(),
            min_filter: desc.filter.into(),
            mipmap_filter: desc.filter.into(),
            ..Default::default()
        });
        Ok(SamplerHandle(self.objects.insert(GpuObject::Sampler(sampler))))
    }

    fn create_bind_group_layout(
        &mut self,
        entries: &[BindGroupLayoutEntry],
    ) -> BackendResult<BindGroupLayoutHandle> {
        let entries: Vec<_> = entries
            .iter()
            .map(|entry| wgpu::BindGroupLayoutEntry {
                binding: entry.binding,
                visibility: entry.visibility.into(),
                ty: match entry.ty {
                    BindingType::UniformBuffer => wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    BindingType::Texture(dimension) => wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: dimension.into(),
                        multisampled: false,
                    },
                    BindingType::Sampler => {
                        wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering)
                    }
                },
                count: None,
            })
            .collect();

        let layout = self
            .validated(|device| {
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: None,
                    entries: &entries,
                })
            })
            .map_err(BackendError::PipelineCreationFailed)?;
        Ok(BindGroupLayoutHandle(self.objects.insert(GpuObject::Layout(layout))))
    }

    fn create_bind_group(
        &mut self,
        layout: BindGroupLayoutHandle,
        entries: &[(u32, BindGroupEntry)],
    ) -> BackendResult<BindGroupHandle> {
        let missing = |what: &str, binding: u32| {
            BackendError::PipelineCreationFailed(format!("{what} for binding {binding} not found"))
        };

        let layout = self.objects.layout(layout.0).ok_or_else(|| {
            BackendError::PipelineCreationFailed(format!("{:?} not found", layout))
        })?;

        let resources = entries
            .iter()
            .map(|(binding, entry)| {
                let resource = match entry {
                    BindGroupEntry::Buffer {
                        buffer,
                        offset,
                        size,
                    } => wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: self
                            .objects
                            .buffer(buffer.0)
                            .ok_or_else(|| missing("buffer", *binding))?,
                        offset: *offset,
                        size: size.and_then(wgpu::BufferSize::new),
                    }),
                    BindGroupEntry::Texture(view) => wgpu::BindingResource::TextureView(
                        self.objects
                            .view(view.0)
                            .ok_or_else(|| missing("texture view", *binding))?,
                    ),
                    BindGroupEntry::Sampler(sampler) => wgpu::BindingResource::Sampler(
                        self.objects
                            .sampler(sampler.0)
                            .ok_or_else(|| missing("sampler", *binding))?,
                    ),
                };
                Ok(wgpu::BindGroupEntry {
                    binding: *binding,
                    resource,
                })
            })
            .collect::<BackendResult<Vec<_>>>()?;

        let bind_group = self
            .validated(|device| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: None,
                    layout,
                    entries: &resources,
                })
            })
            .map_err(BackendError::PipelineCreationFailed)?;
        Ok(BindGroupHandle(self.objects.insert(GpuObject::BindGroup(bind_group))))
    }

    fn create_render_pipeline(
        &mut self,
        desc: &RenderPipelineDescriptor,
    ) -> BackendResult<RenderPipelineHandle> {
        let fail = |message: String| {
            BackendError::PipelineCreationFailed(format!("{:?}: {}", desc.label, message))
        };

        let layouts = desc
            .bind_group_layouts
            .iter()
            .map(|handle| {
                self.objects
                    .layout(handle.0)
                    .ok_or_else(|| fail(format!("{:?} not found", handle)))
            })
            .collect::<BackendResult<Vec<_>>>()?;

        let attributes: Vec<Vec<wgpu::VertexAttribute>> = desc
            .vertex_layouts
            .iter()
            .map(|layout| {
                layout
                    .attributes
                    .iter()
                    .map(|attribute| wgpu::VertexAttribute {
                        format: attribute.format.into(),
                        offset: attribute.offset,
                        shader_location: attribute.location,
                    })
                    .collect()
            })
            .collect();
        let buffers: Vec<_> = desc
            .vertex_layouts
            .iter()
            .zip(&attributes)
            .map(|(layout, attributes)| wgpu::VertexBufferLayout {
                array_stride: layout.stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            })
            .collect();
        let targets: Vec<_> = desc
            .color_formats
            .iter()
            .map(|&format| {
                Some(wgpu::ColorTargetState {
                    format: format.into(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })
            })
            .collect();

        let pipeline = self
            .validated(|device| {
                let compile = |source: &ShaderModuleSource| {
                    device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: source.label.as_deref(),
                        source: wgpu::ShaderSource::Wgsl(source.wgsl.as_str().into()),
                    })
                };
                let vertex_module = compile(&desc.vertex);
                let fragment = desc
                    .fragment
                    .as_ref()
                    .map(|source| (source, compile(source)));
                let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: desc.label.as_deref(),
                    bind_group_layouts: &layouts,
                    push_constant_ranges: &[],
                });

                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: desc.label.as_deref(),
                    layout: Some(&layout),
                    vertex: wgpu::VertexState {
                        module: &vertex_module,
                        entry_point: &desc.vertex.entry_point,
                        compilation_options: Default::default(),
                        buffers: &buffers,
                    },
                    primitive: wgpu::PrimitiveState {
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: convert::cull_face(desc.cull_mode),
                        ..Default::default()
                    },
                    depth_stencil: desc.depth.as_ref().map(|depth| wgpu::DepthStencilState {
                        format: depth.format.into(),
                        depth_write_enabled: depth.write_enabled,
                        depth_compare: depth.compare.into(),
                        stencil: Default::default(),
                        bias: Default::default(),
                    }),
                    multisample: Default::default(),
                    fragment: fragment.as_ref().map(|(source, module)| wgpu::FragmentState {
                        module,
                        entry_point: &source.entry_point,
                        compilation_options: Default::default(),
                        targets: &targets,
                    }),
                    multiview: None,
                })
            })
            .map_err(fail)?;
        Ok(RenderPipelineHandle(self.objects.insert(GpuObject::Pipeline(pipeline))))
    }

    fn begin_render_pass(&mut self, desc: &RenderPassDescriptor) {
        if self.pass.is_some() {
            log::warn!("Render pass begun inside another pass, the open pass is dropped");
        }
        self.pass = Some(OpenPass {
            desc: desc.clone(),
            commands: Vec::new(),
        });
    }

    fn end_render_pass(&mut self) {
        let Some(pass) = self.pass.take() else {
            return;
        };
        let Some(frame) = self.frame.as_mut() else {
            log::warn!("{:?} ended outside a frame, nothing drawn", pass.desc.label);
            return;
        };
        let objects = &self.objects;

        let Some(color_attachments) = pass
            .desc
            .color_attachments
            .iter()
            .map(|attachment| {
                objects.view(attachment.view.0).map(|view| {
                    Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: attachment.load.into(),
                    })
                })
            })
            .collect::<Option<Vec<_>>>()
        else {
            log::warn!("{:?}: color target not found, nothing drawn", pass.desc.label);
            return;
        };

        let depth_stencil_attachment = match &pass.desc.depth_attachment {
            None => None,
            Some(attachment) => match objects.view(attachment.view.0) {
                Some(view) => Some(wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(attachment.load.into()),
                    stencil_ops: None,
                }),
                None => {
                    log::warn!("{:?}: depth target not found, nothing drawn", pass.desc.label);
                    return;
                }
            },
        };

        let mut render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: pass.desc.label.as_deref(),
            color_attachments: &color_attachments,
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for command in &pass.commands {
            match command {
                PassCommand::Pipeline(handle) => {
                    if let Some(pipeline) = objects.pipeline(handle.0) {
                        render_pass.set_pipeline(pipeline);
                    }
                }
                PassCommand::BindGroup(index, handle) => {
                    if let Some(bind_group) = objects.bind_group(handle.0) {
                        render_pass.set_bind_group(*index, bind_group, &[]);
                    }
                }
                PassCommand::VertexBuffer(slot, handle, offset) => {
                    if let Some(buffer) = objects.buffer(handle.0) {
                        render_pass.set_vertex_buffer(*slot, buffer.slice(*offset..));
                    }
                }
                PassCommand::IndexBuffer(handle, offset, format) => {
                    if let Some(buffer) = objects.buffer(handle.0) {
                        render_pass.set_index_buffer(buffer.slice(*offset..), (*format).into());
                    }
                }
                PassCommand::DrawIndexed(indices, base_vertex, instances) => {
                    render_pass.draw_indexed(indices.clone(), *base_vertex, instances.clone());
                }
            }
        }
    }

    fn set_render_pipeline(&mut self, pipeline: RenderPipelineHandle) {
        self.queue_command(PassCommand::Pipeline(pipeline));
    }

    fn set_bind_group(&mut self, index: u32, bind_group: BindGroupHandle) {
        self.queue_command(PassCommand::BindGroup(index, bind_group));
    }

    fn set_vertex_buffer(&mut self, slot: u32, buffer: BufferHandle, offset: u64) {
        self.queue_command(PassCommand::VertexBuffer(slot, buffer, offset));
    }

    fn set_index_buffer(&mut self, buffer: BufferHandle, offset: u64, format: IndexFormat) {
        self.queue_command(PassCommand::IndexBuffer(buffer, offset, format));
    }

    fn draw_indexed(&mut self, indices: Range<u32>, base_vertex: i32, instances: Range<u32>) {
        self.queue_command(PassCommand::DrawIndexed(indices, base_vertex, instances));
    }

    fn destroy_buffer(&mut self, buffer: BufferHandle) {
        if let Some(GpuObject::Buffer(buffer)) = self.objects.remove(buffer.0) {
            buffer.destroy();
        }
    }

    fn destroy_texture(&mut self, texture: TextureHandle) {
        self.objects.remove_views_of(texture.0);
        if let Some(GpuObject::Texture(texture)) = self.objects.remove(texture.0) {
            texture.destroy();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(8192, (1280, 720), (1280, 720))]
    #[case(8192, (0, 0), (1, 1))]
    #[case(2048, (4096, 2048), (2048, 1024))]
    #[case(1024, (100, 5000), (20, 1024))]
    fn test_fit_to_limit(#[case] limit: u32, #[case] size: (u32, u32), #[case] fitted: (u32, u32)) {
        assert_eq!(fit_to_limit(limit, size.0, size.1), fitted);
    }

    #[test]
    fn test_surface_format_prefers_srgb() {
        let offered = [
            wgpu::TextureFormat::Rgb10a2Unorm,
            wgpu::TextureFormat::Bgra8Unorm,
            wgpu::TextureFormat::Bgra8UnormSrgb,
        ];

        assert_eq!(
            pick_surface_format(&offered),
            Some((wgpu::TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8UnormSrgb))
        );
    }

    #[test]
    fn test_surface_format_skips_unknown_formats() {
        let offered = [wgpu::TextureFormat::Rgb10a2Unorm, wgpu::TextureFormat::Rgba8Unorm];
        assert_eq!(
            pick_surface_format(&offered),
            Some((wgpu::TextureFormat::Rgba8Unorm, TextureFormat::Rgba8Unorm))
        );

        assert_eq!(pick_surface_format(&[wgpu::TextureFormat::Rgb10a2Unorm]), None);
    }
}

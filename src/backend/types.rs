//! Plain data describing backend resources and pipeline state

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Pixel formats used by cube maps, the surface and the depth target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    Rgba8Unorm,
    Rgba8UnormSrgb,
    Bgra8Unorm,
    Bgra8UnormSrgb,
    Rgba16Float,
    Depth32Float,
    Depth24PlusStencil8,
}

impl TextureFormat {
    pub fn is_depth(self) -> bool {
        matches!(self, Self::Depth32Float | Self::Depth24PlusStencil8)
    }

    pub fn is_srgb(self) -> bool {
        matches!(self, Self::Rgba8UnormSrgb | Self::Bgra8UnormSrgb)
    }

    /// Size of one texel. The packed depth-stencil format counts as 4.
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            Self::Rgba16Float => 8,
            _ => 4,
        }
    }
}

/// Length of a full mip chain for a texture whose largest side is `extent`
pub fn max_mip_levels(extent: u32) -> u32 {
    u32::BITS - extent.leading_zeros()
}

bitflags! {
    /// Ways a buffer may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BufferUsage: u32 {
        const VERTEX = 1 << 0;
        const INDEX = 1 << 1;
        const UNIFORM = 1 << 2;
        const COPY_DST = 1 << 3;
    }

    /// Ways a texture may be used
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TextureUsage: u32 {
        const TEXTURE_BINDING = 1 << 0;
        const RENDER_ATTACHMENT = 1 << 1;
        const COPY_DST = 1 << 2;
    }

    /// Shader stages that can see a binding
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const VERTEX_FRAGMENT = Self::VERTEX.bits() | Self::FRAGMENT.bits();
    }
}

/// How a texture is viewed when bound to a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureViewDimension {
    #[default]
    D2,
    /// Six array layers read as the +X, -X, +Y, -Y, +Z, -Z faces
    Cube,
}

/// A 2D texture, layered when `array_layers > 1`
#[derive(Debug, Clone, PartialEq)]
pub struct TextureDescriptor {
    pub label: Option<String>,
    pub width: u32,
    pub height: u32,
    pub array_layers: u32,
    pub mip_levels: u32,
    pub format: TextureFormat,
    pub usage: TextureUsage,
}

impl Default for TextureDescriptor {
    fn default() -> Self {
        Self {
            label: None,
            width: 1,
            height: 1,
            array_layers: 1,
            mip_levels: 1,
            format: TextureFormat::Rgba8Unorm,
            usage: TextureUsage::TEXTURE_BINDING | TextureUsage::COPY_DST,
        }
    }
}

/// One layer and mip of a texture, the target of a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureRegion {
    pub array_layer: u32,
    pub mip_level: u32,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BufferDescriptor {
    pub label: Option<String>,
    pub size: u64,
    pub usage: BufferUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexFormat {
    Float32x2,
    Float32x3,
    Float32x4,
}

impl VertexFormat {
    pub fn size(self) -> u64 {
        match self {
            Self::Float32x2 => 8,
            Self::Float32x3 => 12,
            Self::Float32x4 => 16,
        }
    }
}

/// Attribute read from `offset` bytes into each vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    pub location: u32,
    pub offset: u64,
    pub format: VertexFormat,
}

/// Layout of one interleaved vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferLayout {
    pub stride: u64,
    pub attributes: Vec<VertexAttribute>,
}

impl VertexBufferLayout {
    /// Attributes stored back to back, at shader locations 0, 1, 2...
    pub fn packed(formats: &[VertexFormat]) -> Self {
        let mut stride = 0;
        let attributes = formats
            .iter()
            .zip(0..)
            .map(|(&format, location)| {
                let attribute = VertexAttribute {
                    location,
                    offset: stride,
                    format,
                };
                stride += format.size();
                attribute
            })
            .collect();

        Self { stride, attributes }
    }
}

/// Vertex of the generated meshes
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn layout() -> VertexBufferLayout {
        VertexBufferLayout::packed(&[
            VertexFormat::Float32x3,
            VertexFormat::Float32x3,
            VertexFormat::Float32x2,
        ])
    }
}

/// Faces dropped by the rasterizer. Front faces wind counter-clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Depth test against the stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunction {
    Less,
    LessEqual,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
}

/// Sampler state. One filter covers magnification, minification and mip
/// blending, one address mode covers all three axes.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDescriptor {
    pub label: Option<String>,
    pub filter: FilterMode,
    pub address_mode: AddressMode,
}

impl SamplerDescriptor {
    /// Trilinear filtering, clamped on every axis
    pub fn linear_clamp() -> Self {
        Self {
            label: Some("linear_clamp".into()),
            filter: FilterMode::Linear,
            address_mode: AddressMode::ClampToEdge,
        }
    }
}

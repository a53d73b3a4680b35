//! Mapping from backend types to their wgpu counterparts

use crate::backend::traits::{IndexFormat, LoadOp};
use crate::backend::types::*;

impl From<TextureFormat> for wgpu::TextureFormat {
    fn from(format: TextureFormat) -> Self {
        match format {
            TextureFormat::Rgba8Unorm => Self::Rgba8Unorm,
            TextureFormat::Rgba8UnormSrgb => Self::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm => Self::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb => Self::Bgra8UnormSrgb,
            TextureFormat::Rgba16Float => Self::Rgba16Float,
            TextureFormat::Depth32Float => Self::Depth32Float,
            TextureFormat::Depth24PlusStencil8 => Self::Depth24PlusStencil8,
        }
    }
}

/// The color format a surface image can be rendered as, if this crate knows it
pub(super) fn color_format(format: wgpu::TextureFormat) -> Option<TextureFormat> {
    [
        TextureFormat::Rgba8Unorm,
        TextureFormat::Rgba8UnormSrgb,
        TextureFormat::Bgra8Unorm,
        TextureFormat::Bgra8UnormSrgb,
        TextureFormat::Rgba16Float,
    ]
    .into_iter()
    .find(|&ours| wgpu::TextureFormat::from(ours) == format)
}

const BUFFER_USAGES: [(BufferUsage, wgpu::BufferUsages); 4] = [
    (BufferUsage::VERTEX, wgpu::BufferUsages::VERTEX),
    (BufferUsage::INDEX, wgpu::BufferUsages::INDEX),
    (BufferUsage::UNIFORM, wgpu::BufferUsages::UNIFORM),
    (BufferUsage::COPY_DST, wgpu::BufferUsages::COPY_DST),
];

const TEXTURE_USAGES: [(TextureUsage, wgpu::TextureUsages); 3] = [
    (TextureUsage::TEXTURE_BINDING, wgpu::TextureUsages::TEXTURE_BINDING),
    (TextureUsage::RENDER_ATTACHMENT, wgpu::TextureUsages::RENDER_ATTACHMENT),
    (TextureUsage::COPY_DST, wgpu::TextureUsages::COPY_DST),
];

const SHADER_STAGES: [(ShaderStageFlags, wgpu::ShaderStages); 2] = [
    (ShaderStageFlags::VERTEX, wgpu::ShaderStages::VERTEX),
    (ShaderStageFlags::FRAGMENT, wgpu::ShaderStages::FRAGMENT),
];

impl From<BufferUsage> for wgpu::BufferUsages {
    fn from(usage: BufferUsage) -> Self {
        BUFFER_USAGES
            .iter()
            .filter(|(ours, _)| usage.contains(*ours))
            .fold(Self::empty(), |acc, (_, theirs)| acc | *theirs)
    }
}

impl From<TextureUsage> for wgpu::TextureUsages {
    fn from(usage: TextureUsage) -> Self {
        TEXTURE_USAGES
            .iter()
            .filter(|(ours, _)| usage.contains(*ours))
            .fold(Self::empty(), |acc, (_, theirs)| acc | *theirs)
    }
}

impl From<ShaderStageFlags> for wgpu::ShaderStages {
    fn from(stages: ShaderStageFlags) -> Self {
        SHADER_STAGES
            .iter()
            .filter(|(ours, _)| stages.contains(*ours))
            .fold(Self::empty(), |acc, (_, theirs)| acc | *theirs)
    }
}

impl From<TextureViewDimension> for wgpu::TextureViewDimension {
    fn from(dimension: TextureViewDimension) -> Self {
        match dimension {
            TextureViewDimension::D2 => Self::D2,
            TextureViewDimension::Cube => Self::Cube,
        }
    }
}

impl From<VertexFormat> for wgpu::VertexFormat {
    fn from(format: VertexFormat) -> Self {
        match format {
            VertexFormat::Float32x2 => Self::Float32x2,
            VertexFormat::Float32x3 => Self::Float32x3,
            VertexFormat::Float32x4 => Self::Float32x4,
        }
    }
}

impl From<CompareFunction> for wgpu::CompareFunction {
    fn from(compare: CompareFunction) -> Self {
        match compare {
            CompareFunction::Less => Self::Less,
            CompareFunction::LessEqual => Self::LessEqual,
            CompareFunction::Always => Self::Always,
        }
    }
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(filter: FilterMode) -> Self {
        match filter {
            FilterMode::Nearest => Self::Nearest,
            FilterMode::Linear => Self::Linear,
        }
    }
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(mode: AddressMode) -> Self {
        match mode {
            AddressMode::ClampToEdge => Self::ClampToEdge,
            AddressMode::Repeat => Self::Repeat,
        }
    }
}

impl From<IndexFormat> for wgpu::IndexFormat {
    fn from(format: IndexFormat) -> Self {
        match format {
            IndexFormat::Uint16 => Self::Uint16,
            IndexFormat::Uint32 => Self::Uint32,
        }
    }
}

pub(super) fn cull_face(mode: CullMode) -> Option<wgpu::Face> {
    match mode {
        CullMode::None => None,
        CullMode::Front => Some(wgpu::Face::Front),
        CullMode::Back => Some(wgpu::Face::Back),
    }
}

impl From<LoadOp<[f32; 4]>> for wgpu::Operations<wgpu::Color> {
    fn from(load: LoadOp<[f32; 4]>) -> Self {
        let load = match load {
            LoadOp::Load => wgpu::LoadOp::Load,
            LoadOp::Clear([r, g, b, a]) => wgpu::LoadOp::Clear(wgpu::Color {
                r: r.into(),
                g: g.into(),
                b: b.into(),
                a: a.into(),
            }),
        };
        Self {
            load,
            store: wgpu::StoreOp::Store,
        }
    }
}

impl From<LoadOp<f32>> for wgpu::Operations<f32> {
    fn from(load: LoadOp<f32>) -> Self {
        let load = match load {
            LoadOp::Load => wgpu::LoadOp::Load,
            LoadOp::Clear(depth) => wgpu::LoadOp::Clear(depth),
        };
        Self {
            load,
            store: wgpu::StoreOp::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(wgpu::TextureFormat::Bgra8UnormSrgb, Some(TextureFormat::Bgra8UnormSrgb))]
    #[case(wgpu::TextureFormat::Rgba16Float, Some(TextureFormat::Rgba16Float))]
    #[case(wgpu::TextureFormat::Rgb10a2Unorm, None)]
    #[case(wgpu::TextureFormat::Depth32Float, None)]
    fn test_color_format_from_surface(
        #[case] surface: wgpu::TextureFormat,
        #[case] expected: Option<TextureFormat>,
    ) {
        assert_eq!(color_format(surface), expected);
    }

    #[test]
    fn test_usage_sets_map_bit_by_bit() {
        let usage = wgpu::BufferUsages::from(BufferUsage::UNIFORM | BufferUsage::COPY_DST);
        assert_eq!(usage, wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST);

        let usage = wgpu::TextureUsages::from(TextureUsage::TEXTURE_BINDING);
        assert_eq!(usage, wgpu::TextureUsages::TEXTURE_BINDING);

        let stages = wgpu::ShaderStages::from(ShaderStageFlags::VERTEX_FRAGMENT);
        assert_eq!(stages, wgpu::ShaderStages::VERTEX_FRAGMENT);
    }

    #[test]
    fn test_cube_dimension() {
        assert_eq!(
            wgpu::TextureViewDimension::from(TextureViewDimension::Cube),
            wgpu::TextureViewDimension::Cube
        );
    }

    #[test]
    fn test_clear_ops_store_results() {
        let ops = wgpu::Operations::<f32>::from(LoadOp::Clear(1.0));
        assert_eq!(ops.load, wgpu::LoadOp::Clear(1.0));
        assert_eq!(ops.store, wgpu::StoreOp::Store);
    }
}

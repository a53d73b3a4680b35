//! Shared helpers for the integration tests.

#![allow(dead_code)]

use glam::Mat4;
use skybox_scene::resources::CubeMapData;
use skybox_scene::scene::SharedResources;
use skybox_scene::skybox::CubeMapSource;
use skybox_scene::{HeadlessBackend, SkyboxConfig};

// ============================================================================
// DDS Files
// ============================================================================

const DDS_MAGIC: &[u8; 4] = b"DDS ";
const DDSD_CAPS_HEIGHT_WIDTH_PIXELFORMAT: u32 = 0x1007;
const DDSD_MIPMAPCOUNT: u32 = 0x20000;
const DDPF_FOURCC: u32 = 0x4;
const DDSCAPS_TEXTURE_COMPLEX: u32 = 0x1000 | 0x8;
const DDSCAPS2_CUBEMAP_ALL_FACES: u32 = 0x200 | 0xFC00;
const DXGI_FORMAT_R8G8B8A8_UNORM: u32 = 28;
const RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;
const MISC_TEXTURECUBE: u32 = 0x4;

/// Shape of a hand-built DDS file
#[derive(Debug, Clone, Copy)]
pub struct DdsSpec {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub cube: bool,
    /// Bytes of pixel data to write, `None` for exactly what the shape needs
    pub data_len: Option<usize>,
}

impl DdsSpec {
    pub fn cube(size: u32) -> Self {
        Self {
            width: size,
            height: size,
            mip_levels: 1,
            cube: true,
            data_len: None,
        }
    }

    pub fn with_mips(mut self, mip_levels: u32) -> Self {
        self.mip_levels = mip_levels;
        self
    }

    pub fn flat(mut self) -> Self {
        self.cube = false;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn truncated_to(mut self, data_len: usize) -> Self {
        self.data_len = Some(data_len);
        self
    }

    /// Pixel bytes for six RGBA8 faces with the full mip chain
    pub fn expected_data_len(&self) -> usize {
        let per_face: usize = (0..self.mip_levels)
            .map(|mip| {
                let w = (self.width >> mip).max(1) as usize;
                let h = (self.height >> mip).max(1) as usize;
                w * h * 4
            })
            .sum();
        per_face * 6
    }
}

fn put(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// Encode a DX10 RGBA8 DDS file. Texel values count up so faces differ.
pub fn build_dds(spec: DdsSpec) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(DDS_MAGIC);

    // DDS_HEADER
    put(&mut out, 124);
    put(&mut out, DDSD_CAPS_HEIGHT_WIDTH_PIXELFORMAT | DDSD_MIPMAPCOUNT);
    put(&mut out, spec.height);
    put(&mut out, spec.width);
    put(&mut out, spec.width * 4);
    put(&mut out, 0);
    put(&mut out, spec.mip_levels);
    for _ in 0..11 {
        put(&mut out, 0);
    }

    // DDS_PIXELFORMAT
    put(&mut out, 32);
    put(&mut out, DDPF_FOURCC);
    out.extend_from_slice(b"DX10");
    for _ in 0..5 {
        put(&mut out, 0);
    }

    put(&mut out, DDSCAPS_TEXTURE_COMPLEX);
    put(&mut out, if spec.cube { DDSCAPS2_CUBEMAP_ALL_FACES } else { 0 });
    put(&mut out, 0);
    put(&mut out, 0);
    put(&mut out, 0);

    // DDS_HEADER_DXT10
    put(&mut out, DXGI_FORMAT_R8G8B8A8_UNORM);
    put(&mut out, RESOURCE_DIMENSION_TEXTURE2D);
    put(&mut out, if spec.cube { MISC_TEXTURECUBE } else { 0 });
    put(&mut out, 1);
    put(&mut out, 0);

    let len = spec.data_len.unwrap_or_else(|| spec.expected_data_len());
    out.extend((0..len).map(|i| (i % 251) as u8));
    out
}

// ============================================================================
// Scene Setup
// ============================================================================

pub fn solid_source(color: [u8; 4], name: &str) -> CubeMapSource {
    CubeMapSource::Data(CubeMapData::solid_color(color, 4, name))
}

/// Skybox config that needs no files and no depth target
pub fn solid_config() -> SkyboxConfig {
    let sky = solid_source([90, 150, 235, 255], "sky");
    SkyboxConfig::new()
        .with_cube_maps(sky.clone(), sky)
        .with_depth_format(None)
}

pub fn headless_setup() -> (HeadlessBackend, SharedResources) {
    let mut backend = HeadlessBackend::new(640, 360);
    let shared = SharedResources::new(&mut backend, Mat4::IDENTITY).expect("shared resources");
    (backend, shared)
}

//! Cube map loading and upload

use crate::backend::traits::*;
use crate::backend::types::*;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading cube map data
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid DDS file: {0}")]
    Parse(String),
    #[error("'{0}' is not a cube map")]
    NotCubeMap(String),
    #[error("Cube map faces must be square, got {width}x{height}")]
    NonSquareFaces { width: u32, height: u32 },
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),
    #[error("Pixel data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("{mip_levels} mip levels requested for {size}x{size} faces, at most {max} fit")]
    TooManyMips { size: u32, mip_levels: u32, max: u32 },
}


/// Number of faces in a cube map, ordered +X, -X, +Y, -Y, +Z, -Z
pub const CUBE_FACES: u32 = 6;

/// Decoded cube map, faces stored one after another with every mip of a face
/// before the next face (the DDS layout)
#[derive(Debug, Clone, PartialEq)]
pub struct CubeMapData {
    pub name: String,
    pub size: u32,
    pub mip_levels: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

impl CubeMapData {
    /// Load a cube map from a DDS file
    pub fn from_dds_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let bytes = std::fs::read(path)?;
        Self::from_dds_bytes(&bytes, &name)
    }

    /// Load a cube map from DDS bytes
    pub fn from_dds_bytes(bytes: &[u8], name: &str) -> Result<Self, TextureError> {
        let dds = ddsfile::Dds::read(&mut std::io::Cursor::new(bytes))
            .map_err(|e| TextureError::Parse(format!("{:?}", e)))?;

        // DX10 writers set the caps2 cube bits alongside the header10 flag
        if !dds.header.caps2.contains(ddsfile::Caps2::CUBEMAP) {
            return Err(TextureError::NotCubeMap(name.to_string()));
        }

        let (width, height) = (dds.get_width(), dds.get_height());
        if width != height || width == 0 {
            return Err(TextureError::NonSquareFaces { width, height });
        }

        let format = Self::convert_format(&dds)?;
        let mip_levels = dds.get_num_mipmap_levels().max(1);
        let expected = Self::check_layout(width, mip_levels, format, dds.data.len())?;

        log::info!(
            "Loaded cube map '{}': {}x{} {:?}, {} mips",
            name,
            width,
            height,
            format,
            mip_levels
        );

        Ok(Self {
            name: name.to_string(),
            size: width,
            mip_levels,
            format,
            data: dds.data[..expected].to_vec(),
        })
    }

    fn convert_format(dds: &ddsfile::Dds) -> Result<TextureFormat, TextureError> {
        use ddsfile::{D3DFormat, DxgiFormat};

        if let Some(format) = dds.get_dxgi_format() {
            return match format {
                DxgiFormat::R8G8B8A8_UNorm => Ok(TextureFormat::Rgba8Unorm),
                DxgiFormat::R8G8B8A8_UNorm_sRGB => Ok(TextureFormat::Rgba8UnormSrgb),
                DxgiFormat::B8G8R8A8_UNorm => Ok(TextureFormat::Bgra8Unorm),
                DxgiFormat::B8G8R8A8_UNorm_sRGB => Ok(TextureFormat::Bgra8UnormSrgb),
                DxgiFormat::R16G16B16A16_Float => Ok(TextureFormat::Rgba16Float),
                other => Err(TextureError::UnsupportedFormat(format!("dxgi:{:?}", other))),
            };
        }

        match dds.get_d3d_format() {
            Some(D3DFormat::A8B8G8R8) => Ok(TextureFormat::Rgba8Unorm),
            Some(D3DFormat::A8R8G8B8) => Ok(TextureFormat::Bgra8Unorm),
            Some(D3DFormat::A16B16G16R16F) => Ok(TextureFormat::Rgba16Float),
            other => Err(TextureError::UnsupportedFormat(format!("d3d:{:?}", other))),
        }
    }

    /// Check that `size`, `mip_levels` and the data length describe a valid
    /// cube map. Returns the number of bytes the faces occupy.
    fn check_layout(
        size: u32,
        mip_levels: u32,
        format: TextureFormat,
        actual: usize,
    ) -> Result<usize, TextureError> {
        if size == 0 {
            return Err(TextureError::NonSquareFaces {
                width: size,
                height: size,
            });
        }

        let max = max_mip_levels(size);
        if mip_levels == 0 || mip_levels > max {
            return Err(TextureError::TooManyMips {
                size,
                mip_levels,
                max,
            });
        }

        let expected = Self::byte_size(size, mip_levels, format);
        if actual < expected {
            return Err(TextureError::Truncated { expected, actual });
        }
        Ok(expected)
    }

    /// Validate data built in memory before it is uploaded
    pub fn validate(&self) -> Result<(), TextureError> {
        Self::check_layout(self.size, self.mip_levels, self.format, self.data.len()).map(|_| ())
    }

    /// Total bytes for six faces with the full mip chain
    pub fn byte_size(size: u32, mip_levels: u32, format: TextureFormat) -> usize {
        let per_face: usize = (0..mip_levels)
            .map(|mip| {
                let extent = (size >> mip).max(1) as usize;
                extent * extent * format.bytes_per_pixel() as usize
            })
            .sum();
        per_face * CUBE_FACES as usize
    }

    /// Create a cube map where every texel of every face has the same color
    pub fn solid_color(color: [u8; 4], size: u32, name: &str) -> Self {
        let size = size.max(1);
        let texels = (size * size * CUBE_FACES) as usize;

        Self {
            name: name.to_string(),
            size,
            mip_levels: 1,
            format: TextureFormat::Rgba8Unorm,
            data: color.repeat(texels),
        }
    }

    /// Split the pixel data into one upload region per face and mip.
    /// Stops early if the data runs out; `validate` rejects such data.
    pub fn subresources(&self) -> Vec<(TextureRegion, &[u8])> {
        let bpp = self.format.bytes_per_pixel();
        let mut offset = 0;
        let mut regions = Vec::with_capacity((CUBE_FACES * self.mip_levels) as usize);

        for face in 0..CUBE_FACES {
            for mip in 0..self.mip_levels {
                let extent = (self.size >> mip).max(1);
                let len = (extent * extent * bpp) as usize;
                let Some(bytes) = self.data.get(offset..offset + len) else {
                    return regions;
                };
                regions.push((
                    TextureRegion {
                        array_layer: face,
                        mip_level: mip,
                        width: extent,
                        height: extent,
                        bytes_per_row: extent * bpp,
                    },
                    bytes,
                ));
                offset += len;
            }
        }

        regions
    }
}

/// Cube map texture on the GPU with its cube view
pub struct GpuCubeMap {
    pub handle: TextureHandle,
    pub view: TextureViewHandle,
    pub size: u32,
    pub format: TextureFormat,
    pub name: String,
}

impl GpuCubeMap {
    /// Create and upload every face and mip
    pub fn create<B: GraphicsBackend>(backend: &mut B, data: &CubeMapData) -> BackendResult<Self> {
        let handle = backend.create_texture(&TextureDescriptor {
            label: Some(data.name.clone()),
            width: data.size,
            height: data.size,
            array_layers: CUBE_FACES,
            mip_levels: data.mip_levels,
            format: data.format,
            usage: TextureUsage::TEXTURE_BINDING | TextureUsage::COPY_DST,
        })?;

        for (region, bytes) in data.subresources() {
            backend.write_texture(handle, &region, bytes);
        }

        let view = backend.create_texture_view(handle, TextureViewDimension::Cube)?;

        Ok(Self {
            handle,
            view,
            size: data.size,
            format: data.format,
            name: data.name.clone(),
        })
    }

    /// Release the texture; its view goes with it
    pub fn destroy<B: GraphicsBackend>(self, backend: &mut B) {
        backend.destroy_texture(self.handle);
    }
}

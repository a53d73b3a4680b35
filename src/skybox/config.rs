//! Skybox configuration

use std::borrow::Cow;
use std::path::PathBuf;

use crate::backend::TextureFormat;
use crate::resources::CubeMapData;

use super::SkyboxError;

/// Cube map asset used when nothing else is configured
pub const DEFAULT_CUBE_MAP_PATH: &str = "Resources/Textures/CubeMap.dds";

/// Where a cube map comes from
#[derive(Debug, Clone, PartialEq)]
pub enum CubeMapSource {
    /// DDS file on disk
    File(PathBuf),
    /// Already decoded data
    Data(CubeMapData),
}

impl CubeMapSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        CubeMapSource::File(path.into())
    }

    /// Human readable origin, used in logs and errors
    pub fn describe(&self) -> String {
        match self {
            CubeMapSource::File(path) => path.display().to_string(),
            CubeMapSource::Data(data) => format!("<memory:{}>", data.name),
        }
    }

    /// Read the cube map, checking in-memory data the same way as a file
    pub fn load(&self) -> Result<Cow<'_, CubeMapData>, SkyboxError> {
        let loaded = match self {
            CubeMapSource::File(path) => CubeMapData::from_dds_file(path).map(Cow::Owned),
            CubeMapSource::Data(data) => data.validate().map(|_| Cow::Borrowed(data)),
        };
        loaded.map_err(|source| SkyboxError::TextureLoad {
            path: self.describe(),
            source,
        })
    }
}

impl Default for CubeMapSource {
    fn default() -> Self {
        CubeMapSource::file(DEFAULT_CUBE_MAP_PATH)
    }
}

/// Configuration for [`super::SkyboxRenderer`]
#[derive(Debug, Clone)]
pub struct SkyboxConfig {
    pub day_cube_map: CubeMapSource,
    pub evening_cube_map: CubeMapSource,
    /// Angle units added per second of elapsed time
    pub rotation_rate: f32,
    /// Degrees of rotation per angle unit
    pub rotation_scale: f32,
    pub sphere_radius: f32,
    pub tessellation: u32,
    /// Format of the color target the skybox is drawn into
    pub color_format: TextureFormat,
    /// Depth target format, `None` to draw without depth testing
    pub depth_format: Option<TextureFormat>,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            day_cube_map: CubeMapSource::default(),
            evening_cube_map: CubeMapSource::default(),
            rotation_rate: 30.0,
            rotation_scale: 0.01,
            sphere_radius: 2.0,
            tessellation: 6,
            color_format: TextureFormat::Bgra8UnormSrgb,
            depth_format: Some(TextureFormat::Depth32Float),
        }
    }
}

impl SkyboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cube_maps(mut self, day: CubeMapSource, evening: CubeMapSource) -> Self {
        self.day_cube_map = day;
        self.evening_cube_map = evening;
        self
    }

    pub fn with_day_cube_map(mut self, day: CubeMapSource) -> Self {
        self.day_cube_map = day;
        self
    }

    pub fn with_evening_cube_map(mut self, evening: CubeMapSource) -> Self {
        self.evening_cube_map = evening;
        self
    }

    pub fn with_rotation(mut self, rate: f32, scale: f32) -> Self {
        self.rotation_rate = rate;
        self.rotation_scale = scale;
        self
    }

    pub fn with_sphere(mut self, radius: f32, tessellation: u32) -> Self {
        self.sphere_radius = radius;
        self.tessellation = tessellation;
        self
    }

    pub fn with_color_format(mut self, format: TextureFormat) -> Self {
        self.color_format = format;
        self
    }

    pub fn with_depth_format(mut self, format: Option<TextureFormat>) -> Self {
        self.depth_format = format;
        self
    }

    /// Both slots point at the same asset
    pub fn shares_cube_map(&self) -> bool {
        self.day_cube_map == self.evening_cube_map
    }

    pub fn validate(&self) -> Result<(), SkyboxError> {
        if !self.sphere_radius.is_finite() || self.sphere_radius <= 0.0 {
            return Err(SkyboxError::InvalidConfig(format!(
                "sphere radius must be positive, got {}",
                self.sphere_radius
            )));
        }
        if self.tessellation < 3 {
            return Err(SkyboxError::InvalidConfig(format!(
                "tessellation must be at least 3, got {}",
                self.tessellation
            )));
        }
        if !self.rotation_rate.is_finite() || !self.rotation_scale.is_finite() {
            return Err(SkyboxError::InvalidConfig(format!(
                "rotation rate and scale must be finite, got {} and {}",
                self.rotation_rate, self.rotation_scale
            )));
        }
        if self.color_format.is_depth() {
            return Err(SkyboxError::InvalidConfig(format!(
                "{:?} is not a color format",
                self.color_format
            )));
        }
        if let Some(depth) = self.depth_format.filter(|f| !f.is_depth()) {
            return Err(SkyboxError::InvalidConfig(format!(
                "{:?} is not a depth format",
                depth
            )));
        }
        Ok(())
    }
}

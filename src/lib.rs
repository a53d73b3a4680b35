//! Skybox Scene - a rotating, cube-mapped sky that blends from day to evening
//!
//! The crate is built around a small backend abstraction with two
//! implementations:
//! - **wgpu**: real GPU rendering into a window surface
//! - **headless**: records every call for inspection, no GPU required
//!
//! # Features
//! - Day/evening cube map blending driven by a time-of-day value
//! - Slow continuous rotation of the sky around the vertical axis
//! - DDS cube map loading
//! - Debug camera with orbit and free-fly controllers
//! - Resources and services passed in explicitly, no global state

pub mod backend;
pub mod engine;
pub mod resources;
pub mod scene;
pub mod skybox;
pub mod window;

pub use backend::wgpu_backend::WgpuBackend;
pub use backend::HeadlessBackend;
pub use engine::Engine;
pub use skybox::{SkyboxConfig, SkyboxError, SkyboxRenderer};
pub use window::Window;

/// Configuration for the scene host
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Window title
    pub title: String,
    /// Initial window width
    pub width: u32,
    /// Initial window height
    pub height: u32,
    /// Enable vsync
    pub vsync: bool,
    /// Color the frame is cleared to before the sky is drawn
    pub clear_color: [f32; 4],
    /// Initial time of day in [0, 1]
    pub day_progress: f32,
    pub skybox: SkyboxConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Skybox Scene".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            day_progress: 0.0,
            skybox: SkyboxConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_skybox(mut self, skybox: SkyboxConfig) -> Self {
        self.skybox = skybox;
        self
    }

    pub fn with_day_progress(mut self, progress: f32) -> Self {
        self.day_progress = progress;
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

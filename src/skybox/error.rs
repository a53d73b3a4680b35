use thiserror::Error;

use crate::backend::{BackendError, ShaderStage};
use crate::resources::TextureError;

/// Failures while creating the skybox; every one of them is fatal
#[derive(Error, Debug)]
pub enum SkyboxError {
    #[error("Failed to compile {stage} shader: {message}")]
    ShaderCompilation { stage: ShaderStage, message: String },
    #[error("Failed to load cube map '{path}': {source}")]
    TextureLoad {
        path: String,
        #[source]
        source: TextureError,
    },
    #[error("Invalid skybox configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

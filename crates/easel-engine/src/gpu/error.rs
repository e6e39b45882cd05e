use thiserror::Error;

use super::ResourceId;

/// Recoverable GPU resource failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GpuError {
    /// Shader source failed to parse or validate.
    #[error("shader compilation failed: {0}")]
    ShaderCompile(String),

    /// Render target could not be created with the requested size.
    #[error("framebuffer incomplete: {width}x{height}")]
    IncompleteFramebuffer { width: u32, height: u32 },

    /// Texture dimensions are zero or exceed device limits.
    #[error("invalid texture size: {width}x{height}")]
    InvalidTextureSize { width: u32, height: u32 },

    /// Pixel data does not match `width * height * 4`.
    #[error("texture data is {actual} bytes, expected {expected}")]
    TextureDataSize { expected: usize, actual: usize },

    /// The resource id does not name a live backend resource.
    #[error("unknown gpu resource {0:?}")]
    UnknownResource(ResourceId),
}

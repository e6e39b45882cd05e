//! Asset managers.
//!
//! Each manager exclusively owns its backend resources and hands out
//! generation-checked ids. Using an id after `destroy` is an
//! [`AssetError::NotFound`], never a dangling GPU handle.

mod error;
mod images;
mod renderbuffers;
mod shaders;
mod store;
mod textures;

pub use error::AssetError;
pub use images::{Image, ImageId, ImageManager};
pub use renderbuffers::{Renderbuffer, RenderbufferId, RenderbufferManager};
pub use shaders::{Shader, ShaderId, ShaderManager};
pub use textures::{Texture, TextureId, TextureManager};

use crate::gpu::{GpuBackend, ResourceId};

/// Anything [`DrawContext::image`](crate::graphics::DrawContext::image) can draw.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Image(ImageId),
    Texture(TextureId),
    Renderbuffer(RenderbufferId),
}

impl From<ImageId> for ImageSource {
    fn from(id: ImageId) -> Self {
        ImageSource::Image(id)
    }
}

impl From<TextureId> for ImageSource {
    fn from(id: TextureId) -> Self {
        ImageSource::Texture(id)
    }
}

impl From<RenderbufferId> for ImageSource {
    fn from(id: RenderbufferId) -> Self {
        ImageSource::Renderbuffer(id)
    }
}

/// All asset managers of one draw context.
#[derive(Debug, Default)]
pub struct Assets {
    pub images: ImageManager,
    pub textures: TextureManager,
    pub shaders: ShaderManager,
    pub renderbuffers: RenderbufferManager,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend texture and pixel size of a drawable source.
    pub fn resolve(&self, source: ImageSource) -> Result<(ResourceId, u32, u32), AssetError> {
        match source {
            ImageSource::Image(id) => {
                let img = self.images.get(id)?;
                Ok((img.texture, img.width, img.height))
            }
            ImageSource::Texture(id) => {
                let tex = self.textures.get(id)?;
                Ok((tex.resource, tex.width, tex.height))
            }
            ImageSource::Renderbuffer(id) => {
                let rb = self.renderbuffers.get(id)?;
                Ok((rb.color(), rb.width, rb.height))
            }
        }
    }

    /// Releases every resource of every manager.
    pub fn release_all(&mut self, backend: &mut impl GpuBackend) {
        self.images.release_all(backend);
        self.textures.release_all(backend);
        self.shaders.release_all(backend);
        self.renderbuffers.release_all(backend);
    }
}

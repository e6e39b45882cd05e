use crate::gpu::{GpuBackend, ResourceId, TextureFilter};

use super::store::Store;
use super::AssetError;

slotmap::new_key_type! {
    /// Handle to a [`Texture`] owned by the [`TextureManager`].
    pub struct TextureId;
}

/// A GPU-only RGBA8 texture (no CPU copy kept).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub filter: TextureFilter,
    pub resource: ResourceId,
}

#[derive(Debug)]
pub struct TextureManager {
    store: Store<TextureId, Texture>,
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureManager {
    pub fn new() -> Self {
        Self {
            store: Store::new("texture"),
        }
    }

    pub fn create(
        &mut self,
        backend: &mut impl GpuBackend,
        width: u32,
        height: u32,
        rgba: &[u8],
        filter: TextureFilter,
    ) -> Result<TextureId, AssetError> {
        let resource = backend
            .create_texture(width, height, rgba, filter)
            .inspect_err(|e| log::error!("texture: creation failed: {e}"))?;
        Ok(self.store.insert(Texture {
            width,
            height,
            filter,
            resource,
        }))
    }

    /// Replaces the full contents of a texture.
    pub fn update(
        &mut self,
        backend: &mut impl GpuBackend,
        id: TextureId,
        rgba: &[u8],
    ) -> Result<(), AssetError> {
        let texture = self.store.get(id)?;
        backend.update_texture(texture.resource, rgba)?;
        Ok(())
    }

    pub fn get(&self, id: TextureId) -> Result<&Texture, AssetError> {
        self.store.get(id)
    }

    pub fn destroy(&mut self, backend: &mut impl GpuBackend, id: TextureId) -> Result<(), AssetError> {
        let texture = self.store.remove(id)?;
        backend.release_texture(texture.resource);
        Ok(())
    }

    pub fn release_all(&mut self, backend: &mut impl GpuBackend) {
        for texture in self.store.drain() {
            backend.release_texture(texture.resource);
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

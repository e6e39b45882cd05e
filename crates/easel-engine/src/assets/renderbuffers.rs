use crate::gpu::{FramebufferIds, GpuBackend, ResourceId};

use super::store::Store;
use super::AssetError;

slotmap::new_key_type! {
    /// Handle to a [`Renderbuffer`] owned by the [`RenderbufferManager`].
    pub struct RenderbufferId;
}

/// Offscreen render target. Its color texture can be drawn like an image.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Renderbuffer {
    pub width: u32,
    pub height: u32,
    pub ids: FramebufferIds,
}

impl Renderbuffer {
    pub fn framebuffer(&self) -> ResourceId {
        self.ids.framebuffer
    }

    pub fn color(&self) -> ResourceId {
        self.ids.color
    }
}

#[derive(Debug)]
pub struct RenderbufferManager {
    store: Store<RenderbufferId, Renderbuffer>,
}

impl Default for RenderbufferManager {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderbufferManager {
    pub fn new() -> Self {
        Self {
            store: Store::new("renderbuffer"),
        }
    }

    pub fn create(
        &mut self,
        backend: &mut impl GpuBackend,
        width: u32,
        height: u32,
    ) -> Result<RenderbufferId, AssetError> {
        let ids = backend
            .create_framebuffer(width, height)
            .inspect_err(|e| log::error!("renderbuffer: {e}"))?;
        Ok(self.store.insert(Renderbuffer { width, height, ids }))
    }

    pub fn get(&self, id: RenderbufferId) -> Result<&Renderbuffer, AssetError> {
        self.store.get(id)
    }

    pub fn destroy(
        &mut self,
        backend: &mut impl GpuBackend,
        id: RenderbufferId,
    ) -> Result<(), AssetError> {
        let rb = self.store.remove(id)?;
        backend.release_framebuffer(rb.framebuffer());
        Ok(())
    }

    pub fn release_all(&mut self, backend: &mut impl GpuBackend) {
        for rb in self.store.drain() {
            backend.release_framebuffer(rb.framebuffer());
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{GpuError, RecordingBackend};

    #[test]
    fn zero_size_is_incomplete() {
        let mut b = RecordingBackend::new();
        let mut rbs = RenderbufferManager::new();
        let err = rbs.create(&mut b, 0, 10).unwrap_err();
        assert!(matches!(
            err,
            AssetError::Gpu(GpuError::IncompleteFramebuffer { width: 0, height: 10 })
        ));
    }

    #[test]
    fn destroy_releases_framebuffer_and_color() {
        let mut b = RecordingBackend::new();
        let mut rbs = RenderbufferManager::new();
        let id = rbs.create(&mut b, 16, 8).unwrap();
        assert_eq!(b.live_framebuffers(), 1);
        assert_eq!(b.live_textures(), 2);

        rbs.destroy(&mut b, id).unwrap();
        assert_eq!(b.live_framebuffers(), 0);
        assert_eq!(b.live_textures(), 1);
        assert!(rbs.get(id).is_err());
    }
}

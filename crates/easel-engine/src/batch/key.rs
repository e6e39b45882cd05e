use crate::gpu::ResourceId;
use crate::paint::BlendMode;

/// GPU state shared by every index in a batch.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BatchKey {
    pub shader: ResourceId,
    pub texture: ResourceId,
    pub blend: BlendMode,
}

/// Contiguous index range drawn with one key.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Batch {
    pub key: BatchKey,
    /// Offset into the shared index buffer.
    pub index_start: u32,
    pub index_count: u32,
}

impl Batch {
    /// One past the last index of this batch.
    #[inline]
    pub fn index_end(&self) -> u32 {
        self.index_start + self.index_count
    }
}

/// Requested state for a submission. `None` fields take the renderer defaults
/// (default shader, white texture, alpha blending).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DrawState {
    pub shader: Option<ResourceId>,
    pub texture: Option<ResourceId>,
    pub blend: Option<BlendMode>,
}

impl DrawState {
    #[inline]
    pub fn with_shader(mut self, shader: ResourceId) -> Self {
        self.shader = Some(shader);
        self
    }

    #[inline]
    pub fn with_texture(mut self, texture: ResourceId) -> Self {
        self.texture = Some(texture);
        self
    }

    #[inline]
    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = Some(blend);
        self
    }
}

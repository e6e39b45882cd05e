use crate::coords::Mat4;
use crate::geometry::Vertex;
use crate::paint::{BlendMode, Color};

use super::GpuError;

/// Raw backend resource identity.
///
/// Used for batch-key equality and binding. Never reused by a backend while
/// the process runs, so a stale id can only fail lookup, never alias.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ResourceId(pub u32);

/// Sampling filter for a texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum TextureFilter {
    #[default]
    Linear,
    Nearest,
}

/// Ids of an offscreen render target and its sampleable color texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FramebufferIds {
    pub framebuffer: ResourceId,
    pub color: ResourceId,
}

/// The GPU capability set the renderer relies on.
///
/// Draw-state calls (`bind_*`, `set_blend`, `draw_indexed`) are only valid
/// between an `upload` and the matching `finish`; the batch renderer is the
/// sole caller in that window. Unknown ids passed to bind calls fall back to
/// the defaults with a warning.
pub trait GpuBackend {
    // ── resources ─────────────────────────────────────────────────────────

    /// Creates an RGBA8 texture from `width * height * 4` bytes.
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
        filter: TextureFilter,
    ) -> Result<ResourceId, GpuError>;

    /// Replaces the full contents of an existing texture.
    fn update_texture(&mut self, texture: ResourceId, rgba: &[u8]) -> Result<(), GpuError>;

    fn release_texture(&mut self, texture: ResourceId);

    /// Compiles a shader program exposing `vs_main` and `fs_main`.
    fn create_shader(&mut self, source: &str) -> Result<ResourceId, GpuError>;

    fn release_shader(&mut self, shader: ResourceId);

    /// Creates an offscreen render target with a sampleable color texture.
    fn create_framebuffer(&mut self, width: u32, height: u32) -> Result<FramebufferIds, GpuError>;

    /// Releases the framebuffer and its color texture.
    fn release_framebuffer(&mut self, framebuffer: ResourceId);

    // ── defaults ──────────────────────────────────────────────────────────

    /// Shader used when a submission names none.
    fn default_shader(&self) -> ResourceId;

    /// 1x1 opaque white texture used when a submission names none.
    fn white_texture(&self) -> ResourceId;

    // ── frame state ───────────────────────────────────────────────────────

    /// Directs subsequent draws to `framebuffer`, or to the main canvas for `None`.
    fn bind_target(&mut self, framebuffer: Option<ResourceId>);

    /// Clears the current target before its next draw.
    fn clear(&mut self, color: Color);

    fn set_view_projection(&mut self, view_projection: &Mat4);

    // ── flush ─────────────────────────────────────────────────────────────

    /// Uploads the shared vertex/index buffers for the draws that follow.
    fn upload(&mut self, vertices: &[Vertex], indices: &[u32]);

    fn bind_shader(&mut self, shader: ResourceId);

    fn bind_texture(&mut self, texture: ResourceId);

    fn set_blend(&mut self, blend: BlendMode);

    /// Draws `index_count` indices starting at `index_start` of the uploaded buffer.
    fn draw_indexed(&mut self, index_start: u32, index_count: u32);

    /// Commits everything recorded since `upload` (or any pending clear).
    fn finish(&mut self);
}

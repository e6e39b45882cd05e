use std::collections::{HashMap, HashSet};

use crate::coords::Mat4;
use crate::geometry::Vertex;
use crate::paint::{BlendMode, Color};

use super::{FramebufferIds, GpuBackend, GpuError, ResourceId, TextureFilter};

/// One call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCall {
    CreateTexture { id: ResourceId, width: u32, height: u32 },
    UpdateTexture(ResourceId),
    ReleaseTexture(ResourceId),
    CreateShader(ResourceId),
    ReleaseShader(ResourceId),
    CreateFramebuffer { ids: FramebufferIds, width: u32, height: u32 },
    ReleaseFramebuffer(ResourceId),
    BindTarget(Option<ResourceId>),
    Clear(Color),
    SetViewProjection(Mat4),
    Upload { vertices: usize, indices: usize },
    BindShader(ResourceId),
    BindTexture(ResourceId),
    SetBlend(BlendMode),
    DrawIndexed { index_start: u32, index_count: u32 },
    Finish,
}

/// Buffer contents captured at an `upload`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Upload {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Headless backend that records every call instead of touching a GPU.
///
/// Resource creation applies the same validation as the real backend (sizes,
/// data length, shader entry points) so failure paths behave identically.
#[derive(Debug)]
pub struct RecordingBackend {
    calls: Vec<GpuCall>,
    uploads: Vec<Upload>,
    next_id: u32,
    default_shader: ResourceId,
    white_texture: ResourceId,
    textures: HashMap<ResourceId, (u32, u32)>,
    shaders: HashSet<ResourceId>,
    framebuffers: HashMap<ResourceId, ResourceId>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    pub fn new() -> Self {
        let default_shader = ResourceId(1);
        let white_texture = ResourceId(2);
        Self {
            calls: Vec::new(),
            uploads: Vec::new(),
            next_id: 3,
            default_shader,
            white_texture,
            textures: HashMap::from([(white_texture, (1, 1))]),
            shaders: HashSet::from([default_shader]),
            framebuffers: HashMap::new(),
        }
    }

    /// Every call in issue order.
    pub fn calls(&self) -> &[GpuCall] {
        &self.calls
    }

    /// Buffer contents of every `upload`, in order.
    pub fn uploads(&self) -> &[Upload] {
        &self.uploads
    }

    /// Forgets recorded calls and uploads; live resources are kept.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
        self.uploads.clear();
    }

    pub fn draw_calls(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::DrawIndexed { .. }))
    }

    pub fn blend_changes(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::SetBlend(_)))
    }

    pub fn shader_binds(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::BindShader(_)))
    }

    pub fn texture_binds(&self) -> usize {
        self.count(|c| matches!(c, GpuCall::BindTexture(_)))
    }

    /// Number of live textures, framebuffer color attachments and the white texture included.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }

    fn count(&self, pred: impl Fn(&GpuCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    fn alloc_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl GpuBackend for RecordingBackend {
    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
        _filter: TextureFilter,
    ) -> Result<ResourceId, GpuError> {
        if width == 0 || height == 0 {
            return Err(GpuError::InvalidTextureSize { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(GpuError::TextureDataSize { expected, actual: rgba.len() });
        }
        let id = self.alloc_id();
        self.textures.insert(id, (width, height));
        self.calls.push(GpuCall::CreateTexture { id, width, height });
        Ok(id)
    }

    fn update_texture(&mut self, texture: ResourceId, rgba: &[u8]) -> Result<(), GpuError> {
        let &(w, h) = self
            .textures
            .get(&texture)
            .ok_or(GpuError::UnknownResource(texture))?;
        let expected = w as usize * h as usize * 4;
        if rgba.len() != expected {
            return Err(GpuError::TextureDataSize { expected, actual: rgba.len() });
        }
        self.calls.push(GpuCall::UpdateTexture(texture));
        Ok(())
    }

    fn release_texture(&mut self, texture: ResourceId) {
        if texture != self.white_texture && self.textures.remove(&texture).is_some() {
            self.calls.push(GpuCall::ReleaseTexture(texture));
        }
    }

    fn create_shader(&mut self, source: &str) -> Result<ResourceId, GpuError> {
        for entry in ["fn vs_main", "fn fs_main"] {
            if !source.contains(entry) {
                return Err(GpuError::ShaderCompile(format!("missing entry point `{entry}`")));
            }
        }
        let id = self.alloc_id();
        self.shaders.insert(id);
        self.calls.push(GpuCall::CreateShader(id));
        Ok(id)
    }

    fn release_shader(&mut self, shader: ResourceId) {
        if shader != self.default_shader && self.shaders.remove(&shader) {
            self.calls.push(GpuCall::ReleaseShader(shader));
        }
    }

    fn create_framebuffer(&mut self, width: u32, height: u32) -> Result<FramebufferIds, GpuError> {
        if width == 0 || height == 0 {
            return Err(GpuError::IncompleteFramebuffer { width, height });
        }
        let ids = FramebufferIds {
            framebuffer: self.alloc_id(),
            color: self.alloc_id(),
        };
        self.textures.insert(ids.color, (width, height));
        self.framebuffers.insert(ids.framebuffer, ids.color);
        self.calls.push(GpuCall::CreateFramebuffer { ids, width, height });
        Ok(ids)
    }

    fn release_framebuffer(&mut self, framebuffer: ResourceId) {
        if let Some(color) = self.framebuffers.remove(&framebuffer) {
            self.textures.remove(&color);
            self.calls.push(GpuCall::ReleaseFramebuffer(framebuffer));
        }
    }

    fn default_shader(&self) -> ResourceId {
        self.default_shader
    }

    fn white_texture(&self) -> ResourceId {
        self.white_texture
    }

    fn bind_target(&mut self, framebuffer: Option<ResourceId>) {
        self.calls.push(GpuCall::BindTarget(framebuffer));
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(GpuCall::Clear(color));
    }

    fn set_view_projection(&mut self, view_projection: &Mat4) {
        self.calls.push(GpuCall::SetViewProjection(*view_projection));
    }

    fn upload(&mut self, vertices: &[Vertex], indices: &[u32]) {
        self.calls.push(GpuCall::Upload {
            vertices: vertices.len(),
            indices: indices.len(),
        });
        self.uploads.push(Upload {
            vertices: vertices.to_vec(),
            indices: indices.to_vec(),
        });
    }

    fn bind_shader(&mut self, shader: ResourceId) {
        self.calls.push(GpuCall::BindShader(shader));
    }

    fn bind_texture(&mut self, texture: ResourceId) {
        self.calls.push(GpuCall::BindTexture(texture));
    }

    fn set_blend(&mut self, blend: BlendMode) {
        self.calls.push(GpuCall::SetBlend(blend));
    }

    fn draw_indexed(&mut self, index_start: u32, index_count: u32) {
        self.calls.push(GpuCall::DrawIndexed { index_start, index_count });
    }

    fn finish(&mut self) {
        self.calls.push(GpuCall::Finish);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_validation() {
        let mut b = RecordingBackend::new();
        assert_eq!(
            b.create_texture(0, 4, &[], TextureFilter::Linear),
            Err(GpuError::InvalidTextureSize { width: 0, height: 4 })
        );
        assert_eq!(
            b.create_texture(2, 2, &[0; 15], TextureFilter::Linear),
            Err(GpuError::TextureDataSize { expected: 16, actual: 15 })
        );
        let id = b.create_texture(2, 2, &[0; 16], TextureFilter::Nearest).unwrap();
        assert_eq!(b.live_textures(), 2);
        b.release_texture(id);
        assert_eq!(b.live_textures(), 1);
    }

    #[test]
    fn defaults_cannot_be_released() {
        let mut b = RecordingBackend::new();
        let (s, t) = (b.default_shader(), b.white_texture());
        b.release_shader(s);
        b.release_texture(t);
        assert_eq!(b.live_shaders(), 1);
        assert_eq!(b.live_textures(), 1);
        assert!(b.calls().is_empty());
    }

    #[test]
    fn shader_without_entry_points_fails() {
        let mut b = RecordingBackend::new();
        assert!(matches!(b.create_shader("fn vs_main() {}"), Err(GpuError::ShaderCompile(_))));
        assert!(b.create_shader("fn vs_main() {} fn fs_main() {}").is_ok());
    }

    #[test]
    fn framebuffer_release_frees_color_texture() {
        let mut b = RecordingBackend::new();
        let ids = b.create_framebuffer(8, 8).unwrap();
        assert_ne!(ids.framebuffer, ids.color);
        assert_eq!(b.live_textures(), 2);
        b.release_framebuffer(ids.framebuffer);
        assert_eq!(b.live_textures(), 1);
        assert_eq!(b.live_framebuffers(), 0);
    }
}

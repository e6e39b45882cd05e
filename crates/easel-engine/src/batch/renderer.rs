use crate::coords::Mat4;
use crate::geometry::Vertex;
use crate::gpu::{GpuBackend, ResourceId};
use crate::paint::BlendMode;

use super::{Batch, BatchKey, DrawState, RenderStats};

/// Hard ceilings of the shared buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct BatchLimits {
    pub max_vertices: usize,
    pub max_indices: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_vertices: 10_000,
            max_indices: 30_000,
        }
    }
}

/// Per-frame geometry arena plus the batch list describing how to draw it.
///
/// Frame protocol: `begin_frame → submit* → end_frame`. `flush` may also run
/// in the middle of a frame (capacity, target switch); afterwards the
/// buffers are empty and reused.
///
/// The renderer never owns the backend; every GPU-touching call borrows it.
#[derive(Debug)]
pub struct BatchRenderer {
    limits: BatchLimits,
    default_shader: ResourceId,
    white_texture: ResourceId,

    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    batches: Vec<Batch>,

    frame_stats: RenderStats,
}

impl BatchRenderer {
    /// Creates a renderer whose defaults come from `backend`.
    pub fn new(limits: BatchLimits, backend: &impl GpuBackend) -> Self {
        Self {
            limits,
            default_shader: backend.default_shader(),
            white_texture: backend.white_texture(),
            vertices: Vec::with_capacity(limits.max_vertices),
            indices: Vec::with_capacity(limits.max_indices),
            batches: Vec::new(),
            frame_stats: RenderStats::default(),
        }
    }

    #[inline]
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Work issued since the last `begin_frame`.
    #[inline]
    pub fn frame_stats(&self) -> RenderStats {
        self.frame_stats
    }

    /// Fills unspecified fields of `state` with the renderer defaults.
    pub fn resolve_key(&self, state: DrawState) -> BatchKey {
        BatchKey {
            shader: state.shader.unwrap_or(self.default_shader),
            texture: state.texture.unwrap_or(self.white_texture),
            blend: state.blend.unwrap_or(BlendMode::Alpha),
        }
    }

    /// Starts a frame: resets frame statistics and sets the projection.
    ///
    /// Geometry left over from an unterminated frame is flushed first.
    pub fn begin_frame(&mut self, backend: &mut impl GpuBackend, view_projection: &Mat4) {
        if !self.batches.is_empty() {
            log::warn!("begin_frame with pending geometry; flushing previous frame");
            self.flush(backend);
        }
        self.frame_stats = RenderStats::default();
        backend.set_view_projection(view_projection);
    }

    /// Appends geometry drawn with `state`.
    ///
    /// `indices` are local to `vertices`. If the shared buffers cannot take
    /// the geometry, pending batches are flushed first. Returns `false` (and
    /// logs) when the geometry is rejected: it is larger than the buffers
    /// themselves, or an index points outside `vertices`.
    pub fn submit(
        &mut self,
        backend: &mut impl GpuBackend,
        vertices: &[Vertex],
        indices: &[u32],
        state: DrawState,
    ) -> bool {
        if vertices.is_empty() || indices.is_empty() {
            return true;
        }
        if vertices.len() > self.limits.max_vertices || indices.len() > self.limits.max_indices {
            log::warn!(
                "submission of {} vertices / {} indices exceeds batch capacity ({} / {}); dropped",
                vertices.len(),
                indices.len(),
                self.limits.max_vertices,
                self.limits.max_indices
            );
            return false;
        }
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            log::warn!(
                "submission index {bad} out of range for {} vertices; dropped",
                vertices.len()
            );
            return false;
        }

        if self.vertices.len() + vertices.len() >= self.limits.max_vertices
            || self.indices.len() + indices.len() >= self.limits.max_indices
        {
            self.flush(backend);
        }

        let key = self.resolve_key(state);
        let base = self.vertices.len() as u32;
        let index_start = self.indices.len() as u32;

        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|i| i + base));

        let index_count = indices.len() as u32;
        match self.batches.last_mut() {
            Some(last) if last.key == key && last.index_end() == index_start => {
                last.index_count += index_count;
            }
            _ => self.batches.push(Batch {
                key,
                index_start,
                index_count,
            }),
        }
        true
    }

    /// Draws every pending batch in order and empties the buffers.
    ///
    /// Shader, texture and blend are only rebound when they differ from the
    /// previous batch; the first batch binds all three.
    pub fn flush(&mut self, backend: &mut impl GpuBackend) -> RenderStats {
        let mut stats = RenderStats::default();
        if self.batches.is_empty() {
            self.reset_buffers();
            return stats;
        }

        backend.upload(&self.vertices, &self.indices);

        let mut shader: Option<ResourceId> = None;
        let mut texture: Option<ResourceId> = None;
        let mut blend: Option<BlendMode> = None;

        for batch in &self.batches {
            let key = batch.key;
            if shader != Some(key.shader) {
                backend.bind_shader(key.shader);
                shader = Some(key.shader);
                stats.shader_changes += 1;
            }
            if texture != Some(key.texture) {
                backend.bind_texture(key.texture);
                texture = Some(key.texture);
                stats.texture_changes += 1;
            }
            if blend != Some(key.blend) {
                backend.set_blend(key.blend);
                blend = Some(key.blend);
                stats.blend_changes += 1;
            }
            backend.draw_indexed(batch.index_start, batch.index_count);
            stats.draw_calls += 1;
        }

        backend.finish();

        stats.flushes = 1;
        stats.batches = self.batches.len() as u32;
        stats.vertices = self.vertices.len() as u32;
        stats.indices = self.indices.len() as u32;
        self.frame_stats.accumulate(&stats);

        log::trace!(
            "flush: {} batches, {} vertices, {} indices",
            stats.batches,
            stats.vertices,
            stats.indices
        );

        self.reset_buffers();
        stats
    }

    /// Flushes the remainder and returns the frame's statistics.
    pub fn end_frame(&mut self, backend: &mut impl GpuBackend) -> RenderStats {
        self.flush(backend);
        self.frame_stats
    }

    fn reset_buffers(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.batches.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{fill_rect, Mesh};
    use crate::gpu::{GpuCall, RecordingBackend};
    use crate::paint::Color;

    fn quad(color: Color) -> Mesh {
        Mesh::from_contour(&fill_rect(0.0, 0.0, 10.0, 10.0), &Mat4::IDENTITY, color)
    }

    fn setup() -> (RecordingBackend, BatchRenderer) {
        let backend = RecordingBackend::new();
        let renderer = BatchRenderer::new(BatchLimits::default(), &backend);
        (backend, renderer)
    }

    // ── submit / merge ────────────────────────────────────────────────────

    #[test]
    fn same_key_contiguous_merges() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        assert!(r.submit(&mut b, &m.vertices, &m.indices, DrawState::default()));
        assert_eq!(r.batches().len(), 1);
        assert!(r.submit(&mut b, &m.vertices, &m.indices, DrawState::default()));
        assert_eq!(r.batches().len(), 1);
        assert_eq!(r.batches()[0].index_count, 12);
    }

    #[test]
    fn different_blend_starts_new_batch() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        let before = r.batches().len();
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default().with_blend(BlendMode::Additive));
        assert_eq!(r.batches().len(), before + 1);
    }

    #[test]
    fn explicit_defaults_equal_unspecified() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        let explicit = DrawState::default()
            .with_shader(b.default_shader())
            .with_texture(b.white_texture())
            .with_blend(BlendMode::Alpha);
        r.submit(&mut b, &m.vertices, &m.indices, explicit);
        assert_eq!(r.batches().len(), 1);
    }

    #[test]
    fn indices_are_rebased() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        assert_eq!(&r.indices()[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(r.vertices().len(), 8);
    }

    #[test]
    fn interleaved_keys_are_not_reordered() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        let add = DrawState::default().with_blend(BlendMode::Additive);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.submit(&mut b, &m.vertices, &m.indices, add);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        let blends: Vec<BlendMode> = r.batches().iter().map(|b| b.key.blend).collect();
        assert_eq!(blends, vec![BlendMode::Alpha, BlendMode::Additive, BlendMode::Alpha]);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        assert!(!r.submit(&mut b, &m.vertices, &[0, 1, 9], DrawState::default()));
        assert!(r.batches().is_empty());
    }

    #[test]
    fn empty_submission_is_accepted_noop() {
        let (mut b, mut r) = setup();
        assert!(r.submit(&mut b, &[], &[], DrawState::default()));
        assert!(r.batches().is_empty());
    }

    // ── capacity ──────────────────────────────────────────────────────────

    #[test]
    fn reaching_vertex_capacity_flushes_first() {
        let (mut b, _) = setup();
        let limits = BatchLimits { max_vertices: 10, max_indices: 100 };
        let mut r = BatchRenderer::new(limits, &b);
        let m = quad(Color::WHITE);

        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        assert_eq!(r.vertices().len(), 8);
        assert_eq!(b.draw_calls(), 0);

        // 8 + 4 would cross the ceiling.
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        assert_eq!(r.vertices().len(), m.vertices.len());
        assert_eq!(r.indices(), &m.indices[..]);
        assert_eq!(b.draw_calls(), 1);
        assert_eq!(b.uploads()[0].vertices.len(), 8);
    }

    #[test]
    fn reaching_index_capacity_flushes_first() {
        let (mut b, _) = setup();
        let limits = BatchLimits { max_vertices: 1000, max_indices: 12 };
        let mut r = BatchRenderer::new(limits, &b);
        let m = quad(Color::WHITE);

        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        assert_eq!(r.indices().len(), 6);
        assert_eq!(b.draw_calls(), 1);
    }

    #[test]
    fn oversized_submission_is_dropped() {
        let (mut b, _) = setup();
        let limits = BatchLimits { max_vertices: 3, max_indices: 100 };
        let mut r = BatchRenderer::new(limits, &b);
        let m = quad(Color::WHITE);
        assert!(!r.submit(&mut b, &m.vertices, &m.indices, DrawState::default()));
        assert!(r.vertices().is_empty());
    }

    // ── flush ─────────────────────────────────────────────────────────────

    #[test]
    fn flush_clears_buffers() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        let stats = r.flush(&mut b);
        assert_eq!(stats.draw_calls, 1);
        assert!(r.vertices().is_empty() && r.indices().is_empty() && r.batches().is_empty());
    }

    #[test]
    fn empty_flush_issues_nothing() {
        let (mut b, mut r) = setup();
        let stats = r.flush(&mut b);
        assert_eq!(stats, RenderStats::default());
        assert!(b.calls().is_empty());
    }

    #[test]
    fn first_batch_binds_everything_then_only_changes() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        let tex = ResourceId(77);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default().with_texture(tex));
        let stats = r.flush(&mut b);

        assert_eq!(stats.batches, 2);
        assert_eq!(stats.shader_changes, 1);
        assert_eq!(stats.texture_changes, 2);
        assert_eq!(stats.blend_changes, 1);
        assert_eq!(
            b.calls(),
            &[
                GpuCall::Upload { vertices: 8, indices: 12 },
                GpuCall::BindShader(b.default_shader()),
                GpuCall::BindTexture(b.white_texture()),
                GpuCall::SetBlend(BlendMode::Alpha),
                GpuCall::DrawIndexed { index_start: 0, index_count: 6 },
                GpuCall::BindTexture(tex),
                GpuCall::DrawIndexed { index_start: 6, index_count: 6 },
                GpuCall::Finish,
            ]
        );
    }

    #[test]
    fn frame_stats_accumulate_across_flushes() {
        let (mut b, mut r) = setup();
        let m = quad(Color::WHITE);
        r.begin_frame(&mut b, &Mat4::IDENTITY);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        r.flush(&mut b);
        r.submit(&mut b, &m.vertices, &m.indices, DrawState::default());
        let frame = r.end_frame(&mut b);
        assert_eq!(frame.flushes, 2);
        assert_eq!(frame.draw_calls, 2);

        r.begin_frame(&mut b, &Mat4::IDENTITY);
        assert_eq!(r.frame_stats(), RenderStats::default());
    }

    // ── end-to-end ────────────────────────────────────────────────────────

    #[test]
    fn opaque_red_then_alpha_blue() {
        let (mut b, mut r) = setup();
        let red = quad(Color::rgb(255, 0, 0));
        let blue = quad(Color::rgba(0, 0, 255, 128));

        r.begin_frame(&mut b, &Mat4::IDENTITY);
        r.submit(&mut b, &red.vertices, &red.indices, DrawState::default().with_blend(BlendMode::Opaque));
        r.submit(&mut b, &blue.vertices, &blue.indices, DrawState::default());
        assert_eq!(r.batches().len(), 2);
        r.end_frame(&mut b);

        // Draw order: red vertices precede blue ones in the uploaded buffer.
        let upload = &b.uploads()[0];
        assert_eq!(upload.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(upload.vertices[4].color[2], 1.0);

        assert_eq!(b.draw_calls(), 2);
        let draws: Vec<usize> = b
            .calls()
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, GpuCall::DrawIndexed { .. }))
            .map(|(i, _)| i)
            .collect();
        let between = &b.calls()[draws[0] + 1..draws[1]];
        assert_eq!(between, &[GpuCall::SetBlend(BlendMode::Alpha)]);
        assert_eq!(
            b.calls()[draws[0]],
            GpuCall::DrawIndexed { index_start: 0, index_count: 6 }
        );
    }
}

/// Counters describing GPU work issued by flushes.
///
/// Returned per flush by [`BatchRenderer::flush`](super::BatchRenderer::flush)
/// and accumulated per frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct RenderStats {
    pub flushes: u32,
    pub batches: u32,
    pub draw_calls: u32,
    pub shader_changes: u32,
    pub texture_changes: u32,
    pub blend_changes: u32,
    pub vertices: u32,
    pub indices: u32,
}

impl RenderStats {
    pub(super) fn accumulate(&mut self, other: &RenderStats) {
        self.flushes += other.flushes;
        self.batches += other.batches;
        self.draw_calls += other.draw_calls;
        self.shader_changes += other.shader_changes;
        self.texture_changes += other.texture_changes;
        self.blend_changes += other.blend_changes;
        self.vertices += other.vertices;
        self.indices += other.indices;
    }
}

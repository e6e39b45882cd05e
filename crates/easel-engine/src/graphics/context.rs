use std::path::Path;

use crate::assets::{
    AssetError, Assets, ImageId, ImageSource, RenderbufferId, ShaderId, TextureId,
};
use crate::batch::{Batch, BatchLimits, BatchRenderer, DrawState, RenderStats};
use crate::coords::{Mat4, Rect, Vec2};
use crate::geometry::{
    ellipse_points, fill_ellipse, fill_quad, fill_rect, fill_triangle, stroke_line, stroke_path,
    stroke_point, Contour, Mesh, MIN_ELLIPSE_SEGMENTS,
};
use crate::gpu::{GpuBackend, ResourceId, TextureFilter};
use crate::paint::{BlendMode, Color};
use crate::state::{MatrixStack, StyleStack};
use crate::style::{
    AngleMode, EllipseMode, ImageMode, RectMode, RenderStyle, ShapeKind, StrokeCap, StrokeJoin,
};

use super::shape::{tessellate_shape, ShapeEnd, ShapeStroke};

/// Ellipse segment count until `ellipse_detail` changes it.
pub const DEFAULT_ELLIPSE_SEGMENTS: u32 = 32;

/// Vertices recorded between `begin_shape` and `end_shape`.
#[derive(Debug)]
struct ShapeRecording {
    kind: ShapeKind,
    points: Vec<Vec2>,
}

/// Which stacks a `push` actually grew.
#[derive(Debug, Copy, Clone)]
struct PushedScope {
    matrix: bool,
    style: bool,
}

/// Immediate-mode drawing surface.
///
/// Owns everything a frame touches: the backend, the batch renderer, both
/// state stacks and the asset managers. Primitive calls read the active style
/// and matrix at call time, tessellate, and submit to the batch renderer.
/// Failures inside primitive calls are logged; nothing here panics or
/// returns an error mid-drawing.
pub struct DrawContext<B: GpuBackend> {
    backend: B,
    renderer: BatchRenderer,
    matrices: MatrixStack,
    styles: StyleStack,
    assets: Assets,

    width: u32,
    height: u32,
    ellipse_segments: u32,

    /// Active offscreen target; `None` draws to the canvas.
    target: Option<RenderbufferId>,
    shape: Option<ShapeRecording>,
    scopes: Vec<PushedScope>,
    last_stats: RenderStats,
    warned_join: bool,
}

impl<B: GpuBackend> DrawContext<B> {
    /// Creates a context drawing onto a `width` x `height` canvas.
    pub fn new(backend: B, width: u32, height: u32, limits: BatchLimits) -> Self {
        let renderer = BatchRenderer::new(limits, &backend);
        Self {
            backend,
            renderer,
            matrices: MatrixStack::new(),
            styles: StyleStack::new(),
            assets: Assets::new(),
            width,
            height,
            ellipse_segments: DEFAULT_ELLIPSE_SEGMENTS,
            target: None,
            shape: None,
            scopes: Vec::new(),
            last_stats: RenderStats::default(),
            warned_join: false,
        }
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn assets(&self) -> &Assets {
        &self.assets
    }

    /// Active model matrix.
    pub fn matrix(&self) -> &Mat4 {
        self.matrices.peek()
    }

    /// Active style.
    pub fn style(&self) -> &RenderStyle {
        self.styles.peek()
    }

    pub fn matrix_depth(&self) -> usize {
        self.matrices.depth()
    }

    pub fn style_depth(&self) -> usize {
        self.styles.depth()
    }

    /// Batches waiting for the next flush.
    pub fn pending_batches(&self) -> &[Batch] {
        self.renderer.batches()
    }

    /// Statistics of the last completed frame.
    pub fn last_frame_stats(&self) -> RenderStats {
        self.last_stats
    }

    pub fn current_renderbuffer(&self) -> Option<RenderbufferId> {
        self.target
    }

    // ── frame ─────────────────────────────────────────────────────────────

    /// Starts a frame: model matrix back to identity, canvas as target.
    ///
    /// Style persists across frames; style slots left pushed by the previous
    /// frame are dropped with a warning.
    pub fn begin_draw(&mut self) {
        self.matrices.clear();
        if self.styles.depth() > 0 {
            log::warn!("{} unbalanced push_style at frame start; dropped", self.styles.depth());
            self.styles.unwind();
        }
        self.scopes.clear();
        if self.target.take().is_some() {
            self.backend.bind_target(None);
        }
        let projection = self.canvas_projection();
        self.renderer.begin_frame(&mut self.backend, &projection);
    }

    /// Ends a frame and flushes everything still pending.
    pub fn end_draw(&mut self) -> RenderStats {
        if let Some(shape) = self.shape.take() {
            log::warn!("begin_shape({:?}) without end_shape; discarded", shape.kind);
        }
        self.no_renderbuffer();
        self.last_stats = self.renderer.end_frame(&mut self.backend);
        self.last_stats
    }

    /// Draws pending batches now.
    pub fn flush(&mut self) -> RenderStats {
        self.renderer.flush(&mut self.backend)
    }

    fn canvas_projection(&self) -> Mat4 {
        Mat4::screen_projection(self.width as f32, self.height as f32)
    }

    // ── assets ────────────────────────────────────────────────────────────

    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<ImageId, AssetError> {
        self.assets.images.load(&mut self.backend, path)
    }

    /// Creates an image from `width * height * 4` RGBA bytes.
    pub fn create_image(&mut self, width: u32, height: u32, pixels: Vec<u8>) -> Result<ImageId, AssetError> {
        self.assets.images.create(&mut self.backend, width, height, pixels)
    }

    /// CPU pixels of an image; call [`update_pixels`](Self::update_pixels) after editing.
    pub fn image_pixels_mut(&mut self, id: ImageId) -> Result<&mut [u8], AssetError> {
        self.assets.images.pixels_mut(id)
    }

    pub fn update_pixels(&mut self, id: ImageId) -> Result<(), AssetError> {
        // Pending draws must still see the old pixels.
        self.renderer.flush(&mut self.backend);
        self.assets.images.update_pixels(&mut self.backend, id)
    }

    pub fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
        filter: TextureFilter,
    ) -> Result<TextureId, AssetError> {
        self.assets.textures.create(&mut self.backend, width, height, rgba, filter)
    }

    pub fn update_texture(&mut self, id: TextureId, rgba: &[u8]) -> Result<(), AssetError> {
        self.renderer.flush(&mut self.backend);
        self.assets.textures.update(&mut self.backend, id, rgba)
    }

    pub fn load_shader(&mut self, path: impl AsRef<Path>) -> Result<ShaderId, AssetError> {
        self.assets.shaders.load(&mut self.backend, path)
    }

    /// Compiles WGSL source exposing `vs_main` and `fs_main`.
    pub fn create_shader(&mut self, source: &str) -> Result<ShaderId, AssetError> {
        self.assets.shaders.create(&mut self.backend, source)
    }

    pub fn create_renderbuffer(&mut self, width: u32, height: u32) -> Result<RenderbufferId, AssetError> {
        self.assets.renderbuffers.create(&mut self.backend, width, height)
    }

    pub fn destroy_image(&mut self, id: ImageId) -> Result<(), AssetError> {
        self.renderer.flush(&mut self.backend);
        self.assets.images.destroy(&mut self.backend, id)
    }

    pub fn destroy_texture(&mut self, id: TextureId) -> Result<(), AssetError> {
        self.renderer.flush(&mut self.backend);
        self.assets.textures.destroy(&mut self.backend, id)
    }

    /// Styles still naming the shader fall back to the default on next use.
    pub fn destroy_shader(&mut self, id: ShaderId) -> Result<(), AssetError> {
        self.renderer.flush(&mut self.backend);
        self.assets.shaders.destroy(&mut self.backend, id)
    }

    /// Drawing into the renderbuffer being destroyed moves back to the canvas.
    pub fn destroy_renderbuffer(&mut self, id: RenderbufferId) -> Result<(), AssetError> {
        if self.target == Some(id) {
            self.no_renderbuffer();
        }
        self.renderer.flush(&mut self.backend);
        self.assets.renderbuffers.destroy(&mut self.backend, id)
    }

    /// Draws what is pending, then releases every asset.
    pub fn release_all(&mut self) {
        self.no_renderbuffer();
        self.renderer.flush(&mut self.backend);
        self.assets.release_all(&mut self.backend);
    }

    // ── style ─────────────────────────────────────────────────────────────

    pub fn fill(&mut self, color: impl Into<Color>) {
        let s = self.styles.peek_mut();
        s.fill = color.into();
        s.fill_enabled = true;
    }

    pub fn no_fill(&mut self) {
        self.styles.peek_mut().fill_enabled = false;
    }

    pub fn stroke(&mut self, color: impl Into<Color>) {
        let s = self.styles.peek_mut();
        s.stroke = color.into();
        s.stroke_enabled = true;
    }

    pub fn no_stroke(&mut self) {
        self.styles.peek_mut().stroke_enabled = false;
    }

    /// Negative and non-finite weights are treated as zero (no stroke).
    pub fn stroke_weight(&mut self, weight: f32) {
        self.styles.peek_mut().stroke_weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
    }

    pub fn stroke_cap(&mut self, cap: StrokeCap) {
        self.styles.peek_mut().stroke_cap = cap;
    }

    /// Stored in the style; joins are not implemented, segments stay unjoined.
    pub fn stroke_join(&mut self, join: StrokeJoin) {
        if join != StrokeJoin::default() && !self.warned_join {
            log::warn!("stroke_join({join:?}) not implemented; stroke segments are drawn unjoined");
            self.warned_join = true;
        }
        self.styles.peek_mut().stroke_join = join;
    }

    /// Color multiplied into images.
    pub fn tint(&mut self, color: impl Into<Color>) {
        self.styles.peek_mut().tint = color.into();
    }

    pub fn no_tint(&mut self) {
        self.styles.peek_mut().tint = Color::WHITE;
    }

    pub fn blend_mode(&mut self, mode: BlendMode) {
        self.styles.peek_mut().blend_mode = mode;
    }

    pub fn rect_mode(&mut self, mode: RectMode) {
        self.styles.peek_mut().rect_mode = mode;
    }

    pub fn ellipse_mode(&mut self, mode: EllipseMode) {
        self.styles.peek_mut().ellipse_mode = mode;
    }

    pub fn image_mode(&mut self, mode: ImageMode) {
        self.styles.peek_mut().image_mode = mode;
    }

    pub fn angle_mode(&mut self, mode: AngleMode) {
        self.styles.peek_mut().angle_mode = mode;
    }

    /// Draws subsequent primitives with a custom shader.
    pub fn shader(&mut self, id: ShaderId) {
        if let Err(e) = self.assets.shaders.get(id) {
            log::warn!("shader: {e}; keeping the current shader");
            return;
        }
        self.styles.peek_mut().shader = Some(id);
    }

    pub fn reset_shader(&mut self) {
        self.styles.peek_mut().shader = None;
    }

    /// Segment count of ellipses, circles and round points.
    ///
    /// Clamped to at least 3 and to the largest fan one batch can hold.
    pub fn ellipse_detail(&mut self, segments: u32) {
        let limits = self.renderer.limits();
        let max = (limits.max_vertices.saturating_sub(1))
            .min(limits.max_indices / 3)
            .max(MIN_ELLIPSE_SEGMENTS as usize);
        let max = u32::try_from(max).unwrap_or(u32::MAX);
        if segments > max {
            log::warn!("ellipse_detail({segments}) exceeds batch capacity; using {max}");
        }
        self.ellipse_segments = segments.clamp(MIN_ELLIPSE_SEGMENTS, max);
    }

    // ── transform ─────────────────────────────────────────────────────────

    pub fn translate(&mut self, x: f32, y: f32) {
        self.matrices.translate(x, y);
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.matrices.scale(x, y);
    }

    /// Rotates by `angle` in the active [`AngleMode`].
    pub fn rotate(&mut self, angle: f32) {
        let radians = self.styles.peek().angle_mode.to_radians(angle);
        self.matrices.rotate(radians);
    }

    /// Post-multiplies an arbitrary matrix.
    pub fn apply_matrix(&mut self, m: Mat4) {
        self.matrices.apply(m);
    }

    pub fn push_matrix(&mut self) {
        self.matrices.push(true);
    }

    pub fn pop_matrix(&mut self) {
        self.matrices.pop();
    }

    pub fn reset_matrix(&mut self) {
        self.matrices.reset();
    }

    pub fn push_style(&mut self) {
        self.styles.push(true);
    }

    pub fn pop_style(&mut self) {
        self.styles.pop();
    }

    /// `push_matrix` + `push_style`.
    ///
    /// Remembers which of the two pushes succeeded so the matching `pop`
    /// leaves outer scopes alone when one stack is full.
    pub fn push(&mut self) {
        let matrix = self.matrices.push(true);
        let style = self.styles.push(true);
        self.scopes.push(PushedScope { matrix, style });
    }

    /// Undoes the latest `push`. Without one, pops both stacks.
    pub fn pop(&mut self) {
        let scope = self.scopes.pop().unwrap_or(PushedScope { matrix: true, style: true });
        if scope.style {
            self.pop_style();
        }
        if scope.matrix {
            self.pop_matrix();
        }
    }

    // ── targets ───────────────────────────────────────────────────────────

    /// Redirects drawing into a renderbuffer until `no_renderbuffer`.
    pub fn renderbuffer(&mut self, id: RenderbufferId) {
        let rb = match self.assets.renderbuffers.get(id) {
            Ok(rb) => *rb,
            Err(e) => {
                log::warn!("renderbuffer: {e}; target unchanged");
                return;
            }
        };
        if self.target == Some(id) {
            return;
        }
        self.renderer.flush(&mut self.backend);
        self.backend.bind_target(Some(rb.framebuffer()));
        self.backend
            .set_view_projection(&Mat4::screen_projection(rb.width as f32, rb.height as f32));
        self.target = Some(id);
    }

    /// Returns drawing to the canvas.
    pub fn no_renderbuffer(&mut self) {
        if self.target.is_none() {
            return;
        }
        self.renderer.flush(&mut self.backend);
        self.target = None;
        self.backend.bind_target(None);
        let projection = self.canvas_projection();
        self.backend.set_view_projection(&projection);
    }

    /// Clears the active target. Geometry submitted earlier is drawn first,
    /// then covered.
    pub fn background(&mut self, color: impl Into<Color>) {
        self.renderer.flush(&mut self.backend);
        self.backend.clear(color.into());
    }

    /// Clears the active target to transparent black.
    pub fn clear(&mut self) {
        self.background(Color::TRANSPARENT);
    }

    // ── primitives ────────────────────────────────────────────────────────

    /// Rectangle interpreted through the active [`RectMode`].
    pub fn rect(&mut self, a: f32, b: f32, c: f32, d: f32) {
        let style = self.styles.peek();
        let r = style.rect_mode.resolve(a, b, c, d);
        let fill = style
            .fill_color()
            .map(|color| (fill_rect(r.origin.x, r.origin.y, r.size.x, r.size.y), color));
        let stroke = style
            .stroke_color()
            .map(|color| (stroke_path(&rect_corners(r), style.stroke_weight, true), color));
        self.draw_fill_stroke(fill, stroke);
    }

    pub fn square(&mut self, x: f32, y: f32, size: f32) {
        self.rect(x, y, size, size);
    }

    /// Ellipse interpreted through the active [`EllipseMode`].
    pub fn ellipse(&mut self, a: f32, b: f32, c: f32, d: f32) {
        let n = self.ellipse_segments;
        let style = self.styles.peek();
        let bounds = style.ellipse_mode.resolve(a, b, c, d);
        let center = bounds.center();
        let (rx, ry) = (bounds.size.x * 0.5, bounds.size.y * 0.5);

        let fill = style
            .fill_color()
            .map(|color| (fill_ellipse(center.x, center.y, rx, ry, n), color));
        let stroke = style.stroke_color().map(|color| {
            let outline = ellipse_points(center.x, center.y, rx, ry, n);
            (stroke_path(&outline, style.stroke_weight, true), color)
        });
        self.draw_fill_stroke(fill, stroke);
    }

    pub fn circle(&mut self, x: f32, y: f32, diameter: f32) {
        self.ellipse(x, y, diameter, diameter);
    }

    pub fn triangle(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        let pts = [Vec2::new(x1, y1), Vec2::new(x2, y2), Vec2::new(x3, y3)];
        let style = self.styles.peek();
        let fill = style
            .fill_color()
            .map(|color| (fill_triangle(pts[0], pts[1], pts[2]), color));
        let stroke = style
            .stroke_color()
            .map(|color| (stroke_path(&pts, style.stroke_weight, true), color));
        self.draw_fill_stroke(fill, stroke);
    }

    /// Quad from four corners in winding order.
    #[allow(clippy::too_many_arguments)]
    pub fn quad(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32, x4: f32, y4: f32) {
        let pts = [
            Vec2::new(x1, y1),
            Vec2::new(x2, y2),
            Vec2::new(x3, y3),
            Vec2::new(x4, y4),
        ];
        let style = self.styles.peek();
        let fill = style
            .fill_color()
            .map(|color| (fill_quad(pts[0], pts[1], pts[2], pts[3]), color));
        let stroke = style
            .stroke_color()
            .map(|color| (stroke_path(&pts, style.stroke_weight, true), color));
        self.draw_fill_stroke(fill, stroke);
    }

    /// Line in the stroke color with the active cap. Nothing without a stroke.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let style = self.styles.peek();
        let stroke = style.stroke_color().map(|color| {
            let c = stroke_line(
                Vec2::new(x1, y1),
                Vec2::new(x2, y2),
                style.stroke_weight,
                style.stroke_cap,
            );
            (c, color)
        });
        self.draw_fill_stroke(None, stroke);
    }

    /// Dot of stroke-weight size in the stroke color.
    pub fn point(&mut self, x: f32, y: f32) {
        let n = self.ellipse_segments;
        let style = self.styles.peek();
        let stroke = style.stroke_color().map(|color| {
            let c = stroke_point(Vec2::new(x, y), style.stroke_weight, style.stroke_cap, n);
            (c, color)
        });
        self.draw_fill_stroke(None, stroke);
    }

    /// Draws an image, texture or renderbuffer at its natural size.
    pub fn image(&mut self, source: impl Into<ImageSource>, x: f32, y: f32) {
        let source = source.into();
        let Some((texture, w, h)) = self.resolve_image(source) else { return };
        let rect = match self.styles.peek().image_mode {
            ImageMode::Corners => Rect::new(x, y, w as f32, h as f32),
            mode => mode.resolve(x, y, w as f32, h as f32),
        };
        self.draw_image_rect(texture, rect);
    }

    /// Draws an image into a rectangle interpreted through the active [`ImageMode`].
    pub fn image_sized(&mut self, source: impl Into<ImageSource>, a: f32, b: f32, c: f32, d: f32) {
        let source = source.into();
        let Some((texture, _, _)) = self.resolve_image(source) else { return };
        let rect = self.styles.peek().image_mode.resolve(a, b, c, d);
        self.draw_image_rect(texture, rect);
    }

    // ── custom shapes ─────────────────────────────────────────────────────

    /// Starts recording vertices for a custom shape.
    pub fn begin_shape(&mut self, kind: ShapeKind) {
        if let Some(prev) = self.shape.replace(ShapeRecording {
            kind,
            points: Vec::new(),
        }) {
            log::warn!("begin_shape inside begin_shape({:?}); previous shape discarded", prev.kind);
        }
    }

    pub fn vertex(&mut self, x: f32, y: f32) {
        match self.shape.as_mut() {
            Some(shape) => shape.points.push(Vec2::new(x, y)),
            None => log::warn!("vertex outside begin_shape/end_shape; ignored"),
        }
    }

    /// Tessellates and draws the recorded shape.
    pub fn end_shape(&mut self, end: ShapeEnd) {
        let Some(shape) = self.shape.take() else {
            log::warn!("end_shape without begin_shape; ignored");
            return;
        };
        let style = self.styles.peek();
        let geometry = tessellate_shape(
            shape.kind,
            &shape.points,
            end,
            ShapeStroke {
                weight: style.stroke_weight,
                cap: style.stroke_cap,
                point_segments: self.ellipse_segments,
            },
        );
        let fill = style.fill_color().map(|color| (geometry.fill, color));
        let stroke = style.stroke_color().map(|color| (geometry.stroke, color));
        self.draw_fill_stroke(fill, stroke);
    }

    // ── submission ────────────────────────────────────────────────────────

    fn resolve_image(&self, source: ImageSource) -> Option<(ResourceId, u32, u32)> {
        if let (ImageSource::Renderbuffer(id), Some(target)) = (source, self.target) {
            if id == target {
                log::warn!("image: a renderbuffer cannot be drawn into itself; skipped");
                return None;
            }
        }
        match self.assets.resolve(source) {
            Ok(found) => Some(found),
            Err(e) => {
                log::warn!("image: {e}; skipped");
                None
            }
        }
    }

    fn draw_image_rect(&mut self, texture: ResourceId, rect: Rect) {
        let tint = self.styles.peek().tint;
        let contour = fill_rect(rect.origin.x, rect.origin.y, rect.size.x, rect.size.y);
        self.submit_contour(&contour, tint, Some(texture));
    }

    /// Fill first, then stroke on top.
    fn draw_fill_stroke(&mut self, fill: Option<(Contour, Color)>, stroke: Option<(Contour, Color)>) {
        if let Some((contour, color)) = fill {
            self.submit_contour(&contour, color, None);
        }
        if let Some((contour, color)) = stroke {
            self.submit_contour(&contour, color, None);
        }
    }

    fn submit_contour(&mut self, contour: &Contour, color: Color, texture: Option<ResourceId>) {
        if contour.is_empty() {
            return;
        }
        if self.shape.is_some() {
            log::warn!("primitive drawn inside begin_shape/end_shape");
        }

        let shader = self.active_shader();
        let state = DrawState {
            shader,
            texture,
            blend: Some(self.styles.peek().blend_mode),
        };
        let mesh = Mesh::from_contour(contour, self.matrices.peek(), color);
        self.renderer
            .submit(&mut self.backend, &mesh.vertices, &mesh.indices, state);
    }

    /// Backend shader of the active style. A stale id is reported once and
    /// dropped from the style.
    fn active_shader(&mut self) -> Option<ResourceId> {
        let id = self.styles.peek().shader?;
        match self.assets.shaders.get(id) {
            Ok(shader) => Some(shader.resource),
            Err(e) => {
                log::warn!("shader: {e}; using the default shader");
                self.styles.peek_mut().shader = None;
                None
            }
        }
    }
}

fn rect_corners(r: Rect) -> [Vec2; 4] {
    let max = r.max();
    [
        r.origin,
        Vec2::new(max.x, r.origin.y),
        max,
        Vec2::new(r.origin.x, max.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpu::{GpuCall, RecordingBackend};
    use crate::state::STACK_CAPACITY;

    fn ctx() -> DrawContext<RecordingBackend> {
        DrawContext::new(RecordingBackend::new(), 200, 100, BatchLimits::default())
    }

    fn draws(g: &DrawContext<RecordingBackend>) -> Vec<usize> {
        g.backend()
            .calls()
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, GpuCall::DrawIndexed { .. }))
            .map(|(i, _)| i)
            .collect()
    }

    // ── end to end ────────────────────────────────────────────────────────

    #[test]
    fn red_opaque_then_blue_alpha() {
        let mut g = ctx();
        g.begin_draw();
        g.no_stroke();

        g.blend_mode(BlendMode::Opaque);
        g.fill(Color::rgb(255, 0, 0));
        g.rect(0.0, 0.0, 50.0, 50.0);

        g.blend_mode(BlendMode::Alpha);
        g.fill(Color::rgba(0, 0, 255, 128));
        g.rect(25.0, 25.0, 50.0, 50.0);

        assert_eq!(g.pending_batches().len(), 2);
        let stats = g.end_draw();
        assert_eq!(stats.draw_calls, 2);
        assert_eq!(stats.batches, 2);

        let b = g.backend();
        let upload = &b.uploads()[0];
        assert_eq!(upload.vertices[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(upload.vertices[4].color[2], 1.0);

        let d = draws(&g);
        assert_eq!(
            &b.calls()[d[0] + 1..d[1]],
            &[GpuCall::SetBlend(BlendMode::Alpha)]
        );
    }

    #[test]
    fn fill_and_stroke_share_one_batch() {
        let mut g = ctx();
        g.begin_draw();
        g.rect(10.0, 10.0, 20.0, 20.0);
        assert_eq!(g.pending_batches().len(), 1);

        // fill quad (4) + four stroke quads (16)
        assert_eq!(g.end_draw().vertices, 20);
    }

    #[test]
    fn frame_starts_with_canvas_projection() {
        let mut g = ctx();
        g.begin_draw();
        assert_eq!(
            g.backend().calls()[0],
            GpuCall::SetViewProjection(Mat4::screen_projection(200.0, 100.0))
        );
    }

    // ── state ─────────────────────────────────────────────────────────────

    #[test]
    fn push_pop_restores_matrix_and_style() {
        let mut g = ctx();
        g.fill(Color::rgb(1, 2, 3));
        g.translate(5.0, 5.0);
        let (m, s) = (*g.matrix(), g.style().clone());

        g.push();
        g.fill(Color::BLACK);
        g.stroke_weight(9.0);
        g.rotate(1.0);
        g.pop();

        assert_eq!(*g.matrix(), m);
        assert_eq!(*g.style(), s);
    }

    #[test]
    fn pop_after_partial_push_keeps_outer_matrix() {
        let mut g = ctx();
        for _ in 0..2 * STACK_CAPACITY {
            g.push_matrix();
        }
        let (matrix_depth, style_depth) = (g.matrix_depth(), g.style_depth());

        // Matrix stack is full; only the style slot is taken.
        g.push();
        assert_eq!(g.matrix_depth(), matrix_depth);
        assert_eq!(g.style_depth(), style_depth + 1);

        g.pop();
        assert_eq!(g.matrix_depth(), matrix_depth);
        assert_eq!(g.style_depth(), style_depth);
    }

    #[test]
    fn transform_is_applied_to_vertices() {
        let mut g = ctx();
        g.begin_draw();
        g.no_stroke();
        g.translate(100.0, 10.0);
        g.rect(0.0, 0.0, 1.0, 1.0);
        g.end_draw();
        assert_eq!(g.backend().uploads()[0].vertices[0].position, [100.0, 10.0, 0.0]);
    }

    #[test]
    fn begin_draw_resets_matrix_keeps_style() {
        let mut g = ctx();
        g.begin_draw();
        g.translate(3.0, 3.0);
        g.fill(Color::rgb(9, 9, 9));
        g.push_style();
        g.end_draw();

        g.begin_draw();
        assert_eq!(*g.matrix(), Mat4::IDENTITY);
        assert_eq!(g.style().fill, Color::rgb(9, 9, 9));
        assert_eq!(g.style_depth(), 0);
    }

    #[test]
    fn single_leftover_style_scope_is_dropped() {
        let mut g = ctx();
        g.begin_draw();
        g.push_style();
        g.end_draw();

        g.begin_draw();
        assert_eq!(g.style_depth(), 0);
    }

    #[test]
    fn rotate_honors_angle_mode() {
        let mut a = ctx();
        a.angle_mode(AngleMode::Degrees);
        a.rotate(90.0);
        let p = a.matrix().transform_point(Vec2::new(1.0, 0.0));
        assert!(p[0].abs() < 1e-6 && (p[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn negative_stroke_weight_disables_stroke() {
        let mut g = ctx();
        g.stroke_weight(-3.0);
        assert_eq!(g.style().stroke_color(), None);
    }

    // ── primitives ────────────────────────────────────────────────────────

    #[test]
    fn disabled_fill_and_stroke_draw_nothing() {
        let mut g = ctx();
        g.begin_draw();
        g.no_fill();
        g.no_stroke();
        g.rect(0.0, 0.0, 10.0, 10.0);
        g.ellipse(0.0, 0.0, 10.0, 10.0);
        g.line(0.0, 0.0, 10.0, 10.0);
        assert!(g.pending_batches().is_empty());
        assert_eq!(g.end_draw().draw_calls, 0);
    }

    #[test]
    fn ellipse_detail_sets_fan_size() {
        let mut g = ctx();
        g.begin_draw();
        g.no_stroke();
        g.ellipse_detail(6);
        g.circle(50.0, 50.0, 20.0);
        let stats = g.end_draw();
        assert_eq!(stats.vertices, 7);
        assert_eq!(stats.indices, 18);
    }

    #[test]
    fn ellipse_detail_is_capped_at_batch_capacity() {
        let mut g = ctx();
        g.begin_draw();
        g.no_stroke();
        g.ellipse_detail(u32::MAX);
        g.circle(50.0, 50.0, 20.0);
        let stats = g.end_draw();
        assert_eq!(stats.vertices, 10_000);
        assert_eq!(stats.indices, 3 * 9_999);
        assert_eq!(stats.draw_calls, 1);
    }

    #[test]
    fn stroke_join_is_stored_but_renders_unjoined() {
        let outline = |join: StrokeJoin| {
            let mut g = ctx();
            g.begin_draw();
            g.no_fill();
            g.stroke_join(join);
            assert_eq!(g.style().stroke_join, join);
            g.triangle(0.0, 0.0, 40.0, 0.0, 20.0, 30.0);
            let stats = g.end_draw();
            (stats.vertices, stats.indices)
        };
        let miter = outline(StrokeJoin::Miter);
        assert_eq!(outline(StrokeJoin::Bevel), miter);
        assert_eq!(outline(StrokeJoin::Round), miter);
    }

    #[test]
    fn custom_shape_is_drawn_on_end_shape() {
        let mut g = ctx();
        g.begin_draw();
        g.no_stroke();
        g.begin_shape(ShapeKind::Polygon);
        for (x, y) in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)] {
            g.vertex(x, y);
        }
        assert!(g.pending_batches().is_empty());
        g.end_shape(ShapeEnd::Close);
        assert_eq!(g.end_draw().indices, 6);
    }

    #[test]
    fn unterminated_shape_is_discarded() {
        let mut g = ctx();
        g.begin_draw();
        g.begin_shape(ShapeKind::Triangles);
        g.vertex(0.0, 0.0);
        assert_eq!(g.end_draw().draw_calls, 0);
        g.vertex(1.0, 1.0);
        g.end_shape(ShapeEnd::Open);
        assert!(g.pending_batches().is_empty());
    }

    // ── images / shaders ──────────────────────────────────────────────────

    #[test]
    fn image_binds_its_texture_with_tint() {
        let mut g = ctx();
        let img = g.create_image(4, 2, vec![255; 32]).unwrap();
        let tex = g.assets().images.get(img).unwrap().texture;

        g.begin_draw();
        g.tint(Color::rgba(255, 255, 255, 0));
        g.image(img, 10.0, 10.0);
        let key = g.pending_batches()[0].key;
        assert_eq!(key.texture, tex);

        g.end_draw();
        let v = &g.backend().uploads()[0].vertices;
        assert_eq!(v[2].position, [14.0, 12.0, 0.0]);
        assert_eq!(v[0].color[3], 0.0);
        assert!(g.backend().calls().contains(&GpuCall::BindTexture(tex)));
    }

    #[test]
    fn stale_image_is_skipped() {
        let mut g = ctx();
        let img = g.create_image(1, 1, vec![0; 4]).unwrap();
        g.destroy_image(img).unwrap();
        g.begin_draw();
        g.image(img, 0.0, 0.0);
        assert!(g.pending_batches().is_empty());
    }

    #[test]
    fn custom_shader_changes_key_and_stale_shader_falls_back() {
        let mut g = ctx();
        let sh = g.create_shader("fn vs_main() {} fn fs_main() {}").unwrap();
        let res = g.assets().shaders.get(sh).unwrap().resource;
        let default = g.backend().default_shader();

        g.begin_draw();
        g.no_stroke();
        g.shader(sh);
        g.rect(0.0, 0.0, 1.0, 1.0);
        g.reset_shader();
        g.rect(0.0, 0.0, 1.0, 1.0);
        let keys: Vec<_> = g.pending_batches().iter().map(|b| b.key.shader).collect();
        assert_eq!(keys, vec![res, default]);
        g.end_draw();

        g.shader(sh);
        g.destroy_shader(sh).unwrap();
        g.begin_draw();
        g.rect(0.0, 0.0, 1.0, 1.0);
        assert_eq!(g.pending_batches()[0].key.shader, default);
        assert_eq!(g.style().shader, None);
    }

    // ── renderbuffers ─────────────────────────────────────────────────────

    #[test]
    fn renderbuffer_switch_flushes_and_retargets() {
        let mut g = ctx();
        let rb = g.create_renderbuffer(64, 32).unwrap();
        let fb = g.assets().renderbuffers.get(rb).unwrap().framebuffer();

        g.begin_draw();
        g.rect(0.0, 0.0, 10.0, 10.0);
        g.renderbuffer(rb);
        assert!(g.pending_batches().is_empty());
        assert_eq!(g.current_renderbuffer(), Some(rb));

        let calls = g.backend().calls();
        let n = calls.len();
        assert_eq!(calls[n - 2], GpuCall::BindTarget(Some(fb)));
        assert_eq!(
            calls[n - 1],
            GpuCall::SetViewProjection(Mat4::screen_projection(64.0, 32.0))
        );

        g.background(Color::BLACK);
        g.no_renderbuffer();
        g.image(rb, 0.0, 0.0);
        g.end_draw();

        let calls = g.backend().calls();
        assert!(calls.contains(&GpuCall::Clear(Color::BLACK)));
        assert!(calls.contains(&GpuCall::BindTarget(None)));
        assert_eq!(g.current_renderbuffer(), None);
    }

    #[test]
    fn renderbuffer_cannot_draw_itself() {
        let mut g = ctx();
        let rb = g.create_renderbuffer(8, 8).unwrap();
        g.begin_draw();
        g.renderbuffer(rb);
        g.image(rb, 0.0, 0.0);
        assert!(g.pending_batches().is_empty());
    }

    #[test]
    fn end_draw_returns_to_canvas() {
        let mut g = ctx();
        let rb = g.create_renderbuffer(8, 8).unwrap();
        g.begin_draw();
        g.renderbuffer(rb);
        g.end_draw();
        assert_eq!(g.current_renderbuffer(), None);
        assert_eq!(
            g.backend().calls().last(),
            Some(&GpuCall::SetViewProjection(Mat4::screen_projection(200.0, 100.0)))
        );
    }

    #[test]
    fn destroying_the_active_renderbuffer_retargets_canvas() {
        let mut g = ctx();
        let rb = g.create_renderbuffer(8, 8).unwrap();
        g.begin_draw();
        g.renderbuffer(rb);
        g.destroy_renderbuffer(rb).unwrap();
        assert_eq!(g.current_renderbuffer(), None);
        assert_eq!(g.backend().live_framebuffers(), 0);
    }

    #[test]
    fn background_draws_pending_then_clears() {
        let mut g = ctx();
        g.begin_draw();
        g.rect(0.0, 0.0, 5.0, 5.0);
        g.background(Color::gray(204));
        let calls = g.backend().calls();
        let clear = calls.iter().position(|c| *c == GpuCall::Clear(Color::gray(204))).unwrap();
        let finish = calls.iter().position(|c| *c == GpuCall::Finish).unwrap();
        assert!(finish < clear);
    }
}

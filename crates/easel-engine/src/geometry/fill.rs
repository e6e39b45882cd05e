use core::f32::consts::TAU;

use crate::coords::{Rect, Vec2};

use super::Contour;

/// Smallest segment count accepted by [`fill_ellipse`].
pub const MIN_ELLIPSE_SEGMENTS: u32 = 3;

/// Axis-aligned rectangle: 4 corners, 2 triangles.
///
/// Corners are emitted top-left, top-right, bottom-right, bottom-left with
/// texcoords at the matching parametric corners.
pub fn fill_rect(x: f32, y: f32, w: f32, h: f32) -> Contour {
    let r = Rect::new(x, y, w, h);
    if r.is_empty() || !r.is_finite() {
        return Contour::new();
    }
    let max = r.max();

    let mut c = Contour::with_capacity(4, 6);
    c.push_vertex(r.origin, Vec2::new(0.0, 0.0));
    c.push_vertex(Vec2::new(max.x, r.origin.y), Vec2::new(1.0, 0.0));
    c.push_vertex(max, Vec2::new(1.0, 1.0));
    c.push_vertex(Vec2::new(r.origin.x, max.y), Vec2::new(0.0, 1.0));
    c.push_triangle(0, 1, 2);
    c.push_triangle(0, 2, 3);
    c
}

/// Single triangle. Texcoords follow each corner's position in the bounding box.
pub fn fill_triangle(a: Vec2, b: Vec2, c: Vec2) -> Contour {
    let points = [a, b, c];
    if !points.iter().all(|p| p.is_finite()) {
        return Contour::new();
    }
    let mut out = Contour::with_capacity(3, 3);
    for (p, uv) in points.iter().zip(bounding_uvs(&points)) {
        out.push_vertex(*p, uv);
    }
    out.push_triangle(0, 1, 2);
    out
}

/// Arbitrary quad given in winding order, split along the `a`-`c` diagonal.
pub fn fill_quad(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Contour {
    let points = [a, b, c, d];
    if !points.iter().all(|p| p.is_finite()) {
        return Contour::new();
    }
    let mut out = Contour::with_capacity(4, 6);
    for (p, uv) in points.iter().zip(bounding_uvs(&points)) {
        out.push_vertex(*p, uv);
    }
    out.push_triangle(0, 1, 2);
    out.push_triangle(0, 2, 3);
    out
}

/// Ellipse as a triangle fan around its center.
///
/// Produces `segments + 1` positions (center first, then boundary points at
/// `angle = 2π·i/segments`) and `3·segments` indices; the last triangle closes
/// back onto the first boundary point. `segments` below
/// [`MIN_ELLIPSE_SEGMENTS`] is raised to it. Smoothness is the caller's choice;
/// no adaptive subdivision happens here.
pub fn fill_ellipse(cx: f32, cy: f32, rx: f32, ry: f32, segments: u32) -> Contour {
    if rx == 0.0 || ry == 0.0 || !(cx.is_finite() && cy.is_finite() && rx.is_finite() && ry.is_finite()) {
        return Contour::new();
    }
    let n = segments.max(MIN_ELLIPSE_SEGMENTS);
    let (rx, ry) = (rx.abs(), ry.abs());

    let mut c = Contour::with_capacity(n as usize + 1, 3 * n as usize);
    c.push_vertex(Vec2::new(cx, cy), Vec2::new(0.5, 0.5));

    for i in 0..n {
        let angle = TAU * i as f32 / n as f32;
        let (s, co) = angle.sin_cos();
        c.push_vertex(
            Vec2::new(cx + rx * co, cy + ry * s),
            Vec2::new(0.5 + 0.5 * co, 0.5 + 0.5 * s),
        );
    }

    for i in 0..n {
        let a = 1 + i;
        let b = 1 + (i + 1) % n;
        c.push_triangle(0, a, b);
    }
    c
}

/// Boundary points of an ellipse at the same angles [`fill_ellipse`] uses,
/// for stroking its outline.
pub fn ellipse_points(cx: f32, cy: f32, rx: f32, ry: f32, segments: u32) -> Vec<Vec2> {
    let n = segments.max(MIN_ELLIPSE_SEGMENTS);
    (0..n)
        .map(|i| {
            let (s, c) = (TAU * i as f32 / n as f32).sin_cos();
            Vec2::new(cx + rx.abs() * c, cy + ry.abs() * s)
        })
        .collect()
}

/// Polygon filled as a fan from its first point.
///
/// Correct for convex outlines; concave outlines overdraw. Fewer than three
/// points yields an empty contour.
pub fn fill_polygon(points: &[Vec2]) -> Contour {
    if points.len() < 3 || !points.iter().all(|p| p.is_finite()) {
        return Contour::new();
    }
    let mut c = Contour::with_capacity(points.len(), 3 * (points.len() - 2));
    for (p, uv) in points.iter().zip(bounding_uvs(points)) {
        c.push_vertex(*p, uv);
    }
    for i in 1..points.len() as u32 - 1 {
        c.push_triangle(0, i, i + 1);
    }
    c
}

/// Texcoords proportional to each point's position inside the bounding box.
pub(super) fn bounding_uvs(points: &[Vec2]) -> Vec<Vec2> {
    let (mut min, mut max) = (Vec2::new(f32::MAX, f32::MAX), Vec2::new(f32::MIN, f32::MIN));
    for p in points {
        min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
        max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
    }
    let size = max - min;
    let span = |v: f32| if v.abs() > f32::EPSILON { v } else { 1.0 };
    points
        .iter()
        .map(|p| Vec2::new((p.x - min.x) / span(size.x), (p.y - min.y) / span(size.y)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_area([a, b, c]: [Vec2; 3]) -> f32 {
        ((b - a).cross(c - a) * 0.5).abs()
    }

    // ── rect ──────────────────────────────────────────────────────────────

    #[test]
    fn rect_has_four_vertices_two_triangles() {
        let c = fill_rect(10.0, 20.0, 30.0, 40.0);
        assert_eq!(c.vertex_count(), 4);
        assert_eq!(c.indices.len(), 6);
        assert!(c.is_valid());
    }

    #[test]
    fn rect_triangles_cover_area_exactly() {
        for (x, y, w, h) in [(0.0, 0.0, 1.0, 1.0), (-5.0, 3.0, 12.5, 7.25), (100.0, 50.0, 0.5, 300.0)] {
            let c = fill_rect(x, y, w, h);
            let area: f32 = c.triangles().map(triangle_area).sum();
            assert!((area - w * h).abs() < 1e-3, "area {area} != {}", w * h);
        }
    }

    #[test]
    fn rect_texcoords_at_corners() {
        let c = fill_rect(0.0, 0.0, 8.0, 4.0);
        assert_eq!(
            c.texcoords,
            vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.0, 1.0)]
        );
    }

    #[test]
    fn zero_sized_rect_is_empty() {
        assert!(fill_rect(0.0, 0.0, 0.0, 10.0).is_empty());
    }

    // ── ellipse ───────────────────────────────────────────────────────────

    #[test]
    fn ellipse_fan_counts() {
        for n in [3u32, 4, 7, 32, 100] {
            let c = fill_ellipse(0.0, 0.0, 10.0, 5.0, n);
            assert_eq!(c.vertex_count(), n as usize + 1);
            assert_eq!(c.indices.len(), 3 * n as usize);
            assert!(c.is_valid());
        }
    }

    #[test]
    fn ellipse_fan_is_closed() {
        let n = 12;
        let c = fill_ellipse(0.0, 0.0, 1.0, 1.0, n);
        // Every triangle starts at the center.
        assert!(c.indices.chunks_exact(3).all(|t| t[0] == 0));
        // The last triangle wraps back to the first boundary vertex.
        let last = &c.indices[c.indices.len() - 3..];
        assert_eq!(last, &[0, n, 1]);
    }

    #[test]
    fn ellipse_boundary_lies_on_radius() {
        let c = fill_ellipse(5.0, 5.0, 3.0, 3.0, 16);
        for p in &c.positions[1..] {
            assert!(((*p - Vec2::new(5.0, 5.0)).length() - 3.0).abs() < 1e-4);
        }
    }

    #[test]
    fn ellipse_segments_are_clamped() {
        let c = fill_ellipse(0.0, 0.0, 1.0, 1.0, 1);
        assert_eq!(c.vertex_count(), MIN_ELLIPSE_SEGMENTS as usize + 1);
    }

    #[test]
    fn ellipse_points_match_fan_boundary() {
        let c = fill_ellipse(2.0, 3.0, 4.0, 1.0, 9);
        assert_eq!(ellipse_points(2.0, 3.0, 4.0, 1.0, 9), c.positions[1..].to_vec());
    }

    // ── triangle / quad / polygon ─────────────────────────────────────────

    #[test]
    fn triangle_is_single_triangle() {
        let c = fill_triangle(Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 3.0));
        assert_eq!(c.indices, vec![0, 1, 2]);
        assert_eq!(c.texcoords[1], Vec2::new(1.0, 0.0));
        assert!((c.triangles().map(triangle_area).sum::<f32>() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn quad_splits_on_diagonal() {
        let c = fill_quad(
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        );
        assert_eq!(c.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn polygon_fan() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(0.0, 2.0),
        ];
        let c = fill_polygon(&pts);
        assert_eq!(c.triangle_count(), 3);
        assert_eq!(c.indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4]);
    }

    #[test]
    fn polygon_needs_three_points() {
        assert!(fill_polygon(&[Vec2::zero(), Vec2::new(1.0, 1.0)]).is_empty());
    }
}

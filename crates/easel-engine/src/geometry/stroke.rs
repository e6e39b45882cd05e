use crate::coords::Vec2;
use crate::style::StrokeCap;

use super::{fill_ellipse, fill_rect, Contour};

/// Fan segments used for each round cap.
pub const ROUND_CAP_SEGMENTS: u32 = 12;

/// Expands a polyline into one quad per segment.
///
/// Each consecutive pair (plus the closing pair from last to first when
/// `closed`) becomes an independent 4-vertex, 2-triangle quad offset by half
/// of `weight` on either side. Zero-length segments are skipped. Paths with
/// fewer than two points yield an empty contour.
///
/// Segments are not joined.
// TODO: build miter/bevel/round join geometry from `StrokeJoin` between adjacent quads.
pub fn stroke_path(points: &[Vec2], weight: f32, closed: bool) -> Contour {
    if points.len() < 2 || !(weight > 0.0) || !weight.is_finite() {
        return Contour::new();
    }

    let segments = if closed && points.len() > 2 { points.len() } else { points.len() - 1 };
    let mut c = Contour::with_capacity(segments * 4, segments * 6);
    for i in 0..segments {
        let a = points[i];
        let b = points[(i + 1) % points.len()];
        push_segment_quad(&mut c, a, b, weight * 0.5);
    }
    c
}

/// Open two-point stroke with end caps.
///
/// A zero-length line yields an empty contour regardless of cap.
pub fn stroke_line(a: Vec2, b: Vec2, weight: f32, cap: StrokeCap) -> Contour {
    let Some(dir) = (b - a).normalized() else {
        return Contour::new();
    };
    if !(weight > 0.0) || !weight.is_finite() {
        return Contour::new();
    }
    let half = weight * 0.5;

    match cap {
        StrokeCap::Square => {
            let mut c = Contour::with_capacity(4, 6);
            push_segment_quad(&mut c, a, b, half);
            c
        }
        StrokeCap::Project => {
            let mut c = Contour::with_capacity(4, 6);
            push_segment_quad(&mut c, a - dir * half, b + dir * half, half);
            c
        }
        StrokeCap::Round => {
            let mut c = Contour::new();
            push_segment_quad(&mut c, a, b, half);
            c.append(&fill_ellipse(a.x, a.y, half, half, ROUND_CAP_SEGMENTS));
            c.append(&fill_ellipse(b.x, b.y, half, half, ROUND_CAP_SEGMENTS));
            c
        }
    }
}

fn push_segment_quad(c: &mut Contour, a: Vec2, b: Vec2, half: f32) {
    let Some(dir) = (b - a).normalized() else { return };
    let n = dir.perp() * half;

    let i0 = c.push_vertex(a + n, Vec2::new(0.0, 0.0));
    let i1 = c.push_vertex(b + n, Vec2::new(1.0, 0.0));
    let i2 = c.push_vertex(b - n, Vec2::new(1.0, 1.0));
    let i3 = c.push_vertex(a - n, Vec2::new(0.0, 1.0));
    c.push_triangle(i0, i1, i2);
    c.push_triangle(i0, i2, i3);
}

/// A stroked point: a disc of diameter `weight` for round caps, otherwise an
/// axis-aligned square of side `weight`.
pub fn stroke_point(p: Vec2, weight: f32, cap: StrokeCap, segments: u32) -> Contour {
    if !(weight > 0.0) || !weight.is_finite() || !p.is_finite() {
        return Contour::new();
    }
    let half = weight * 0.5;
    match cap {
        StrokeCap::Round => fill_ellipse(p.x, p.y, half, half, segments),
        StrokeCap::Square | StrokeCap::Project => fill_rect(p.x - half, p.y - half, weight, weight),
    }
}

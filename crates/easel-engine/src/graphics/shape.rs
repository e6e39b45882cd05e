use crate::coords::Vec2;
use crate::geometry::{fill_polygon, fill_quad, fill_triangle, stroke_line, stroke_path, stroke_point, Contour};
use crate::style::{ShapeKind, StrokeCap};

/// How `end_shape` treats the outline of a polygon.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum ShapeEnd {
    #[default]
    Open,
    /// Strokes the closing edge from the last vertex back to the first.
    Close,
}

/// Stroke parameters captured from the style when a shape ends.
#[derive(Debug, Copy, Clone)]
pub struct ShapeStroke {
    pub weight: f32,
    pub cap: StrokeCap,
    /// Disc segments for round points.
    pub point_segments: u32,
}

/// Fill and stroke geometry of one `begin_shape`/`end_shape` block.
#[derive(Debug, Clone, Default)]
pub struct ShapeGeometry {
    pub fill: Contour,
    pub stroke: Contour,
}

/// Tessellates recorded shape vertices.
///
/// Trailing vertices that do not complete a primitive of `kind` are ignored.
pub fn tessellate_shape(
    kind: ShapeKind,
    points: &[Vec2],
    end: ShapeEnd,
    stroke: ShapeStroke,
) -> ShapeGeometry {
    let mut out = ShapeGeometry::default();
    let w = stroke.weight;

    let triangle = |out: &mut ShapeGeometry, a: Vec2, b: Vec2, c: Vec2| {
        out.fill.append(&fill_triangle(a, b, c));
        out.stroke.append(&stroke_path(&[a, b, c], w, true));
    };

    match kind {
        ShapeKind::Polygon => {
            out.fill = fill_polygon(points);
            out.stroke = stroke_path(points, w, end == ShapeEnd::Close);
        }
        ShapeKind::Points => {
            for p in points {
                out.stroke
                    .append(&stroke_point(*p, w, stroke.cap, stroke.point_segments));
            }
        }
        ShapeKind::Lines => {
            for pair in points.chunks_exact(2) {
                out.stroke.append(&stroke_line(pair[0], pair[1], w, stroke.cap));
            }
        }
        ShapeKind::Triangles => {
            for t in points.chunks_exact(3) {
                triangle(&mut out, t[0], t[1], t[2]);
            }
        }
        ShapeKind::TriangleStrip => {
            for t in points.windows(3) {
                triangle(&mut out, t[0], t[1], t[2]);
            }
        }
        ShapeKind::TriangleFan => {
            if let Some((&center, rest)) = points.split_first() {
                for pair in rest.windows(2) {
                    triangle(&mut out, center, pair[0], pair[1]);
                }
            }
        }
        ShapeKind::Quads => {
            for q in points.chunks_exact(4) {
                out.fill.append(&fill_quad(q[0], q[1], q[2], q[3]));
                out.stroke.append(&stroke_path(q, w, true));
            }
        }
    }
    out
}

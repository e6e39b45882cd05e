use crate::coords::{Rect, Vec2};

/// End-cap geometry for open strokes.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum StrokeCap {
    /// Flush with the end point.
    Square,
    /// Extended past the end point by half the stroke weight.
    Project,
    /// Half-disc around the end point.
    #[default]
    Round,
}

/// Corner geometry between stroke segments.
///
/// Carried in the style; `DrawContext::stroke_join` warns that joins are not
/// implemented. Every segment is an independent quad, so all variants render
/// the same way.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum StrokeJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// Unit used by `rotate`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum AngleMode {
    #[default]
    Radians,
    Degrees,
}

impl AngleMode {
    #[inline]
    pub fn to_radians(self, angle: f32) -> f32 {
        match self {
            AngleMode::Radians => angle,
            AngleMode::Degrees => angle.to_radians(),
        }
    }
}

/// Interpretation of the four numbers passed to `rect`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum RectMode {
    /// `x, y` top-left corner, `w, h` size.
    #[default]
    Corner,
    /// `x1, y1` and `x2, y2` opposite corners.
    Corners,
    /// `x, y` center, `w, h` size.
    Center,
    /// `x, y` center, `w, h` half-size.
    Radius,
}

/// Interpretation of the four numbers passed to `ellipse`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum EllipseMode {
    Corner,
    Corners,
    #[default]
    Center,
    Radius,
}

/// Interpretation of the position (and optional size) passed to `image`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ImageMode {
    #[default]
    Corner,
    Corners,
    Center,
}

impl RectMode {
    /// Interprets `rect(a, b, c, d)` arguments as a normalized rectangle.
    pub fn resolve(self, a: f32, b: f32, c: f32, d: f32) -> Rect {
        let (p, size) = (Vec2::new(a, b), Vec2::new(c, d));
        match self {
            RectMode::Corner => Rect::new(a, b, c, d),
            RectMode::Corners => Rect::from_corners(p, size),
            RectMode::Center => Rect::from_center(p, c, d),
            RectMode::Radius => Rect::from_center(p, size.x * 2.0, size.y * 2.0),
        }
        .normalized()
    }
}

impl EllipseMode {
    /// Bounding box of `ellipse(a, b, c, d)`.
    pub fn resolve(self, a: f32, b: f32, c: f32, d: f32) -> Rect {
        let p = Vec2::new(a, b);
        match self {
            EllipseMode::Corner => Rect::new(a, b, c, d),
            EllipseMode::Corners => Rect::from_corners(p, Vec2::new(c, d)),
            EllipseMode::Center => Rect::from_center(p, c, d),
            EllipseMode::Radius => Rect::from_center(p, c * 2.0, d * 2.0),
        }
        .normalized()
    }
}

impl ImageMode {
    /// Destination rectangle of `image(src, a, b, c, d)`.
    pub fn resolve(self, a: f32, b: f32, c: f32, d: f32) -> Rect {
        match self {
            ImageMode::Corner => Rect::new(a, b, c, d),
            ImageMode::Corners => Rect::from_corners(Vec2::new(a, b), Vec2::new(c, d)),
            ImageMode::Center => Rect::from_center(Vec2::new(a, b), c, d),
        }
    }
}

/// Vertex interpretation between `begin_shape` and `end_shape`.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ShapeKind {
    /// Closed or open outline, filled as a fan.
    #[default]
    Polygon,
    Points,
    /// Every two vertices form a line.
    Lines,
    /// Every three vertices form a triangle.
    Triangles,
    TriangleStrip,
    TriangleFan,
    /// Every four vertices form a quad.
    Quads,
}

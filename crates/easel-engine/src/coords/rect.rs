use super::Vec2;

/// Axis-aligned rectangle in sketch pixels (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle spanning two opposite corners, in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Rect::new(a.x, a.y, b.x - a.x, b.y - a.y).normalized()
    }

    /// Rectangle of the given size centered on `center`.
    #[inline]
    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Rect::new(center.x - w * 0.5, center.y - h * 0.5, w, h)
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x * 0.5, self.origin.y + self.size.y * 0.5)
    }

    #[inline]
    pub fn area(self) -> f32 {
        (self.size.x * self.size.y).abs()
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x == 0.0 || self.size.y == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    #[test]
    fn normalized_negative_height() {
        let n = r(0.0, 10.0, 5.0, -3.0).normalized();
        assert_eq!(n.origin.y, 7.0);
        assert_eq!(n.size.y, 3.0);
    }

    // ── constructors ──────────────────────────────────────────────────────

    #[test]
    fn from_corners_any_order() {
        let a = Rect::from_corners(Vec2::new(10.0, 20.0), Vec2::new(0.0, 5.0));
        assert_eq!(a, r(0.0, 5.0, 10.0, 15.0));
    }

    #[test]
    fn from_center_offsets_by_half_size() {
        let c = Rect::from_center(Vec2::new(50.0, 50.0), 20.0, 10.0);
        assert_eq!(c, r(40.0, 45.0, 20.0, 10.0));
        assert_eq!(c.center(), Vec2::new(50.0, 50.0));
    }

    // ── area / is_empty ───────────────────────────────────────────────────

    #[test]
    fn area_ignores_sign() {
        assert_eq!(r(0.0, 0.0, -4.0, 5.0).area(), 20.0);
    }

    #[test]
    fn is_empty_zero_size() {
        assert!(r(0.0, 0.0, 0.0, 5.0).is_empty());
        assert!(r(0.0, 0.0, 5.0, 0.0).is_empty());
        assert!(!r(0.0, 0.0, 1.0, 1.0).is_empty());
    }
}

use crate::coords::Mat4;

use super::{BoundedStack, STACK_CAPACITY};

/// Stack of model transforms. The top is the active matrix.
#[derive(Debug, Clone)]
pub struct MatrixStack {
    stack: BoundedStack<Mat4>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: BoundedStack::new(Mat4::IDENTITY, capacity, "matrix"),
        }
    }

    /// Opens a new slot holding a copy of the active matrix (`extend`) or identity.
    ///
    /// Returns `false` when the stack is full and the push was dropped.
    pub fn push(&mut self, extend: bool) -> bool {
        let next = if extend { *self.stack.peek() } else { Mat4::IDENTITY };
        self.stack.push(next)
    }

    /// Discards the active matrix. Never drops the root.
    pub fn pop(&mut self) -> bool {
        self.stack.pop()
    }

    /// Sets the active matrix to identity.
    pub fn reset(&mut self) {
        *self.stack.peek_mut() = Mat4::IDENTITY;
    }

    /// Drops every pushed slot and resets the root; used at frame start.
    pub fn clear(&mut self) {
        self.stack.truncate_to_root();
        self.reset();
    }

    #[inline]
    pub fn peek(&self) -> &Mat4 {
        self.stack.peek()
    }

    #[inline]
    pub fn peek_mut(&mut self) -> &mut Mat4 {
        self.stack.peek_mut()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    /// Post-multiplies the active matrix by `m`.
    pub fn apply(&mut self, m: Mat4) {
        let top = self.stack.peek_mut();
        *top = *top * m;
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.apply(Mat4::translation(x, y, 0.0));
    }

    pub fn scale(&mut self, x: f32, y: f32) {
        self.apply(Mat4::scaling(x, y, 1.0));
    }

    pub fn rotate(&mut self, radians: f32) {
        self.apply(Mat4::rotation_z(radians));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;

    #[test]
    fn push_mutate_pop_restores_exactly() {
        let mut s = MatrixStack::new();
        s.translate(5.0, 7.0);
        s.rotate(0.3);
        let before = *s.peek();

        assert!(s.push(true));
        s.scale(3.0, 2.0);
        s.translate(-1.0, 4.0);
        assert_ne!(*s.peek(), before);
        assert!(s.pop());

        assert_eq!(*s.peek(), before);
    }

    #[test]
    fn push_without_extend_starts_from_identity() {
        let mut s = MatrixStack::new();
        s.translate(10.0, 10.0);
        s.push(false);
        assert_eq!(*s.peek(), Mat4::IDENTITY);
    }

    #[test]
    fn nested_translations_compose() {
        let mut s = MatrixStack::new();
        s.translate(10.0, 0.0);
        s.push(true);
        s.translate(0.0, 5.0);
        assert_eq!(s.peek().transform_point(Vec2::zero()), [10.0, 5.0, 0.0]);
    }

    #[test]
    fn overflow_keeps_depth_at_capacity() {
        let mut s = MatrixStack::with_capacity(4);
        let results: Vec<bool> = (0..6).map(|_| s.push(true)).collect();
        assert_eq!(results, vec![true, true, true, false, false, false]);
        assert_eq!(s.depth(), 3);
    }

    #[test]
    fn pop_at_root_is_noop() {
        let mut s = MatrixStack::new();
        s.translate(1.0, 2.0);
        let root = *s.peek();
        assert!(!s.pop());
        assert_eq!(*s.peek(), root);
    }

    #[test]
    fn clear_returns_to_identity_root() {
        let mut s = MatrixStack::new();
        s.translate(1.0, 2.0);
        s.push(true);
        s.scale(2.0, 2.0);
        s.clear();
        assert_eq!(s.depth(), 0);
        assert_eq!(*s.peek(), Mat4::IDENTITY);
    }
}

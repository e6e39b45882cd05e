use crate::style::RenderStyle;

use super::{BoundedStack, STACK_CAPACITY};

/// Stack of style records. The top is the style every primitive reads.
#[derive(Debug, Clone)]
pub struct StyleStack {
    stack: BoundedStack<RenderStyle>,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleStack {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            stack: BoundedStack::new(RenderStyle::default(), capacity, "style"),
        }
    }

    /// Opens a new slot inheriting the current style (`extend_previous`) or
    /// starting from [`RenderStyle::default`].
    pub fn push(&mut self, extend_previous: bool) -> bool {
        let next = if extend_previous {
            self.stack.peek().clone()
        } else {
            RenderStyle::default()
        };
        self.stack.push(next)
    }

    /// Restores the previous style. Never drops the root.
    pub fn pop(&mut self) -> bool {
        self.stack.pop()
    }

    /// Resets the active style to defaults.
    pub fn reset(&mut self) {
        *self.stack.peek_mut() = RenderStyle::default();
    }

    /// Drops every pushed slot; the root style (and its current values) stays.
    pub fn unwind(&mut self) {
        self.stack.truncate_to_root();
    }

    #[inline]
    pub fn peek(&self) -> &RenderStyle {
        self.stack.peek()
    }

    #[inline]
    pub fn peek_mut(&mut self) -> &mut RenderStyle {
        self.stack.peek_mut()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.depth()
    }
}

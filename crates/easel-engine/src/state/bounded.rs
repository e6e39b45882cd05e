/// Maximum depth of the matrix and style stacks, root included.
pub const STACK_CAPACITY: usize = 64;

/// Fixed-capacity stack with a permanent root entry.
#[derive(Debug, Clone)]
pub struct BoundedStack<T> {
    entries: Vec<T>,
    capacity: usize,
    label: &'static str,
}

impl<T: Clone> BoundedStack<T> {
    /// Creates a stack holding only `root`.
    ///
    /// `label` names the stack in overflow/underflow warnings.
    pub fn new(root: T, capacity: usize, label: &'static str) -> Self {
        let capacity = capacity.max(1);
        let mut entries = Vec::with_capacity(capacity);
        entries.push(root);
        Self { entries, capacity, label }
    }

    /// Pushes `value` as the new top.
    ///
    /// Returns `false` (and logs) when the stack is full; the push is dropped.
    pub fn push(&mut self, value: T) -> bool {
        if self.entries.len() >= self.capacity {
            log::warn!(
                "{} stack overflow (capacity {}); push ignored",
                self.label,
                self.capacity
            );
            return false;
        }
        self.entries.push(value);
        true
    }

    /// Discards the top entry. Returns `false` (and logs) at the root.
    pub fn pop(&mut self) -> bool {
        if self.entries.len() <= 1 {
            log::warn!("{} stack underflow; pop at root ignored", self.label);
            return false;
        }
        self.entries.pop();
        true
    }

    #[inline]
    pub fn peek(&self) -> &T {
        // The root is never removed.
        &self.entries[self.entries.len() - 1]
    }

    #[inline]
    pub fn peek_mut(&mut self) -> &mut T {
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Number of entries above the root.
    #[inline]
    pub fn depth(&self) -> usize {
        self.entries.len() - 1
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every entry above the root.
    pub fn truncate_to_root(&mut self) {
        self.entries.truncate(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_survives_pop() {
        let mut s = BoundedStack::new(1, 4, "test");
        assert!(!s.pop());
        assert_eq!(*s.peek(), 1);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn overflow_is_dropped() {
        let mut s = BoundedStack::new(0, 3, "test");
        assert!(s.push(1));
        assert!(s.push(2));
        assert!(!s.push(3));
        assert_eq!(*s.peek(), 2);
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn zero_capacity_still_holds_root() {
        let mut s = BoundedStack::new(7, 0, "test");
        assert_eq!(s.capacity(), 1);
        assert!(!s.push(8));
        assert_eq!(*s.peek(), 7);
    }

    #[test]
    fn truncate_keeps_root() {
        let mut s = BoundedStack::new(0, 8, "test");
        s.push(1);
        s.push(2);
        s.truncate_to_root();
        assert_eq!(*s.peek(), 0);
        assert_eq!(s.depth(), 0);
    }
}

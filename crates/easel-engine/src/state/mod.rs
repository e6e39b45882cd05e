//! Retained drawing state: transform and style stacks.
//!
//! Both stacks share one discipline:
//! - a root entry is always present
//! - capacity is fixed ([`STACK_CAPACITY`]); overflowing pushes are dropped
//! - popping the root is a no-op
//!
//! Violations are logged as warnings and never abort drawing.

mod bounded;
mod matrix;
mod style;

pub use bounded::{BoundedStack, STACK_CAPACITY};
pub use matrix::MatrixStack;
pub use style::StyleStack;

//! Coordinate and geometry types shared by the tessellator and renderer.
//!
//! Canonical CPU space:
//! - sketch pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! The batch renderer converts to clip space with a view-projection uniform.

mod mat4;
mod rect;
mod vec2;

pub use mat4::Mat4;
pub use rect::Rect;
pub use vec2::Vec2;

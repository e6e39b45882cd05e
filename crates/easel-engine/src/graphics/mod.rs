//! Processing-style immediate-mode drawing API.
//!
//! [`DrawContext`] is the surface sketches draw on. Each primitive call:
//! - reads the active style and matrix
//! - tessellates into a contour (see [`crate::geometry`])
//! - transforms, colors and submits it to the batch renderer

mod context;
mod shape;

pub use context::{DrawContext, DEFAULT_ELLIPSE_SEGMENTS};
pub use shape::{tessellate_shape, ShapeEnd, ShapeGeometry, ShapeStroke};

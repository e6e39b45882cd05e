//! Shape builder: primitives to triangle geometry.
//!
//! Pipeline:
//! - `fill` / `stroke` turn a primitive into a [`Contour`] (local 2D positions,
//!   texcoords, triangle indices). These are pure functions.
//! - [`Mesh::from_contour`] applies the active matrix and a color, producing
//!   [`Vertex`] data ready for the batch renderer.
//!
//! Degenerate input always yields an empty contour, never a panic.

mod contour;
mod fill;
mod mesh;
mod stroke;
mod vertex;

pub use contour::Contour;
pub use fill::{
    ellipse_points, fill_ellipse, fill_polygon, fill_quad, fill_rect, fill_triangle,
    MIN_ELLIPSE_SEGMENTS,
};
pub use mesh::Mesh;
pub use stroke::{stroke_line, stroke_path, stroke_point, ROUND_CAP_SEGMENTS};
pub use vertex::Vertex;

use crate::coords::Mat4;
use crate::paint::Color;

use super::{Contour, Vertex};

/// Transformed, colored geometry ready for submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts `contour` with every position transformed by `matrix` and
    /// every vertex colored with `color`.
    pub fn from_contour(contour: &Contour, matrix: &Mat4, color: Color) -> Self {
        let mut mesh = Self::new();
        mesh.push_contour(contour, matrix, color);
        mesh
    }

    /// Appends `contour`, rebasing its indices.
    pub fn push_contour(&mut self, contour: &Contour, matrix: &Mat4, color: Color) {
        let base = self.vertices.len() as u32;
        let color = color.to_normalized();

        self.vertices.extend(contour.positions.iter().zip(&contour.texcoords).map(|(p, uv)| Vertex {
            position: matrix.transform_point(*p),
            texcoord: [uv.x, uv.y],
            color,
        }));
        self.indices.extend(contour.indices.iter().map(|i| i + base));
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }
}

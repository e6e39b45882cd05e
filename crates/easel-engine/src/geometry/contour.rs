use crate::coords::Vec2;

/// Tessellated primitive in local coordinates.
///
/// Invariants:
/// - `positions.len() == texcoords.len()`
/// - every index is a valid offset into `positions`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub positions: Vec<Vec2>,
    pub texcoords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Contour {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.indices.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of complete triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Adds a vertex and returns its index.
    #[inline]
    pub fn push_vertex(&mut self, position: Vec2, texcoord: Vec2) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.texcoords.push(texcoord);
        index
    }

    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Appends `other`, rebasing its indices past this contour's vertices.
    pub fn append(&mut self, other: &Contour) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.texcoords.extend_from_slice(&other.texcoords);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Checks the structural invariants.
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len() as u32;
        self.positions.len() == self.texcoords.len()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| i < n)
    }

    /// Iterates triangles as position triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| {
            [
                self.positions[t[0] as usize],
                self.positions[t[1] as usize],
                self.positions[t[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_rebases_indices() {
        let mut a = Contour::new();
        let i0 = a.push_vertex(Vec2::new(0.0, 0.0), Vec2::zero());
        let i1 = a.push_vertex(Vec2::new(1.0, 0.0), Vec2::zero());
        let i2 = a.push_vertex(Vec2::new(0.0, 1.0), Vec2::zero());
        a.push_triangle(i0, i1, i2);

        let b = a.clone();
        a.append(&b);

        assert_eq!(a.vertex_count(), 6);
        assert_eq!(a.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(a.is_valid());
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mut c = Contour::new();
        c.push_vertex(Vec2::zero(), Vec2::zero());
        c.push_triangle(0, 0, 1);
        assert!(!c.is_valid());
    }

    #[test]
    fn empty_contour_is_empty() {
        assert!(Contour::new().is_empty());
        assert_eq!(Contour::new().triangle_count(), 0);
    }
}

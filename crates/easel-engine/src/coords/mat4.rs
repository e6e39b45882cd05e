use core::ops::Mul;

use bytemuck::{Pod, Zeroable};

use super::Vec2;

/// Column-major 4x4 transform matrix.
///
/// `cols[c][r]` is row `r` of column `c`, which is the layout WGSL expects for
/// `mat4x4<f32>` uniforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [x, y, z, 1.0];
        m
    }

    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = x;
        m.cols[1][1] = y;
        m.cols[2][2] = z;
        m
    }

    /// Rotation about the Z axis. Positive angles turn +X towards +Y, which is
    /// clockwise on screen with the top-left origin.
    pub fn rotation_z(radians: f32) -> Self {
        let (s, c) = radians.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0][0] = c;
        m.cols[0][1] = s;
        m.cols[1][0] = -s;
        m.cols[1][1] = c;
        m
    }

    /// Orthographic projection mapping the given box to wgpu clip space
    /// (x/y in [-1, 1], z in [0, 1]).
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let rl = right - left;
        let tb = top - bottom;
        let fnr = far - near;
        Mat4 {
            cols: [
                [2.0 / rl, 0.0, 0.0, 0.0],
                [0.0, 2.0 / tb, 0.0, 0.0],
                [0.0, 0.0, -1.0 / fnr, 0.0],
                [-(right + left) / rl, -(top + bottom) / tb, -near / fnr, 1.0],
            ],
        }
    }

    /// Pixel-space projection: origin top-left, +Y down, `width` x `height`.
    pub fn screen_projection(width: f32, height: f32) -> Self {
        Self::orthographic(0.0, width.max(1.0), height.max(1.0), 0.0, -1.0, 1.0)
    }

    /// Transforms a point on the z = 0 plane.
    #[inline]
    pub fn transform_point(&self, p: Vec2) -> [f32; 3] {
        let c = &self.cols;
        let x = c[0][0] * p.x + c[1][0] * p.y + c[3][0];
        let y = c[0][1] * p.x + c[1][1] * p.y + c[3][1];
        let z = c[0][2] * p.x + c[1][2] * p.y + c[3][2];
        let w = c[0][3] * p.x + c[1][3] * p.y + c[3][3];
        if w != 0.0 && w != 1.0 {
            [x / w, y / w, z / w]
        } else {
            [x, y, z]
        }
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Mat4 { cols: out }
    }
}

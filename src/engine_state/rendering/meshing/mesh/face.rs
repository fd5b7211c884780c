use crate::engine_state::voxels::block::{BlockSide, BlockTypeSize};

/// A merged rectangle of coplanar, same-type faces produced by the greedy mesher.
///
/// The quad lies in the plane `axis = slice` and covers `width` cells along the first
/// in-plane axis `(axis + 1) % 3` and `height` cells along the second `(axis + 2) % 3`,
/// starting at `(u, v)`. `positive` tells which way the face looks along `axis`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quad {
    /// Axis the face normal lies along (0 = x, 1 = y, 2 = z)
    pub axis: usize,
    /// Plane coordinate along `axis`, in 0..=16
    pub slice: usize,
    /// Start along the first in-plane axis
    pub u: usize,
    /// Start along the second in-plane axis
    pub v: usize,
    /// Extent along the first in-plane axis, in blocks
    pub width: usize,
    /// Extent along the second in-plane axis, in blocks
    pub height: usize,
    /// Block id of the solid side
    pub block: BlockTypeSize,
    /// Whether the face normal points towards +`axis`
    pub positive: bool,
}

impl Quad {
    /// Which block face this quad draws.
    pub fn side(&self) -> BlockSide {
        BlockSide::from_axis(self.axis, self.positive)
    }

    /// Outward unit normal.
    pub fn normal(&self) -> [f32; 3] {
        let normal = self.side().normal();
        [normal.x as f32, normal.y as f32, normal.z as f32]
    }

    /// The four corners in counter-clockwise order around +`axis`: origin, origin + width,
    /// origin + width + height, origin + height.
    pub fn corners(&self) -> [[f32; 3]; 4] {
        let u_axis = (self.axis + 1) % 3;
        let v_axis = (self.axis + 2) % 3;

        let mut base = [0.0f32; 3];
        base[self.axis] = self.slice as f32;
        base[u_axis] = self.u as f32;
        base[v_axis] = self.v as f32;

        let mut du = [0.0f32; 3];
        du[u_axis] = self.width as f32;
        let mut dv = [0.0f32; 3];
        dv[v_axis] = self.height as f32;

        let add = |a: [f32; 3], b: [f32; 3]| [a[0] + b[0], a[1] + b[1], a[2] + b[2]];
        [base, add(base, du), add(add(base, du), dv), add(base, dv)]
    }

    /// Texture coordinates matching [`Quad::corners`], tiled once per block.
    pub fn tex_coords(&self) -> [[f32; 2]; 4] {
        let (w, h) = (self.width as f32, self.height as f32);
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    }

    /// Corner indices of the quad's two triangles. Faces looking towards -`axis` use the
    /// reverse winding.
    pub fn triangle_order(&self) -> [usize; 6] {
        if self.positive {
            [0, 1, 2, 0, 2, 3]
        } else {
            [0, 2, 1, 0, 3, 2]
        }
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Vector3};

    use super::*;

    fn quad(axis: usize, positive: bool) -> Quad {
        Quad {
            axis,
            slice: 1,
            u: 0,
            v: 0,
            width: 2,
            height: 3,
            block: 1,
            positive,
        }
    }

    #[test]
    fn winding_matches_normal() {
        for axis in 0..3 {
            for positive in [true, false] {
                let quad = quad(axis, positive);
                let corners = quad.corners().map(Vector3::from);
                let order = quad.triangle_order();
                let (a, b, c) = (corners[order[0]], corners[order[1]], corners[order[2]]);
                let winding_normal = (b - a).cross(c - a).normalize();
                assert_eq!(winding_normal, Vector3::from(quad.normal()));
            }
        }
    }

    #[test]
    fn corners_span_width_and_height() {
        let corners = quad(1, true).corners();
        // y-normal quads span z (u) then x (v)
        assert_eq!(corners[0], [0.0, 1.0, 0.0]);
        assert_eq!(corners[1], [0.0, 1.0, 2.0]);
        assert_eq!(corners[2], [3.0, 1.0, 2.0]);
        assert_eq!(corners[3], [3.0, 1.0, 0.0]);
        assert_eq!(quad(1, true).tex_coords()[2], [2.0, 3.0]);
    }
}

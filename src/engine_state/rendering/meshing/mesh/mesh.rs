//! Mesh data structures for chunk geometry.
//!
//! This module holds the indexed geometry handed to render sinks and the helpers the
//! meshers use to append quads to it.

use bytemuck::cast_slice;

use super::face::Quad;
use crate::engine_state::rendering::Vertex;

/// Indexed triangle geometry with interleaved vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderGeometry {
    /// Interleaved vertex data
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`
    pub indices: Vec<u32>,
}

impl RenderGeometry {
    /// Creates empty geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of quads, counting each pair of triangles as one.
    pub fn quad_count(&self) -> usize {
        self.indices.len() / 6
    }

    /// Vertex data as raw bytes for buffer uploads.
    pub fn vertex_bytes(&self) -> &[u8] {
        cast_slice(&self.vertices)
    }

    /// Appends four vertices and the six indices of their two triangles.
    pub fn push_quad(&mut self, corners: [Vertex; 4], triangle_order: [usize; 6]) {
        let first = self.vertices.len() as u32;
        self.vertices.extend(corners);
        self.indices
            .extend(triangle_order.iter().map(|&corner| first + corner as u32));
    }

    /// Appends a greedy quad with `material` on every vertex, and its triangles to
    /// `collision`.
    pub fn push_terrain_quad(&mut self, quad: &Quad, material: u32, collision: &mut Vec<[f32; 3]>) {
        let corners = quad.corners();
        let tex_coords = quad.tex_coords();
        let normal = quad.normal();
        let order = quad.triangle_order();

        self.push_quad(
            [0, 1, 2, 3].map(|i| Vertex::new(corners[i], normal, tex_coords[i], material)),
            order,
        );
        collision.extend(order.iter().map(|&i| corners[i]));
    }
}

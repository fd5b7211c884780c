//! Vertex data structures for chunk geometry.
//!
//! This module defines the interleaved vertex format produced by the meshers and handed
//! to render sinks.

/// A vertex of chunk or foliage geometry.
///
/// Positions are chunk-local; the render sink places the mesh at the chunk origin. The
/// layout has no padding, so a slice of vertices can be reinterpreted as bytes with
/// `bytemuck::cast_slice` and uploaded as-is.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Material: u32 (4 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position
    pub position: [f32; 3],
    /// Unit face normal
    pub normal: [f32; 3],
    /// Texture coordinates. Greedy quads run from 0 to their width/height in blocks so the
    /// texture repeats per block.
    pub tex_coords: [f32; 2],
    /// Texture layer for terrain, foliage code for billboards
    pub material: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2], material: u32) -> Self {
        Vertex {
            position,
            normal,
            tex_coords,
            material,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let vertices = [Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.0, 1.0], 7); 2];
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), 72);
        assert_eq!(&bytes[32..36], &7u32.to_ne_bytes());
    }
}

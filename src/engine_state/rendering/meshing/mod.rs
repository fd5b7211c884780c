//! # Meshing
//!
//! Builds everything the render and physics sinks need for one chunk: greedy terrain
//! geometry, foliage billboards and a separate collision triangle list.
//!
//! The result of a mesh job is a [`MeshJobResult`]. It is produced on a worker, queued for
//! upload, and handed by value to the sinks on the main thread; the pipeline never reads
//! it again after delivery.

pub mod mesh;

use std::sync::Arc;

use cgmath::Point3;

pub use mesh::RenderGeometry;

use super::texture::MaterialProvider;
use crate::engine_state::voxels::chunk::{ChunkData, CHUNK_DIMENSION};
use mesh::{mesh_foliage, GreedyMesher};

/// Geometry produced for one chunk by one mesh job.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshJobResult {
    /// Chunk coordinate.
    pub position: Point3<i32>,
    /// Revision of the mesh job that produced this result. Later jobs for the same chunk
    /// carry higher revisions.
    pub revision: u64,
    /// Greedy terrain geometry, chunk-local.
    pub terrain: RenderGeometry,
    /// Foliage billboards, chunk-local.
    pub foliage: RenderGeometry,
    /// Flattened terrain triangles for physics, three corners per triangle, chunk-local.
    /// Built independently of `terrain`; no buffers are shared.
    pub collision: Vec<[f32; 3]>,
}

impl MeshJobResult {
    /// World-space corner of the chunk.
    pub fn origin(&self) -> Point3<f32> {
        chunk_origin(self.position)
    }

    /// Number of terrain quads.
    pub fn quad_count(&self) -> usize {
        self.terrain.quad_count()
    }
}

/// World-space corner of the chunk at `position`.
pub fn chunk_origin(position: Point3<i32>) -> Point3<f32> {
    let size = CHUNK_DIMENSION as f32;
    Point3::new(
        position.x as f32 * size,
        position.y as f32 * size,
        position.z as f32 * size,
    )
}

/// Meshes `chunk` against its neighbours (in `BlockSide::all` order; `None` is empty).
///
/// Always produces a result, empty or not, so delivering it replaces any older mesh.
pub fn mesh_chunk(
    position: Point3<i32>,
    revision: u64,
    chunk: &ChunkData,
    neighbors: &[Option<Arc<ChunkData>>; 6],
    materials: &dyn MaterialProvider,
) -> MeshJobResult {
    let terrain = GreedyMesher::new(chunk, neighbors).mesh(materials);
    MeshJobResult {
        position,
        revision,
        terrain: terrain.geometry,
        foliage: mesh_foliage(chunk.foliage()),
        collision: terrain.collision,
    }
}

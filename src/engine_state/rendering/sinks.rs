//! Collaborators that receive finished chunk geometry.
//!
//! The streamer does not draw or simulate anything itself. A [`RenderSink`] turns mesh
//! results into GPU resources and a [`PhysicsSink`] turns collision triangles into static
//! bodies. Both are called on the main thread only.

use cgmath::Point3;
use log::{debug, trace};

use super::meshing::RenderGeometry;

/// Receives render geometry for chunks.
pub trait RenderSink {
    /// Creates or replaces the mesh for the chunk at `position`. Vertices are chunk-local;
    /// `origin` is the chunk's world-space corner (`position * 16`).
    ///
    /// Empty geometry is still delivered and replaces whatever was there before.
    fn upload_chunk_mesh(
        &mut self,
        position: Point3<i32>,
        origin: Point3<f32>,
        terrain: RenderGeometry,
        foliage: RenderGeometry,
    );
}

/// Receives collision geometry for chunks inside the collision radius.
pub trait PhysicsSink {
    /// Creates or replaces the static collider for the chunk at `position`. `triangles`
    /// holds three chunk-local corners per triangle.
    fn attach_collider(
        &mut self,
        position: Point3<i32>,
        origin: Point3<f32>,
        triangles: Vec<[f32; 3]>,
    );
}

/// A render sink that only logs and counts what it receives.
#[derive(Debug, Default)]
pub struct LoggingRenderSink {
    /// Meshes received.
    pub uploads: usize,
    /// Terrain quads received.
    pub quads: usize,
}

impl RenderSink for LoggingRenderSink {
    fn upload_chunk_mesh(
        &mut self,
        position: Point3<i32>,
        origin: Point3<f32>,
        terrain: RenderGeometry,
        foliage: RenderGeometry,
    ) {
        self.uploads += 1;
        self.quads += terrain.quad_count();
        trace!(
            "Mesh for {:?} at {:?}: {} quads ({} bytes), {} foliage vertices",
            position,
            origin,
            terrain.quad_count(),
            terrain.vertex_bytes().len(),
            foliage.vertices.len()
        );
    }
}

/// A physics sink that only logs and counts what it receives.
#[derive(Debug, Default)]
pub struct LoggingPhysicsSink {
    /// Colliders attached or replaced.
    pub attached: usize,
}

impl PhysicsSink for LoggingPhysicsSink {
    fn attach_collider(
        &mut self,
        position: Point3<i32>,
        origin: Point3<f32>,
        triangles: Vec<[f32; 3]>,
    ) {
        self.attached += 1;
        debug!(
            "Collider for {:?} at {:?}: {} triangles",
            position,
            origin,
            triangles.len() / 3
        );
    }
}

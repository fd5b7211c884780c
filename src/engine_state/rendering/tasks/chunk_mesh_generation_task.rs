//! Task for generating mesh data for chunks in a background thread.
//!
//! The task reads the chunk and its six face neighbours from the world store at the
//! moment it runs, so a job queued before a neighbour existed still sees that neighbour
//! if it has been published by then.

use cgmath::Point3;
use log::{trace, warn};
use web_time::Instant;

use crate::engine_state::{
    rendering::meshing::mesh_chunk,
    task_management::task::{Task, TaskContext, TaskOutcome},
    voxels::world::ChunkAccess,
};

/// Builds the render and collision geometry for one chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkMeshGenerationTask {
    position: Point3<i32>,
    revision: u64,
}

impl ChunkMeshGenerationTask {
    /// Creates a mesh task for the chunk at `position`, stamped with the revision the
    /// scheduler assigned when queueing it.
    pub fn new(position: Point3<i32>, revision: u64) -> Self {
        ChunkMeshGenerationTask { position, revision }
    }

    /// The revision this job will stamp on its result.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl Task for ChunkMeshGenerationTask {
    fn position(&self) -> Point3<i32> {
        self.position
    }

    fn process(&self, context: &TaskContext) -> TaskOutcome {
        let Some(chunk) = context.world.chunk_at(self.position) else {
            warn!(
                "Mesh job for {:?} found no published chunk, dropping it",
                self.position
            );
            return TaskOutcome::Skipped;
        };
        let neighbors = context.world.neighbors_of(self.position);

        let start = Instant::now();
        let result = mesh_chunk(
            self.position,
            self.revision,
            &chunk,
            &neighbors,
            context.materials.as_ref(),
        );
        trace!(
            "Meshed chunk {:?} rev {}: {} quads, {} foliage billboards in {:?}",
            self.position,
            self.revision,
            result.quad_count(),
            chunk.foliage().len(),
            start.elapsed()
        );

        TaskOutcome::Meshed(result)
    }
}

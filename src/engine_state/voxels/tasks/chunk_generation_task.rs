//! # Chunk Generation Task
//!
//! Generates the voxel data for one chunk coordinate and publishes it to the world
//! store. Meshing is queued by the scheduler once the task reports the publication.

use cgmath::Point3;
use log::{debug, trace};
use web_time::Instant;

use crate::engine_state::task_management::task::{Task, TaskContext, TaskOutcome};

/// Generates and publishes the chunk at one coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkGenerationTask {
    position: Point3<i32>,
}

impl ChunkGenerationTask {
    /// Creates a generation task for the chunk at `position`.
    pub fn new(position: Point3<i32>) -> Self {
        ChunkGenerationTask { position }
    }
}

impl Task for ChunkGenerationTask {
    fn position(&self) -> Point3<i32> {
        self.position
    }

    /// Builds the chunk completely before inserting it, so readers never see a partial
    /// chunk. A chunk that is already present is left untouched.
    fn process(&self, context: &TaskContext) -> TaskOutcome {
        if context.world.contains(self.position) {
            debug!(
                "Chunk {:?} already published, skipping generation",
                self.position
            );
            return TaskOutcome::Published(self.position);
        }

        let start = Instant::now();
        let chunk = context.generator.generate_chunk(self.position);
        trace!(
            "Generated chunk {:?} ({} solid voxels) in {:?}",
            self.position,
            chunk.solid_count(),
            start.elapsed()
        );

        context.world.insert(self.position, chunk);
        TaskOutcome::Published(self.position)
    }
}

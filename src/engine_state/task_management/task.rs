//! # Task System Core Types
//!
//! Units of background work and the per-coordinate lifecycle they drive.
//!
//! ## Task Lifecycle
//! 1. The scheduler queues a `ChunkGenerationTask` for a coordinate
//! 2. A worker generates and publishes the chunk, then asks the scheduler to mesh it and
//!    its already-published face neighbours
//! 3. A worker runs each `ChunkMeshGenerationTask` and pushes the result to the upload queue
//! 4. The main thread drains the upload queue under a per-frame budget
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be moved onto a worker thread
//! - Tasks own only a coordinate (and a revision); everything else comes from the
//!   read-only [`TaskContext`] shared by all workers

use std::sync::Arc;

use cgmath::Point3;

use crate::engine_state::{
    rendering::{meshing::MeshJobResult, texture::MaterialProvider},
    voxels::{generation::WorldGenerator, world::WorldStore},
};

/// Shared, read-mostly state every task runs against.
#[derive(Clone)]
pub struct TaskContext {
    /// Where generated chunks are published and meshed chunks are read from.
    pub world: WorldStore,
    /// The session's generator and noise.
    pub generator: Arc<WorldGenerator>,
    /// Block-type to texture-layer mapping used when encoding materials.
    pub materials: Arc<dyn MaterialProvider>,
}

/// What a finished task hands back to the scheduler.
#[derive(Debug)]
pub enum TaskOutcome {
    /// A chunk was published at this position.
    Published(Point3<i32>),
    /// A mesh was built and is ready for upload.
    Meshed(MeshJobResult),
    /// Nothing to do; the reason has already been logged.
    Skipped,
}

/// A unit of work that runs on a background worker.
///
/// Tasks should be self-contained: a coordinate in, an outcome out. They never block
/// and never report errors across the thread boundary; failures are logged and turned
/// into [`TaskOutcome::Skipped`].
pub trait Task: Send {
    /// The chunk coordinate this task concerns.
    fn position(&self) -> Point3<i32>;

    /// Performs the work on the calling worker thread.
    fn process(&self, context: &TaskContext) -> TaskOutcome;
}

/// Where a coordinate is in the pipeline.
///
/// `Unrequested → QueuedGeneration → QueuedMesh → QueuedUpload → Uploaded`, with
/// `Generated` marking a chunk that is published but not waiting in the mesh queue
/// (including while a worker is meshing it). A neighbour being published sends an
/// `Uploaded` chunk back to `QueuedMesh`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChunkState {
    /// Never requested.
    Unrequested,
    /// Waiting in the generation queue.
    QueuedGeneration,
    /// Published, not currently queued for meshing.
    Generated,
    /// Published and waiting in the mesh queue.
    QueuedMesh,
    /// Meshed, result waiting in the upload queue.
    QueuedUpload,
    /// Latest mesh delivered to the render sink.
    Uploaded,
}

impl ChunkState {
    /// Whether the coordinate is waiting in the generation or mesh queue.
    pub fn is_pending(self) -> bool {
        matches!(self, ChunkState::QueuedGeneration | ChunkState::QueuedMesh)
    }
}

/// Lifecycle bookkeeping for one coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkRecord {
    /// Current lifecycle state.
    pub state: ChunkState,
    /// Incremented every time a mesh job is queued; results carry the revision they were
    /// built for.
    pub revision: u64,
}

impl Default for ChunkRecord {
    fn default() -> Self {
        ChunkRecord {
            state: ChunkState::Unrequested,
            revision: 0,
        }
    }
}

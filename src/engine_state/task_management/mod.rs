//! # Task Management System
//!
//! This module provides the [`ChunkScheduler`], which coordinates a pool of background
//! workers that generate and mesh chunks with a main thread that drains finished meshes
//! under a per-frame budget.
//!
//! ## Architecture Overview
//!
//! The scheduler consists of several key components:
//! - `ChunkScheduler`: owned by the main thread; enqueues coordinates, drains uploads and
//!   joins workers on shutdown
//! - `SchedulerShared`: the state every worker holds a handle to (task context, per-coordinate
//!   records, queue senders, shutdown flag)
//! - Three multi-producer/multi-consumer queues: generation, mesh and upload
//! - `Task`: a unit of work executed on a worker (see [`task`])
//!
//! ## Worker Protocol
//! Each worker loops until shutdown is signalled:
//! 1. Take a generation job if one is queued, otherwise a mesh job
//! 2. Sleep for the idle interval only when both queues are empty
//! 3. After publishing a chunk, queue a mesh job for it and for every published face
//!    neighbour, whose boundary faces may have been drawn against empty space
//!
//! ## Main Thread
//! - `enqueue_around` is called when the viewpoint crosses a chunk boundary
//! - `drain_uploads` is called once per frame and never blocks; anything it does not
//!   reach stays queued for the next frame
//! - `shutdown` signals the workers and joins them within a bounded timeout
//!
//! ## Example Usage
//! ```no_run
//! use std::{sync::Arc, time::Duration};
//!
//! use cgmath::Point3;
//! use voxel_streamer::engine_state::{
//!     config::WorldConfig, rendering::texture::BlockTextureTable,
//!     task_management::ChunkScheduler,
//! };
//!
//! let config = WorldConfig::default();
//! let mut scheduler = ChunkScheduler::new(&config, Arc::new(BlockTextureTable::default()))?;
//! scheduler.enqueue_around(Point3::new(0, 0, 0), config.view_radius);
//!
//! // In the frame loop:
//! scheduler.drain_uploads(Duration::from_millis(4), 8, |result| {
//!     println!("chunk {:?}: {} quads", result.position, result.quad_count());
//! });
//!
//! scheduler.shutdown();
//! # Ok::<(), voxel_streamer::engine_state::error::VoxelError>(())
//! ```

pub mod task;

use std::{
    collections::HashMap,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use cgmath::Point3;
use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, error, info, trace, warn};
use web_time::Instant;

use task::{ChunkRecord, ChunkState, Task, TaskContext, TaskOutcome};

use super::{
    config::WorldConfig,
    error::{VoxelError, VoxelResult},
    rendering::{
        meshing::MeshJobResult, tasks::chunk_mesh_generation_task::ChunkMeshGenerationTask,
        texture::MaterialProvider,
    },
    voxels::{
        block::BlockSide, generation::WorldGenerator,
        tasks::chunk_generation_task::ChunkGenerationTask, world::WorldStore,
    },
};
use crate::core::MtResource;

/// Snapshot of queue depths and delivery counters.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SchedulerStats {
    /// Generation jobs waiting for a worker.
    pub queued_generation: usize,
    /// Mesh jobs waiting for a worker.
    pub queued_mesh: usize,
    /// Mesh results waiting for the main thread.
    pub queued_upload: usize,
    /// Chunks published to the world store.
    pub published: usize,
    /// Mesh results handed to the caller by `drain_uploads`.
    pub delivered: usize,
    /// Results dropped because a newer mesh of the same chunk was already delivered.
    pub discarded_stale: usize,
}

/// State shared between the scheduler and its workers.
struct SchedulerShared {
    context: TaskContext,
    records: MtResource<HashMap<Point3<i32>, ChunkRecord>>,
    generation_sender: Sender<ChunkGenerationTask>,
    mesh_sender: Sender<ChunkMeshGenerationTask>,
    upload_sender: Sender<MeshJobResult>,
    shutdown: AtomicBool,
}

impl SchedulerShared {
    /// Queues generation for `position` unless it is already published or tracked.
    fn queue_generation(&self, position: Point3<i32>) -> bool {
        if self.context.world.contains(position) {
            return false;
        }

        let mut records = self.records.get_mut();
        let record = records.entry(position).or_default();
        if record.state != ChunkState::Unrequested {
            return false;
        }
        record.state = ChunkState::QueuedGeneration;
        self.generation_sender
            .send(ChunkGenerationTask::new(position))
            .is_ok()
    }

    /// Queues a mesh job for `position`, stamping it with a fresh revision.
    ///
    /// A coordinate already waiting in the mesh queue is not queued twice; the waiting
    /// job reads the world when it runs and will see the same data.
    fn queue_mesh(&self, position: Point3<i32>) -> bool {
        let mut records = self.records.get_mut();
        let record = records.entry(position).or_default();
        if record.state == ChunkState::QueuedMesh {
            return false;
        }
        record.revision += 1;
        record.state = ChunkState::QueuedMesh;
        self.mesh_sender
            .send(ChunkMeshGenerationTask::new(position, record.revision))
            .is_ok()
    }

    fn run_guarded<T: Task>(&self, task: &T) -> Option<TaskOutcome> {
        match panic::catch_unwind(AssertUnwindSafe(|| task.process(&self.context))) {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                error!("Task for chunk {:?} panicked, dropping it", task.position());
                None
            }
        }
    }

    fn run_generation(&self, task: ChunkGenerationTask) {
        match self.run_guarded(&task) {
            Some(TaskOutcome::Published(position)) => {
                // Neighbours first: this coordinate stays QueuedGeneration until every
                // remesh it triggers has been queued.
                for side in BlockSide::all() {
                    let neighbor = position + side.neighbor_offset();
                    if self.context.world.contains(neighbor) {
                        self.queue_mesh(neighbor);
                    }
                }
                self.queue_mesh(position);
            }
            Some(_) => {}
            None => {
                // Forget the coordinate so a later enqueue can retry it.
                self.records.get_mut().remove(&task.position());
            }
        }
    }

    fn run_mesh(&self, task: ChunkMeshGenerationTask) {
        let position = task.position();
        {
            let mut records = self.records.get_mut();
            if let Some(record) = records.get_mut(&position) {
                if record.state == ChunkState::QueuedMesh && record.revision == task.revision() {
                    record.state = ChunkState::Generated;
                }
            }
        }

        let Some(TaskOutcome::Meshed(result)) = self.run_guarded(&task) else {
            return;
        };

        {
            let mut records = self.records.get_mut();
            if let Some(record) = records.get_mut(&position) {
                if record.state == ChunkState::Generated && record.revision == result.revision {
                    record.state = ChunkState::QueuedUpload;
                }
            }
        }
        if self.upload_sender.send(result).is_err() {
            debug!("Upload queue closed, dropping mesh for {:?}", position);
        }
    }
}

fn worker_loop(
    index: usize,
    shared: Arc<SchedulerShared>,
    generation_receiver: Receiver<ChunkGenerationTask>,
    mesh_receiver: Receiver<ChunkMeshGenerationTask>,
    idle_sleep: Duration,
    done_sender: Sender<usize>,
) {
    debug!("Worker {} started", index);
    while !shared.shutdown.load(Ordering::Acquire) {
        if let Ok(task) = generation_receiver.try_recv() {
            shared.run_generation(task);
            continue;
        }
        if let Ok(task) = mesh_receiver.try_recv() {
            shared.run_mesh(task);
            continue;
        }
        thread::sleep(idle_sleep);
    }
    debug!("Worker {} exiting", index);
    let _ = done_sender.send(index);
}

/// Coordinates chunk generation, meshing and upload across a worker pool.
///
/// # Implementation Notes
/// - Every coordinate moves through [`ChunkState`]; a coordinate is never queued for
///   generation twice, and never sits in the mesh queue twice
/// - Mesh results carry a per-coordinate revision. `drain_uploads` discards a result
///   older than one it already delivered, so a slow remesh never replaces a newer mesh
/// - Dropping the scheduler shuts it down
pub struct ChunkScheduler {
    shared: Arc<SchedulerShared>,
    upload_receiver: Receiver<MeshJobResult>,
    workers: Vec<Option<JoinHandle<()>>>,
    done_receiver: Receiver<usize>,
    delivered_revisions: HashMap<Point3<i32>, u64>,
    delivered: usize,
    discarded_stale: usize,
    shutdown_timeout: Duration,
}

impl ChunkScheduler {
    /// Creates a scheduler over an empty world, generating with `config`'s seed and
    /// settings.
    ///
    /// # Errors
    /// Returns [`VoxelError::WorkerSpawn`] if a worker thread cannot be started. Workers
    /// spawned before the failure are shut down again.
    pub fn new(config: &WorldConfig, materials: Arc<dyn MaterialProvider>) -> VoxelResult<Self> {
        let generator = Arc::new(WorldGenerator::new(config));
        Self::from_parts(config, WorldStore::new(), generator, materials)
    }

    /// Creates a scheduler over an existing world store and generator.
    ///
    /// Chunks already in `world` count as published and are never regenerated.
    pub fn from_parts(
        config: &WorldConfig,
        world: WorldStore,
        generator: Arc<WorldGenerator>,
        materials: Arc<dyn MaterialProvider>,
    ) -> VoxelResult<Self> {
        let (generation_sender, generation_receiver) = unbounded();
        let (mesh_sender, mesh_receiver) = unbounded();
        let (upload_sender, upload_receiver) = unbounded();
        let (done_sender, done_receiver) = unbounded();

        let shared = Arc::new(SchedulerShared {
            context: TaskContext {
                world,
                generator,
                materials,
            },
            records: MtResource::new(HashMap::new()),
            generation_sender,
            mesh_sender,
            upload_sender,
            shutdown: AtomicBool::new(false),
        });

        let num_workers = config.resolved_worker_count();
        info!(
            "Available parallelism: {:?}, spawning {} chunk workers",
            thread::available_parallelism(),
            num_workers
        );

        let mut scheduler = ChunkScheduler {
            shared,
            upload_receiver,
            workers: Vec::with_capacity(num_workers),
            done_receiver,
            delivered_revisions: HashMap::new(),
            delivered: 0,
            discarded_stale: 0,
            shutdown_timeout: config.shutdown_timeout(),
        };

        for index in 0..num_workers {
            let shared = Arc::clone(&scheduler.shared);
            let generation_receiver = generation_receiver.clone();
            let mesh_receiver = mesh_receiver.clone();
            let done_sender = done_sender.clone();
            let idle_sleep = config.idle_sleep();

            let worker = thread::Builder::new()
                .name(format!("chunk-worker-{index}"))
                .spawn(move || {
                    worker_loop(
                        index,
                        shared,
                        generation_receiver,
                        mesh_receiver,
                        idle_sleep,
                        done_sender,
                    )
                })
                .map_err(|source| VoxelError::WorkerSpawn { index, source })?;
            scheduler.workers.push(Some(worker));
        }

        Ok(scheduler)
    }

    /// The world store chunks are published to.
    pub fn world(&self) -> &WorldStore {
        &self.shared.context.world
    }

    /// Every coordinate within Chebyshev distance `radius` of `center`, nearest first.
    ///
    /// Ties in squared Euclidean distance are broken by coordinate so the order is stable.
    pub fn desired_positions(center: Point3<i32>, radius: i32) -> Vec<Point3<i32>> {
        let radius = radius.max(0);
        let mut positions = Vec::with_capacity(((2 * radius + 1) as usize).pow(3));
        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    positions.push(Point3::new(center.x + x, center.y + y, center.z + z));
                }
            }
        }
        positions.sort_by_key(|position| {
            let (dx, dy, dz) = (
                position.x - center.x,
                position.y - center.y,
                position.z - center.z,
            );
            (dx * dx + dy * dy + dz * dz, position.x, position.y, position.z)
        });
        positions
    }

    /// Queues generation for every coordinate around `center` that is neither published
    /// nor already in the pipeline. Returns how many coordinates were queued.
    pub fn enqueue_around(&mut self, center: Point3<i32>, radius: i32) -> usize {
        let queued = Self::desired_positions(center, radius)
            .into_iter()
            .filter(|&position| self.shared.queue_generation(position))
            .count();
        if queued > 0 {
            debug!(
                "Queued {} chunks for generation around {:?} (radius {})",
                queued, center, radius
            );
        }
        queued
    }

    /// Queues generation of a single coordinate. Returns `false` if it is already published
    /// or in the pipeline.
    pub fn queue_generation(&mut self, position: Point3<i32>) -> bool {
        self.shared.queue_generation(position)
    }

    /// Queues a remesh of a published chunk. Returns `false` if the chunk is not published
    /// or a mesh job for it is already waiting.
    pub fn queue_mesh(&mut self, position: Point3<i32>) -> bool {
        self.world().contains(position) && self.shared.queue_mesh(position)
    }

    /// Delivers finished meshes to `deliver` until the queue is empty, `count_budget`
    /// results have been taken, or `time_budget` has elapsed, whichever comes first.
    ///
    /// Never blocks. Results left behind stay queued for the next call. Returns the number
    /// of results delivered; stale results are discarded and count only towards the
    /// item budget.
    pub fn drain_uploads(
        &mut self,
        time_budget: Duration,
        count_budget: usize,
        mut deliver: impl FnMut(MeshJobResult),
    ) -> usize {
        let start = Instant::now();
        let mut taken = 0;
        let mut delivered = 0;

        while taken < count_budget && start.elapsed() < time_budget {
            let Ok(result) = self.upload_receiver.try_recv() else {
                break;
            };
            taken += 1;

            let position = result.position;
            let revision = result.revision;
            if self
                .delivered_revisions
                .get(&position)
                .is_some_and(|&newest| revision < newest)
            {
                trace!(
                    "Discarding stale mesh for {:?} (rev {})",
                    position,
                    revision
                );
                self.discarded_stale += 1;
                continue;
            }

            self.delivered_revisions.insert(position, revision);
            {
                let mut records = self.shared.records.get_mut();
                if let Some(record) = records.get_mut(&position) {
                    if record.state == ChunkState::QueuedUpload && record.revision == revision {
                        record.state = ChunkState::Uploaded;
                    }
                }
            }
            deliver(result);
            delivered += 1;
        }

        self.delivered += delivered;
        if delivered > 0 {
            trace!(
                "Delivered {} meshes in {:?}, {} still queued",
                delivered,
                start.elapsed(),
                self.upload_receiver.len()
            );
        }
        delivered
    }

    /// Current lifecycle state of `position`.
    pub fn state_of(&self, position: Point3<i32>) -> ChunkState {
        self.shared
            .records
            .get()
            .get(&position)
            .map_or(ChunkState::Unrequested, |record| record.state)
    }

    /// Whether `position` is waiting in the generation or mesh queue.
    pub fn is_pending(&self, position: Point3<i32>) -> bool {
        self.state_of(position).is_pending()
    }

    /// Queue depths and delivery counters.
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            queued_generation: self.shared.generation_sender.len(),
            queued_mesh: self.shared.mesh_sender.len(),
            queued_upload: self.upload_receiver.len(),
            published: self.world().len(),
            delivered: self.delivered,
            discarded_stale: self.discarded_stale,
        }
    }

    /// Whether every tracked coordinate has had its latest mesh delivered.
    pub fn is_settled(&self) -> bool {
        self.upload_receiver.is_empty()
            && self
                .shared
                .records
                .get()
                .values()
                .all(|record| record.state == ChunkState::Uploaded)
    }

    /// Signals every worker to stop and waits up to the configured timeout for them.
    ///
    /// In-flight jobs may be abandoned. Workers that do not finish in time are detached.
    /// Returns `true` if every worker was joined. Calling this again is a no-op.
    pub fn shutdown(&mut self) -> bool {
        if self.workers.is_empty() {
            return true;
        }
        self.shared.shutdown.store(true, Ordering::Release);

        let deadline = Instant::now() + self.shutdown_timeout;
        let mut finished = vec![false; self.workers.len()];
        let mut remaining = self.workers.len();
        while remaining > 0 {
            let wait = deadline.saturating_duration_since(Instant::now());
            match self.done_receiver.recv_timeout(wait) {
                Ok(index) => {
                    if let Some(flag) = finished.get_mut(index) {
                        if !*flag {
                            *flag = true;
                            remaining -= 1;
                        }
                    }
                }
                Err(_) => break,
            }
        }

        let mut all_joined = true;
        for (index, worker) in self.workers.drain(..).enumerate() {
            let Some(worker) = worker else { continue };
            if finished[index] {
                if worker.join().is_err() {
                    warn!("Worker {} panicked while exiting", index);
                    all_joined = false;
                }
            } else {
                warn!(
                    "Worker {} did not stop within {:?}, detaching it",
                    index, self.shutdown_timeout
                );
                all_joined = false;
            }
        }

        info!("Chunk scheduler shut down (all workers joined: {})", all_joined);
        all_joined
    }
}

impl Drop for ChunkScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

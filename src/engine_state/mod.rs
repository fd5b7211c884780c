//! # Engine State Module
//!
//! The streaming pipeline and the per-frame driver that ties it to its collaborators.
//!
//! ## Key Components
//!
//! * `EngineState` - Polls the viewpoint, queues chunks around it, drains finished meshes
//!   into the render sink and attaches colliders near the viewpoint
//! * `camera_state` - Viewpoint sources and world-to-chunk conversion
//! * `config` - Runtime settings loaded from JSON
//! * `error` - The crate error type
//! * `rendering` - Greedy and foliage meshing, materials and sinks
//! * `task_management` - The chunk scheduler and its worker pool
//! * `voxels` - Chunk storage, the world store and procedural generation
//!
//! ## Frame Loop
//!
//! Each call to [`EngineState::frame`]:
//! 1. Polls the viewpoint once. Without one, streaming continues around the last known
//!    position (or the origin) and collision updates are skipped.
//! 2. On a chunk boundary crossing, queues every missing chunk within the view radius and
//!    re-evaluates which retained colliders are now within the collision radius.
//! 3. Drains finished meshes under the configured time and count budget.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use camera_state::{chunk_position_of, default_origin, ViewpointSource};
use cgmath::Point3;
use log::{debug, trace};
use rendering::{
    meshing::{chunk_origin, MeshJobResult},
    sinks::{PhysicsSink, RenderSink},
    texture::BlockTextureTable,
};
use task_management::ChunkScheduler;

use self::{config::WorldConfig, error::VoxelResult};

pub mod camera_state;
pub mod config;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Chebyshev (max-axis) distance between two chunk coordinates.
pub fn chunk_distance(a: Point3<i32>, b: Point3<i32>) -> i32 {
    (a.x - b.x)
        .abs()
        .max((a.y - b.y).abs())
        .max((a.z - b.z).abs())
}

/// Decides when collision geometry reaches the physics sink.
///
/// Triangles for chunks outside the collision radius are kept until the viewpoint comes
/// close enough. Attached colliders are never removed; a newer mesh of an attached chunk
/// replaces its collider.
#[derive(Debug, Default)]
pub struct CollisionTracker {
    radius: i32,
    center: Option<Point3<i32>>,
    retained: HashMap<Point3<i32>, Vec<[f32; 3]>>,
    attached: HashSet<Point3<i32>>,
}

impl CollisionTracker {
    /// Creates a tracker attaching colliders within Chebyshev distance `radius`.
    pub fn new(radius: i32) -> Self {
        CollisionTracker {
            radius,
            ..Default::default()
        }
    }

    fn in_radius(&self, position: Point3<i32>) -> bool {
        self.center
            .is_some_and(|center| chunk_distance(center, position) <= self.radius)
    }

    /// Moves the collision centre and attaches every retained collider now in range.
    /// Returns the number attached.
    pub fn recenter(&mut self, center: Point3<i32>, physics: &mut impl PhysicsSink) -> usize {
        if self.center == Some(center) {
            return 0;
        }
        self.center = Some(center);

        let ready: Vec<Point3<i32>> = self
            .retained
            .keys()
            .copied()
            .filter(|&position| self.in_radius(position))
            .collect();
        for &position in &ready {
            if let Some(triangles) = self.retained.remove(&position) {
                physics.attach_collider(position, chunk_origin(position), triangles);
                self.attached.insert(position);
            }
        }
        if !ready.is_empty() {
            debug!(
                "Attached {} retained colliders around {:?}",
                ready.len(),
                center
            );
        }
        ready.len()
    }

    /// Takes the collision triangles of a freshly delivered mesh. Returns `true` if they
    /// were attached immediately.
    pub fn accept(
        &mut self,
        position: Point3<i32>,
        triangles: Vec<[f32; 3]>,
        physics: &mut impl PhysicsSink,
    ) -> bool {
        let attached = self.attached.contains(&position);
        if attached || self.in_radius(position) {
            self.retained.remove(&position);
            if attached || !triangles.is_empty() {
                physics.attach_collider(position, chunk_origin(position), triangles);
                self.attached.insert(position);
                return true;
            }
            return false;
        }

        if triangles.is_empty() {
            self.retained.remove(&position);
        } else {
            self.retained.insert(position, triangles);
        }
        false
    }

    /// Chunks whose collider has been attached.
    pub fn attached(&self) -> &HashSet<Point3<i32>> {
        &self.attached
    }

    /// Number of chunks whose triangles are waiting for the viewpoint to come closer.
    pub fn retained_count(&self) -> usize {
        self.retained.len()
    }
}

/// What one call to [`EngineState::frame`] did.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Viewpoint returned by the source this frame.
    pub viewpoint: Option<Point3<f32>>,
    /// Chunk the pipeline is streaming around.
    pub center: Point3<i32>,
    /// Chunks queued for generation.
    pub queued: usize,
    /// Meshes delivered to the render sink.
    pub delivered: usize,
    /// Colliders attached or replaced.
    pub colliders_attached: usize,
}

/// The main state container for a streaming session.
///
/// # Examples
///
/// ```no_run
/// use cgmath::Point3;
/// use voxel_streamer::engine_state::{
///     camera_state::ScriptedViewpoint,
///     config::WorldConfig,
///     rendering::sinks::{LoggingPhysicsSink, LoggingRenderSink},
///     EngineState,
/// };
///
/// let mut engine = EngineState::new(
///     WorldConfig::default(),
///     ScriptedViewpoint::fixed(Point3::new(8.0, 20.0, 8.0)),
///     LoggingRenderSink::default(),
///     LoggingPhysicsSink::default(),
/// )?;
///
/// // Main loop
/// for _ in 0..600 {
///     engine.frame();
/// }
/// engine.shutdown();
/// # Ok::<(), voxel_streamer::engine_state::error::VoxelError>(())
/// ```
pub struct EngineState<V: ViewpointSource, R: RenderSink, P: PhysicsSink> {
    config: WorldConfig,
    scheduler: ChunkScheduler,
    viewpoint: V,
    render_sink: R,
    physics_sink: P,
    last_viewpoint: Option<Point3<f32>>,
    current_chunk_position: Option<Point3<i32>>,
    collision: CollisionTracker,
}

impl<V: ViewpointSource, R: RenderSink, P: PhysicsSink> EngineState<V, R, P> {
    /// Creates a session with the default material table and starts its workers.
    pub fn new(
        config: WorldConfig,
        viewpoint: V,
        render_sink: R,
        physics_sink: P,
    ) -> VoxelResult<Self> {
        let scheduler = ChunkScheduler::new(&config, Arc::new(BlockTextureTable::default()))?;
        Ok(Self::with_scheduler(
            config,
            scheduler,
            viewpoint,
            render_sink,
            physics_sink,
        ))
    }

    /// Creates a session around an existing scheduler.
    pub fn with_scheduler(
        config: WorldConfig,
        scheduler: ChunkScheduler,
        viewpoint: V,
        render_sink: R,
        physics_sink: P,
    ) -> Self {
        let collision = CollisionTracker::new(config.collision_radius);
        EngineState {
            config,
            scheduler,
            viewpoint,
            render_sink,
            physics_sink,
            last_viewpoint: None,
            current_chunk_position: None,
            collision,
        }
    }

    /// Runs one frame of the streaming loop.
    pub fn frame(&mut self) -> FrameReport {
        let polled = self.viewpoint.poll_viewpoint();
        if polled.is_some() {
            self.last_viewpoint = polled;
        }

        let center = chunk_position_of(self.last_viewpoint.unwrap_or_else(default_origin));
        let mut report = FrameReport {
            viewpoint: polled,
            center,
            queued: 0,
            delivered: 0,
            colliders_attached: 0,
        };

        if self.current_chunk_position != Some(center) {
            report.queued = self.scheduler.enqueue_around(center, self.config.view_radius);
            self.current_chunk_position = Some(center);
        }
        if self.last_viewpoint.is_some() {
            report.colliders_attached += self.collision.recenter(center, &mut self.physics_sink);
        }

        let render_sink = &mut self.render_sink;
        let physics_sink = &mut self.physics_sink;
        let collision = &mut self.collision;
        let mut colliders_attached = 0;
        report.delivered = self.scheduler.drain_uploads(
            self.config.upload_time_budget(),
            self.config.upload_count_budget,
            |result| {
                let origin = result.origin();
                let MeshJobResult {
                    position,
                    terrain,
                    foliage,
                    collision: triangles,
                    ..
                } = result;
                render_sink.upload_chunk_mesh(position, origin, terrain, foliage);
                if collision.accept(position, triangles, physics_sink) {
                    colliders_attached += 1;
                }
            },
        );
        report.colliders_attached += colliders_attached;

        if report.delivered > 0 {
            trace!("Frame report: {:?}", report);
        }
        report
    }

    /// The scheduler driving generation and meshing.
    pub fn scheduler(&self) -> &ChunkScheduler {
        &self.scheduler
    }

    /// The render sink.
    pub fn render_sink(&self) -> &R {
        &self.render_sink
    }

    /// The physics sink.
    pub fn physics_sink(&self) -> &P {
        &self.physics_sink
    }

    /// Collider bookkeeping.
    pub fn collision(&self) -> &CollisionTracker {
        &self.collision
    }

    /// Stops the workers. See [`ChunkScheduler::shutdown`].
    pub fn shutdown(&mut self) -> bool {
        self.scheduler.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        attached: Vec<(Point3<i32>, usize)>,
    }

    impl PhysicsSink for Recorder {
        fn attach_collider(
            &mut self,
            position: Point3<i32>,
            _origin: Point3<f32>,
            triangles: Vec<[f32; 3]>,
        ) {
            self.attached.push((position, triangles.len()));
        }
    }

    fn triangle() -> Vec<[f32; 3]> {
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]
    }

    #[test]
    fn distance_is_chebyshev() {
        assert_eq!(chunk_distance(Point3::new(0, 0, 0), Point3::new(1, -3, 2)), 3);
        assert_eq!(chunk_distance(Point3::new(2, 2, 2), Point3::new(2, 2, 2)), 0);
    }

    #[test]
    fn colliders_wait_for_a_viewpoint() {
        let mut tracker = CollisionTracker::new(1);
        let mut physics = Recorder::default();
        assert!(!tracker.accept(Point3::new(0, 0, 0), triangle(), &mut physics));
        assert_eq!(tracker.retained_count(), 1);

        assert_eq!(tracker.recenter(Point3::new(0, 0, 0), &mut physics), 1);
        assert_eq!(physics.attached, vec![(Point3::new(0, 0, 0), 3)]);
        assert_eq!(tracker.retained_count(), 0);
    }

    #[test]
    fn far_colliders_are_retained_until_in_range() {
        let mut tracker = CollisionTracker::new(1);
        let mut physics = Recorder::default();
        tracker.recenter(Point3::new(0, 0, 0), &mut physics);

        assert!(tracker.accept(Point3::new(1, 1, 1), triangle(), &mut physics));
        assert!(!tracker.accept(Point3::new(3, 0, 0), triangle(), &mut physics));
        assert!(!tracker.accept(Point3::new(4, 0, 0), Vec::new(), &mut physics));
        assert_eq!(tracker.retained_count(), 1);

        assert_eq!(tracker.recenter(Point3::new(2, 0, 0), &mut physics), 1);
        // Moving away again never detaches anything.
        tracker.recenter(Point3::new(-5, 0, 0), &mut physics);
        assert_eq!(tracker.attached().len(), 2);
        assert!(tracker.attached().contains(&Point3::new(3, 0, 0)));
    }

    #[test]
    fn remesh_replaces_attached_collider_even_out_of_range() {
        let mut tracker = CollisionTracker::new(0);
        let mut physics = Recorder::default();
        tracker.recenter(Point3::new(0, 0, 0), &mut physics);
        assert!(tracker.accept(Point3::new(0, 0, 0), triangle(), &mut physics));
        tracker.recenter(Point3::new(9, 9, 9), &mut physics);
        assert!(tracker.accept(Point3::new(0, 0, 0), Vec::new(), &mut physics));
        assert_eq!(physics.attached.last(), Some(&(Point3::new(0, 0, 0), 0)));
    }
}

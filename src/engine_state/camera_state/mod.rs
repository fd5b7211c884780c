//! # Camera State Management
//!
//! The streamer follows a single viewpoint. This module defines where that viewpoint
//! comes from and how a world position maps to the chunk the viewpoint is in.
//!
//! ## Core Components
//! - `ViewpointSource`: polled once per frame for the current viewpoint position
//! - `ScriptedViewpoint`: replays a fixed list of positions, used by the headless binary
//!   and tests
//! - `chunk_position_of`: world position to chunk coordinate

use std::collections::VecDeque;

use cgmath::{EuclideanSpace, Point3};

use super::voxels::chunk::CHUNK_DIMENSION;

/// Supplies the viewpoint the world is streamed around.
pub trait ViewpointSource {
    /// The viewpoint's world position this frame, or `None` if it is not available yet
    /// (for example, the camera has not been created).
    fn poll_viewpoint(&mut self) -> Option<Point3<f32>>;
}

/// The chunk coordinate containing the world-space point `position`.
pub fn chunk_position_of(position: Point3<f32>) -> Point3<i32> {
    let size = CHUNK_DIMENSION as f32;
    Point3::new(
        (position.x / size).floor() as i32,
        (position.y / size).floor() as i32,
        (position.z / size).floor() as i32,
    )
}

/// A viewpoint that replays a scripted list of positions, one per poll.
///
/// Once the script runs out, the last entry is repeated.
#[derive(Clone, Debug, Default)]
pub struct ScriptedViewpoint {
    frames: VecDeque<Option<Point3<f32>>>,
    last: Option<Point3<f32>>,
}

impl ScriptedViewpoint {
    /// Replays `frames` in order. `None` entries simulate a missing viewpoint.
    pub fn new(frames: impl IntoIterator<Item = Option<Point3<f32>>>) -> Self {
        ScriptedViewpoint {
            frames: frames.into_iter().collect(),
            last: None,
        }
    }

    /// A viewpoint that never moves.
    pub fn fixed(position: Point3<f32>) -> Self {
        Self::new([Some(position)])
    }

    /// A straight flight from `start` to `end` in `steps` equal moves.
    pub fn fly_through(start: Point3<f32>, end: Point3<f32>, steps: usize) -> Self {
        let steps = steps.max(1);
        let delta = (end - start) / steps as f32;
        Self::new((0..=steps).map(|step| Some(start + delta * step as f32)))
    }

    /// Entries left before the script starts repeating its last position.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl ViewpointSource for ScriptedViewpoint {
    fn poll_viewpoint(&mut self) -> Option<Point3<f32>> {
        if let Some(frame) = self.frames.pop_front() {
            self.last = frame;
        }
        self.last
    }
}

/// The default origin used for streaming before any viewpoint is known.
pub fn default_origin() -> Point3<f32> {
    Point3::origin()
}
